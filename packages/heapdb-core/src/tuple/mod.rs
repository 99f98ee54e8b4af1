//! Tuple schema and tuple values.

mod schema;
#[allow(clippy::module_inception)]
mod tuple;

pub use schema::{Schema, SchemaItem};
pub use tuple::Tuple;
