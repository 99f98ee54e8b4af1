//! Iteration protocol shared by file iterators and relational operators.

use crate::error::DbError;
use crate::tuple::{Schema, Tuple};

/// Open/next/rewind/close cursor over tuples.
///
/// A cursor starts closed. While closed, `has_next` is `false` and `next`
/// fails with `DbError::NoSuchElement`.
pub trait DbFileIterator {
    /// Opens the cursor. Opening an open cursor does nothing.
    fn open(&mut self) -> Result<(), DbError>;

    /// Returns whether `next` may yield another tuple.
    fn has_next(&mut self) -> Result<bool, DbError>;

    /// Returns the next tuple, or `DbError::NoSuchElement` once exhausted.
    fn next(&mut self) -> Result<Tuple, DbError>;

    /// Restarts the cursor from the first tuple.
    fn rewind(&mut self) -> Result<(), DbError>;

    /// Closes the cursor.
    fn close(&mut self);

    /// Drains every remaining tuple.
    fn collect_remaining(&mut self) -> Result<Vec<Tuple>, DbError> {
        let mut tuples = Vec::new();
        while self.has_next()? {
            match self.next() {
                Ok(tuple) => tuples.push(tuple),
                Err(DbError::NoSuchElement) => break,
                Err(err) => return Err(err),
            }
        }
        Ok(tuples)
    }
}

/// A relational operator: a tuple cursor with a known output schema.
pub trait DbIterator: DbFileIterator {
    /// Returns the schema of the tuples this operator yields.
    fn schema(&self) -> Result<Schema, DbError>;
}
