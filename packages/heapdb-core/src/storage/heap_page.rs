//! Heap page: fixed-size block of tuple slots with a used-slot bitmap.
//!
//! ```text
//! +----------------------+ offset 0
//! | Header bitmap        | ceil(slots / 8) bytes, bit i%8 of byte i/8 = slot i used
//! +----------------------+
//! | Slot 0               | tuple_size bytes
//! | Slot 1               |
//! | ...                  |
//! +----------------------+
//! | Zero padding         |
//! +----------------------+ offset page_size
//! ```
//!
//! The slot count is the largest `n` with `n * tuple_size + ceil(n / 8) <= page_size`,
//! i.e. `floor(page_size * 8 / (tuple_size * 8 + 1))`.

use std::sync::Arc;

use crate::error::DbError;
use crate::tuple::{Schema, Tuple};

use super::page_id::HeapPageId;
use super::record_id::RecordId;

/// Number of tuple slots on a page of `page_size` bytes.
///
/// Returns `None` if the bit counts overflow `usize`.
pub fn slots_per_page(page_size: usize, tuple_size: usize) -> Option<usize> {
    let page_bits = page_size.checked_mul(8)?;
    let slot_bits = tuple_size.checked_mul(8)?.checked_add(1)?;
    Some(page_bits / slot_bits)
}

/// Number of header bytes for `num_slots` slots.
pub fn header_size(num_slots: usize) -> usize {
    num_slots.div_ceil(8)
}

/// A decoded heap page.
#[derive(Debug)]
pub struct HeapPage {
    id: HeapPageId,
    schema: Arc<Schema>,
    data: Vec<u8>,
    num_slots: usize,
    tuples: Vec<Tuple>,
}

impl HeapPage {
    /// Decodes `data` as a page of tuples of `schema`.
    ///
    /// Every used slot becomes a tuple carrying its [`RecordId`].
    ///
    /// # Errors
    /// `DataCorruption` if the page cannot hold a single tuple, or a used slot
    /// does not decode.
    pub fn new(id: HeapPageId, data: Vec<u8>, schema: Arc<Schema>) -> Result<Self, DbError> {
        let tuple_size = schema.size();
        let num_slots = slots_per_page(data.len(), tuple_size).unwrap_or(0);
        if num_slots == 0 {
            return Err(DbError::DataCorruption(format!(
                "page of {} bytes cannot hold a tuple of {} bytes",
                data.len(),
                tuple_size
            )));
        }

        let header_len = header_size(num_slots);
        let mut tuples = Vec::new();
        for slot in 0..num_slots {
            if !bit_set(&data[..header_len], slot) {
                continue;
            }
            let start = header_len + slot * tuple_size;
            let mut tuple =
                decode_tuple(&schema, &data[start..start + tuple_size]).map_err(|e| {
                    DbError::DataCorruption(format!("page {} slot {}: {}", id, slot, e))
                })?;
            tuple.set_record_id(Some(RecordId::new(id, slot)));
            tuples.push(tuple);
        }

        Ok(Self {
            id,
            schema,
            data,
            num_slots,
            tuples,
        })
    }

    /// Returns the id of this page.
    pub fn id(&self) -> HeapPageId {
        self.id
    }

    /// Returns the schema of the tuples on this page.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns the number of tuple slots.
    pub fn num_slots(&self) -> usize {
        self.num_slots
    }

    /// Returns the number of unused slots.
    pub fn num_empty_slots(&self) -> usize {
        self.num_slots - self.tuples.len()
    }

    /// Returns the number of live tuples.
    pub fn num_tuples(&self) -> usize {
        self.tuples.len()
    }

    /// Returns whether slot `slot` holds a tuple.
    pub fn is_slot_used(&self, slot: usize) -> bool {
        slot < self.num_slots && bit_set(&self.data[..header_size(self.num_slots)], slot)
    }

    /// Returns the raw page bytes, identical to the bytes the page was decoded from.
    pub fn page_data(&self) -> &[u8] {
        &self.data
    }

    /// Returns an iterator over the live tuples in slot order.
    pub fn iterator(self: &Arc<Self>) -> PageTupleIter {
        PageTupleIter {
            page: Arc::clone(self),
            position: 0,
        }
    }

    /// Returns the bytes of a page with no used slots.
    pub fn empty_page_data(page_size: usize) -> Vec<u8> {
        vec![0u8; page_size]
    }

    /// Encodes `tuples` into the slots of a fresh page, in order.
    ///
    /// # Errors
    /// - `InvalidConfig` if `page_size` is too large to address
    /// - `DataCorruption` if more tuples are given than the page has slots
    /// - `TypeMismatch` if a tuple's schema differs from `schema`
    /// - `SerializationError` if a tuple has unset fields
    pub fn encode(schema: &Schema, tuples: &[Tuple], page_size: usize) -> Result<Vec<u8>, DbError> {
        let tuple_size = schema.size();
        let num_slots = slots_per_page(page_size, tuple_size).ok_or_else(|| {
            DbError::InvalidConfig(format!("page size {} is too large", page_size))
        })?;
        if tuples.len() > num_slots {
            return Err(DbError::DataCorruption(format!(
                "{} tuples do not fit in {} slots",
                tuples.len(),
                num_slots
            )));
        }

        let header_len = header_size(num_slots);
        let mut data = Self::empty_page_data(page_size);
        let mut encoded = Vec::with_capacity(tuple_size);
        for (slot, tuple) in tuples.iter().enumerate() {
            if tuple.schema().as_ref() != schema {
                return Err(DbError::TypeMismatch {
                    expected: schema.to_string(),
                    got: tuple.schema().to_string(),
                });
            }
            encoded.clear();
            tuple.serialize(&mut encoded)?;
            let start = header_len + slot * tuple_size;
            data[start..start + tuple_size].copy_from_slice(&encoded);
            data[slot / 8] |= 1 << (slot % 8);
        }
        Ok(data)
    }
}

/// Owned iterator over the live tuples of a page.
#[derive(Debug, Clone)]
pub struct PageTupleIter {
    page: Arc<HeapPage>,
    position: usize,
}

impl PageTupleIter {
    /// Returns whether another tuple remains.
    pub fn has_next(&self) -> bool {
        self.position < self.page.tuples.len()
    }
}

impl Iterator for PageTupleIter {
    type Item = Tuple;

    fn next(&mut self) -> Option<Self::Item> {
        let tuple = self.page.tuples.get(self.position)?.clone();
        self.position += 1;
        Some(tuple)
    }
}

fn bit_set(header: &[u8], slot: usize) -> bool {
    header[slot / 8] & (1 << (slot % 8)) != 0
}

fn decode_tuple(schema: &Arc<Schema>, bytes: &[u8]) -> Result<Tuple, DbError> {
    let mut tuple = Tuple::new(Arc::clone(schema));
    let mut offset = 0;
    for (i, item) in schema.items().enumerate() {
        let value = item.field_type.parse(&bytes[offset..])?;
        offset += item.field_type.len();
        tuple.set_field(i, value)?;
    }
    Ok(tuple)
}
