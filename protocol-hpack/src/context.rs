//! The encoding context shared, in lockstep, by an encoder and its peer
//! decoder.
//!
//! A context is a [`HeaderTable`] seeded from the predefined table of its
//! [`Direction`], plus the reference set and touch counts folded into the
//! table's entries. The `process_*` methods are the protocol's state
//! transitions: the encoder and the decoder invoke the same transition for
//! the same representation on the wire, which keeps both contexts equal
//! after every header set.

use crate::error::Result;
use crate::header::{entry_size, validate_name, validate_value};
use crate::static_table::Direction;
use crate::table::{DEFAULT_MAX_SIZE, HeaderEntry, HeaderTable, TableUpdate};

/// Header table plus reference set for one direction of one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingContext {
    direction: Direction,
    table: HeaderTable,
}

impl EncodingContext {
    pub fn new(direction: Direction) -> Self {
        Self::with_max_size(direction, DEFAULT_MAX_SIZE)
    }

    /// Creates a context whose table holds at most `max_size` octets.
    ///
    /// The predefined table is inserted oldest-first, so predefined position
    /// `i` is table index `i`. Seed entries that do not fit are dropped from
    /// the end of the predefined table.
    pub fn with_max_size(direction: Direction, max_size: usize) -> Self {
        let predefined = direction.predefined_table();
        let mut size = 0;
        let seeded = predefined
            .iter()
            .take_while(|(name, value)| {
                size += entry_size(name, value);
                size <= max_size
            })
            .count();

        let mut table = HeaderTable::new(max_size);
        for (name, value) in predefined[..seeded].iter().rev() {
            let update = table.append(name, value);
            debug_assert!(update.evicted.is_empty());
        }
        Self { direction, table }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn table(&self) -> &HeaderTable {
        &self.table
    }

    pub fn header_table_max_size(&self) -> usize {
        self.table.max_size()
    }

    /// Changes the table's maximum size, evicting the oldest entries.
    pub fn set_header_table_max_size(&mut self, max_size: usize) -> TableUpdate {
        let update = self.table.set_max_size(max_size);
        tracing::debug!(
            max_size,
            evicted = update.evicted.len(),
            size = self.table.size(),
            "header table max size changed"
        );
        update
    }

    // -- By-index accessors --

    pub fn name(&self, index: usize) -> Result<&[u8]> {
        Ok(self.table.entry(index)?.name())
    }

    pub fn value(&self, index: usize) -> Result<&[u8]> {
        Ok(self.table.entry(index)?.value())
    }

    pub fn is_referenced(&self, index: usize) -> Result<bool> {
        Ok(self.table.entry(index)?.is_referenced())
    }

    pub fn touch_count(&self, index: usize) -> Result<Option<u32>> {
        Ok(self.table.entry(index)?.touch_count())
    }

    /// Adds `touches` to the entry's touch count, starting from zero if it
    /// is untouched. `add_touches(index, 0)` marks an entry as touched.
    pub fn add_touches(&mut self, index: usize, touches: u32) -> Result<()> {
        self.table.entry_mut(index)?.add_touches(touches);
        Ok(())
    }

    pub fn clear_touches(&mut self, index: usize) -> Result<()> {
        self.table.entry_mut(index)?.clear_touches();
        Ok(())
    }

    /// Resets every touch count, ready for the next header set.
    pub fn clear_all_touches(&mut self) {
        for entry in self.table.iter_mut() {
            entry.clear_touches();
        }
    }

    // -- Lookup --

    pub fn find_index_with_name(&self, name: &[u8]) -> Option<usize> {
        self.table.find_name(name)
    }

    pub fn find_index_with_name_and_value(&self, name: &[u8], value: &[u8]) -> Option<usize> {
        self.table.find_name_value(name, value)
    }

    /// Calls `visit` with every entry and its index, newest first.
    pub fn for_each_entry<F>(&self, mut visit: F)
    where
        F: FnMut(usize, &HeaderEntry),
    {
        for (index, entry) in self.table.iter().enumerate() {
            visit(index, entry);
        }
    }

    /// Indices of entries that are referenced but were not touched during
    /// the current header set, newest first.
    pub fn untouched_references(&self) -> Vec<usize> {
        let mut indices = Vec::new();
        self.for_each_entry(|index, entry| {
            if entry.is_referenced() && entry.touch_count().is_none() {
                indices.push(index);
            }
        });
        indices
    }

    // -- State transitions --

    /// Toggles the entry's membership in the reference set and returns the
    /// new state.
    pub fn process_indexed_header(&mut self, index: usize) -> Result<bool> {
        let entry = self.table.entry_mut(index)?;
        let referenced = !entry.is_referenced();
        entry.set_referenced(referenced);
        Ok(referenced)
    }

    /// Appends `(name, value)` to the table and adds it to the reference
    /// set. `index` is `None` if the entry was too large to store.
    pub fn process_literal_header_with_incremental_indexing(
        &mut self,
        name: &[u8],
        value: &[u8],
    ) -> Result<TableUpdate> {
        let update = self.table.try_append(name, value)?;
        self.mark_referenced(&update)?;
        Ok(update)
    }

    /// Replaces the entry at `substituted_index` with `(name, value)` and
    /// adds the result to the reference set.
    pub fn process_literal_header_with_substitution_indexing(
        &mut self,
        name: &[u8],
        substituted_index: usize,
        value: &[u8],
    ) -> Result<TableUpdate> {
        let update = self.table.try_replace(substituted_index, name, value)?;
        self.mark_referenced(&update)?;
        Ok(update)
    }

    /// Validates a literal that is not indexed. The context is unchanged.
    pub fn process_literal_header_without_indexing(&self, name: &[u8], value: &[u8]) -> Result<()> {
        validate_name(name)?;
        validate_value(value)
    }

    fn mark_referenced(&mut self, update: &TableUpdate) -> Result<()> {
        if let Some(index) = update.index {
            self.table.entry_mut(index)?.set_referenced(true);
        }
        Ok(())
    }
}
