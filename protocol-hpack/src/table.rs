//! The header table.
//!
//! An ordered, size-bounded list of header entries shared (by construction,
//! not by reference) between an encoder and its peer decoder. Index 0 is the
//! most recently inserted entry; eviction always removes the entry with the
//! highest index, i.e. the oldest one.
//!
//! Each entry also carries the reference-set bookkeeping of the context that
//! owns the table: whether it is currently referenced, and how many times it
//! has been touched during the current header set. Keeping those flags inside
//! the entries means eviction and insertion renumber them for free.

use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::header::{constant_time_eq, entry_size, validate_name, validate_value};
use crate::metrics::TABLE_EVICTIONS;

/// Default maximum table size in octets.
pub const DEFAULT_MAX_SIZE: usize = 4096;

/// A header table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    name: Vec<u8>,
    value: Vec<u8>,
    referenced: bool,
    touch_count: Option<u32>,
}

impl HeaderEntry {
    fn new(name: &[u8], value: &[u8]) -> Self {
        Self {
            name: name.to_vec(),
            value: value.to_vec(),
            referenced: false,
            touch_count: None,
        }
    }

    pub fn name(&self) -> &[u8] {
        &self.name
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// `len(name) + len(value) + 32`.
    pub fn size(&self) -> usize {
        entry_size(&self.name, &self.value)
    }

    /// Whether the entry is in the reference set.
    pub fn is_referenced(&self) -> bool {
        self.referenced
    }

    /// Touches during the current header set. `None` means untouched, which
    /// is different from `Some(0)`.
    pub fn touch_count(&self) -> Option<u32> {
        self.touch_count
    }

    pub(crate) fn set_referenced(&mut self, referenced: bool) {
        self.referenced = referenced;
    }

    pub(crate) fn add_touches(&mut self, touches: u32) {
        *self.touch_count.get_or_insert(0) += touches;
    }

    pub(crate) fn clear_touches(&mut self) {
        self.touch_count = None;
    }
}

/// Outcome of a table mutation.
///
/// Indices in `evicted` and `replaced` refer to the table as it was before
/// the mutation. Use [`renumber`](Self::renumber) to carry any other
/// pre-mutation index over to the table after it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableUpdate {
    /// Index of the new or replaced entry, or `None` if it was not stored.
    pub index: Option<usize>,
    /// Evicted entries, oldest first.
    pub evicted: Vec<usize>,
    /// Entry overwritten in place by a replacement.
    pub replaced: Option<usize>,
    /// How far surviving entries moved (1 when an entry was inserted).
    pub shift: usize,
}

impl TableUpdate {
    /// Maps a pre-mutation index to the index of the same logical entry
    /// after the mutation, or `None` if that entry is gone.
    pub fn renumber(&self, old_index: usize) -> Option<usize> {
        if self.evicted.contains(&old_index) || self.replaced == Some(old_index) {
            None
        } else {
            Some(old_index + self.shift)
        }
    }
}

// Result of sizing a mutation without applying it.
struct EvictionPlan {
    evict: usize,
    fits: bool,
    target_evicted: bool,
}

/// Ordered, size-bounded header table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTable {
    entries: VecDeque<HeaderEntry>,
    size: usize,
    max_size: usize,
}

impl Default for HeaderTable {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE)
    }
}

impl HeaderTable {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            size: 0,
            max_size,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of the sizes of all entries.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn get(&self, index: usize) -> Option<&HeaderEntry> {
        self.entries.get(index)
    }

    /// Like [`get`](Self::get), failing with [`Error::InvalidIndex`].
    pub fn entry(&self, index: usize) -> Result<&HeaderEntry> {
        self.entries.get(index).ok_or(Error::InvalidIndex(index))
    }

    pub(crate) fn entry_mut(&mut self, index: usize) -> Result<&mut HeaderEntry> {
        self.entries.get_mut(index).ok_or(Error::InvalidIndex(index))
    }

    /// Entries from newest (index 0) to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &HeaderEntry> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut HeaderEntry> {
        self.entries.iter_mut()
    }

    /// Index of the first entry named `name`.
    pub fn find_name(&self, name: &[u8]) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| constant_time_eq(&e.name, name))
    }

    /// Index of the first entry matching both `name` and `value`.
    pub fn find_name_value(&self, name: &[u8], value: &[u8]) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| constant_time_eq(&e.name, name) & constant_time_eq(&e.value, value))
    }

    // Sizes a mutation that adds `new_size` octets and, if `target` is set,
    // drops the entry at `target` (unless it is evicted first).
    fn plan(&self, target: Option<usize>, new_size: usize) -> EvictionPlan {
        let len = self.entries.len();
        let target_size = target.map_or(0, |i| self.entries[i].size());
        let mut evict = 0;
        let mut evicted_size = 0;
        let mut target_evicted = false;

        let after = |evicted_size: usize, target_evicted: bool| {
            let kept_target = if target_evicted { 0 } else { target_size };
            self.size - evicted_size - kept_target + new_size
        };

        while evict < len && after(evicted_size, target_evicted) > self.max_size {
            let victim = len - 1 - evict;
            evicted_size += self.entries[victim].size();
            if target == Some(victim) {
                target_evicted = true;
            }
            evict += 1;
        }

        EvictionPlan {
            evict,
            fits: after(evicted_size, target_evicted) <= self.max_size,
            target_evicted,
        }
    }

    fn evicted_indices(&self, count: usize) -> Vec<usize> {
        let len = self.entries.len();
        (0..count).map(|i| len - 1 - i).collect()
    }

    fn evict(&mut self, count: usize) {
        for _ in 0..count {
            if let Some(evicted) = self.entries.pop_back() {
                self.size -= evicted.size();
            }
        }
        if count > 0 {
            TABLE_EVICTIONS.add(count as u64);
            tracing::debug!(
                evicted = count,
                size = self.size,
                max_size = self.max_size,
                "header table eviction"
            );
        }
    }

    /// Pre-mutation indices that [`try_append`](Self::try_append) would evict
    /// for this entry, oldest first.
    pub fn plan_append(&self, name: &[u8], value: &[u8]) -> Vec<usize> {
        let plan = self.plan(None, entry_size(name, value));
        self.evicted_indices(plan.evict)
    }

    /// Pre-mutation indices that [`try_replace`](Self::try_replace) would
    /// evict, oldest first. May include `index` itself.
    pub fn plan_replace(&self, index: usize, name: &[u8], value: &[u8]) -> Result<Vec<usize>> {
        self.entry(index)?;
        let plan = self.plan(Some(index), entry_size(name, value));
        Ok(self.evicted_indices(plan.evict))
    }

    /// Inserts a new entry at index 0, evicting the oldest entries until it
    /// fits. An entry larger than the maximum size empties the table and is
    /// not stored (`index` is `None`).
    pub fn try_append(&mut self, name: &[u8], value: &[u8]) -> Result<TableUpdate> {
        validate_name(name)?;
        validate_value(value)?;
        Ok(self.append(name, value))
    }

    // Append without validation, for seed entries.
    pub(crate) fn append(&mut self, name: &[u8], value: &[u8]) -> TableUpdate {
        let entry = HeaderEntry::new(name, value);
        let plan = self.plan(None, entry.size());
        let evicted = self.evicted_indices(plan.evict);
        self.evict(plan.evict);

        if !plan.fits {
            return TableUpdate {
                evicted,
                ..Default::default()
            };
        }
        self.size += entry.size();
        self.entries.push_front(entry);
        TableUpdate {
            index: Some(0),
            evicted,
            replaced: None,
            shift: 1,
        }
    }

    /// Replaces the entry at `index`, evicting the oldest entries until the
    /// replacement fits. If the entry at `index` is itself evicted on the
    /// way, the replacement is inserted at index 0 like a fresh append.
    pub fn try_replace(&mut self, index: usize, name: &[u8], value: &[u8]) -> Result<TableUpdate> {
        validate_name(name)?;
        validate_value(value)?;
        self.entry(index)?;

        let entry = HeaderEntry::new(name, value);
        let plan = self.plan(Some(index), entry.size());
        let evicted = self.evicted_indices(plan.evict);
        self.evict(plan.evict);

        if !plan.fits {
            return Ok(TableUpdate {
                evicted,
                ..Default::default()
            });
        }
        if plan.target_evicted {
            self.size += entry.size();
            self.entries.push_front(entry);
            return Ok(TableUpdate {
                index: Some(0),
                evicted,
                replaced: None,
                shift: 1,
            });
        }

        let old = std::mem::replace(&mut self.entries[index], entry);
        self.size = self.size - old.size() + self.entries[index].size();
        Ok(TableUpdate {
            index: Some(index),
            evicted,
            replaced: Some(index),
            shift: 0,
        })
    }

    /// Changes the maximum size, evicting the oldest entries until the
    /// table fits.
    pub fn set_max_size(&mut self, max_size: usize) -> TableUpdate {
        self.max_size = max_size;
        let mut evict = 0;
        let mut size = self.size;
        let len = self.entries.len();
        while size > max_size && evict < len {
            size -= self.entries[len - 1 - evict].size();
            evict += 1;
        }
        let evicted = self.evicted_indices(evict);
        self.evict(evict);
        TableUpdate {
            evicted,
            ..Default::default()
        }
    }
}
