//! GL-004: Prep list — recipes queued for cooking, with quantities.
//!
//! Entries always have a positive count. Setting a count to zero or less
//! removes the entry instead of storing it.

use super::catalog::Catalog;
use super::error::CommandError;
use std::collections::BTreeMap;

/// Recipe ID → quantity, ordered by ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrepList {
    entries: BTreeMap<String, u32>,
}

/// What `PrepList::modify` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepChange {
    Updated(u32),
    Removed,
}

impl PrepList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<u32> {
        self.entries.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by recipe ID.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.entries.iter().map(|(id, n)| (id.as_str(), *n))
    }

    /// Overwrite an entry. Used by the decoder, which has already checked
    /// that `count` is positive.
    pub(crate) fn set(&mut self, id: &str, count: u32) {
        debug_assert!(count > 0);
        self.entries.insert(id.to_string(), count);
    }

    /// Add `count` servings of a catalog recipe, on top of any already queued.
    /// Returns the new total.
    pub fn add(&mut self, catalog: &Catalog, id: &str, count: i64) -> Result<u32, CommandError> {
        let count = positive_count(count)?;
        if !catalog.contains(id) {
            return Err(CommandError::UnknownRecipe { id: id.to_string() });
        }
        let current = self.get(id).unwrap_or(0);
        let total = current
            .checked_add(count)
            .ok_or(CommandError::CountOutOfRange {
                count: i64::from(current) + i64::from(count),
            })?;
        self.entries.insert(id.to_string(), total);
        Ok(total)
    }

    /// Set the count of an entry that is already queued. A count of zero or
    /// less removes it.
    pub fn modify(&mut self, id: &str, count: i64) -> Result<PrepChange, CommandError> {
        let Some(slot) = self.entries.get_mut(id) else {
            return Err(CommandError::NotInPrepList { id: id.to_string() });
        };
        if count <= 0 {
            self.entries.remove(id);
            return Ok(PrepChange::Removed);
        }
        *slot = u32::try_from(count).map_err(|_| CommandError::CountOutOfRange { count })?;
        Ok(PrepChange::Updated(*slot))
    }

    /// Remove an entry. Returns the count it had.
    pub fn delete(&mut self, id: &str) -> Result<u32, CommandError> {
        self.entries
            .remove(id)
            .ok_or_else(|| CommandError::NotInPrepList { id: id.to_string() })
    }

    /// Empty the list, handing back what it held.
    pub fn take(&mut self) -> BTreeMap<String, u32> {
        std::mem::take(&mut self.entries)
    }
}

fn positive_count(count: i64) -> Result<u32, CommandError> {
    if count <= 0 {
        return Err(CommandError::NonPositiveCount { count });
    }
    u32::try_from(count).map_err(|_| CommandError::CountOutOfRange { count })
}
