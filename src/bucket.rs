//! Bucket: a de-duplicating set of items keyed by identity.

use crate::error::StoreError;
use crate::identity::{Hashable, Identity};
use crate::keyed_slots::{DefaultHashBuilder, KeyedSlots};
use core::fmt;
use core::hash::BuildHasher;
use tracing::trace;

/// A set of unique items, each filed under the [`Identity`] it had when it
/// was added.
///
/// Identity is computed once per insertion. Mutating a stored item through
/// [`get_mut`](Bucket::get_mut) never moves it; the entry stays under its
/// original identity until removed.
pub struct Bucket<T, S = DefaultHashBuilder> {
    items: KeyedSlots<Identity, T, S>,
}

impl<T> Bucket<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T, S: Default> Default for Bucket<T, S> {
    fn default() -> Self {
        Self {
            items: KeyedSlots::default(),
        }
    }
}

impl<T, S> Bucket<T, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            items: KeyedSlots::with_capacity_and_hasher(capacity, hasher),
        }
    }

    /// Number of unique entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entries with the identity each was filed under. Order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&Identity, &T)> + '_ {
        self.items.iter().map(|(_slot, id, item)| (id, item))
    }

    pub fn identities(&self) -> impl Iterator<Item = &Identity> + '_ {
        self.items.iter().map(|(_slot, id, _item)| id)
    }
}

impl<T, S: BuildHasher> Bucket<T, S> {
    pub fn get(&self, id: &Identity) -> Option<&T> {
        self.items.get(id)
    }

    /// Mutable access to a stored item. The entry keeps its identity even if
    /// the mutation changes what `identity()` would now return.
    pub fn get_mut(&mut self, id: &Identity) -> Option<&mut T> {
        self.items.get_mut(id)
    }

    /// Remove whatever is stored under `id`.
    pub fn take(&mut self, id: &Identity) -> Result<T, StoreError> {
        let (id, item) = self.items.remove_key(id).ok_or(StoreError::NoKey)?;
        trace!(identity = %id, "took item from bucket");
        Ok(item)
    }
}

impl<T, S> Bucket<T, S>
where
    T: Hashable + PartialEq,
    S: BuildHasher,
{
    /// True when an item equal to `item` is stored under `item`'s identity.
    /// An identity that cannot be computed counts as absent.
    pub fn has(&self, item: &T) -> bool {
        match item.identity() {
            Ok(id) => self.items.get(&id).is_some_and(|stored| stored == item),
            Err(_) => false,
        }
    }

    /// Add `item` unless its identity is already present.
    ///
    /// A duplicate is a successful no-op: the bucket keeps the item it
    /// already holds under that identity, even if the two are no longer
    /// equal. A failed identity computation leaves the bucket unchanged.
    pub fn add(&mut self, item: T) -> Result<(), StoreError> {
        let id = item.identity()?;
        match self.items.insert(id, item) {
            Ok(_) => {
                trace!(len = self.items.len(), "added item to bucket");
                Ok(())
            }
            Err(_rejected) => Ok(()),
        }
    }

    /// Remove the stored item equal to `item` and hand it back.
    ///
    /// An empty bucket reports [`StoreError::ZeroItems`] before anything
    /// else is checked. Otherwise an item [`has`](Bucket::has) would not
    /// find, including one whose identity cannot be computed, is
    /// [`StoreError::NoItem`].
    pub fn remove(&mut self, item: &T) -> Result<T, StoreError> {
        if self.items.is_empty() {
            return Err(StoreError::ZeroItems);
        }
        let id = item.identity().map_err(|_| StoreError::NoItem)?;
        let slot = self.items.find(&id).ok_or(StoreError::NoItem)?;
        if self.items.value(slot) != Some(item) {
            return Err(StoreError::NoItem);
        }
        let (id, stored) = self.items.remove(slot).ok_or(StoreError::NoItem)?;
        trace!(identity = %id, len = self.items.len(), "removed item from bucket");
        Ok(stored)
    }
}

impl<T: fmt::Debug, S> fmt::Debug for Bucket<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
