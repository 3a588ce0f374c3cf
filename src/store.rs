//! Store: named buckets and queries across them.

use crate::bucket::Bucket;
use crate::error::StoreError;
use crate::identity::Hashable;
use crate::keyed_slots::{DefaultHashBuilder, KeyedSlots};
use core::fmt;
use core::hash::BuildHasher;
use tracing::debug;

/// Buckets registered under unique names.
///
/// The store owns its buckets: removing a name drops (or hands back) the
/// bucket registered under it. Item operations address a bucket by name and
/// delegate to it.
pub struct Store<T, S = DefaultHashBuilder> {
    buckets: KeyedSlots<String, Bucket<T, S>, S>,
}

impl<T> Store<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T, S: Default> Default for Store<T, S> {
    fn default() -> Self {
        Self {
            buckets: KeyedSlots::default(),
        }
    }
}

impl<T, S> Store<T, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            buckets: KeyedSlots::with_capacity_and_hasher(0, hasher),
        }
    }

    /// Number of registered buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of entries across all buckets.
    pub fn item_count(&self) -> usize {
        self.buckets().map(Bucket::len).sum()
    }

    /// All buckets, in no particular order.
    pub fn buckets(&self) -> impl Iterator<Item = &Bucket<T, S>> + '_ {
        self.buckets.iter().map(|(_slot, _name, bucket)| bucket)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.buckets.iter().map(|(_slot, name, _bucket)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bucket<T, S>)> + '_ {
        self.buckets
            .iter()
            .map(|(_slot, name, bucket)| (name.as_str(), bucket))
    }

    /// Buckets ordered by ascending length, ties by name.
    pub fn buckets_by_size(&self) -> BucketsBySize<'_, T, S> {
        BucketsBySize::new(self.iter().collect())
    }
}

impl<T, S: BuildHasher> Store<T, S> {
    pub fn has_bucket(&self, name: &str) -> bool {
        self.buckets.contains_key(name)
    }

    pub fn get_bucket(&self, name: &str) -> Result<&Bucket<T, S>, StoreError> {
        self.buckets
            .get(name)
            .ok_or_else(|| StoreError::NoSuchBucket(name.to_owned()))
    }

    pub fn get_bucket_mut(&mut self, name: &str) -> Result<&mut Bucket<T, S>, StoreError> {
        self.buckets
            .get_mut(name)
            .ok_or_else(|| StoreError::NoSuchBucket(name.to_owned()))
    }

    /// Register `bucket` under `name`. A taken name is an error and the
    /// bucket already registered there is left in place.
    pub fn add_bucket(
        &mut self,
        name: impl Into<String>,
        bucket: Bucket<T, S>,
    ) -> Result<(), StoreError> {
        let name = name.into();
        debug!(bucket = %name, items = bucket.len(), "registering bucket");
        match self.buckets.insert(name, bucket) {
            Ok(_) => Ok(()),
            Err((name, _rejected)) => Err(StoreError::BucketAlreadyExists(name)),
        }
    }

    /// Discard the bucket registered under `name`, if any. Absent names are
    /// not an error.
    pub fn remove_bucket(&mut self, name: &str) -> Option<Bucket<T, S>> {
        let (name, bucket) = self.buckets.remove_key(name)?;
        debug!(bucket = %name, items = bucket.len(), "discarded bucket");
        Some(bucket)
    }
}

impl<T, S> Store<T, S>
where
    T: Hashable + PartialEq,
    S: BuildHasher,
{
    /// Add `item` to the bucket named `bucket_name`.
    pub fn add(&mut self, bucket_name: &str, item: T) -> Result<(), StoreError> {
        self.get_bucket_mut(bucket_name)?.add(item)
    }

    /// Remove `item` from the bucket named `bucket_name`.
    pub fn remove(&mut self, bucket_name: &str, item: &T) -> Result<T, StoreError> {
        self.get_bucket_mut(bucket_name)?.remove(item)
    }

    /// Every bucket holding at least one of `items`, each listed once.
    pub fn buckets_which_contain(&self, items: &[T]) -> Vec<&Bucket<T, S>> {
        self.buckets()
            .filter(|bucket| items.iter().any(|item| bucket.has(item)))
            .collect()
    }
}

impl<T: fmt::Debug, S> fmt::Debug for Store<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Single-pass cursor over a snapshot of a store's buckets, smallest first.
pub struct BucketsBySize<'a, T, S = DefaultHashBuilder> {
    entries: Vec<(&'a str, &'a Bucket<T, S>)>,
    next: usize,
}

impl<'a, T, S> BucketsBySize<'a, T, S> {
    fn new(mut entries: Vec<(&'a str, &'a Bucket<T, S>)>) -> Self {
        entries.sort_by(|(an, ab), (bn, bb)| ab.len().cmp(&bb.len()).then_with(|| an.cmp(bn)));
        Self { entries, next: 0 }
    }

    /// Buckets not yet yielded.
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.next
    }
}

impl<'a, T, S> Iterator for BucketsBySize<'a, T, S> {
    type Item = (&'a str, &'a Bucket<T, S>);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = *self.entries.get(self.next)?;
        self.next += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

impl<T, S> ExactSizeIterator for BucketsBySize<'_, T, S> {}
