//! bucket-store: named buckets of de-duplicated items, each item filed
//! under an identity computed from its own content.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small in-process collection where uniqueness is decided by a
//!   content identity rather than by object identity or `Hash`/`Eq` of the
//!   whole item.
//! - Layers:
//!   - KeyedSlots<K, V, S>: structural map of unique keys to slot-stored
//!     values. Returns stable generational `Slot` handles, keeps each
//!     entry's hash next to it, and guards its entry points against
//!     reentrancy in debug builds.
//!   - Bucket<T, S>: `KeyedSlots<Identity, T>`; the de-duplicating set.
//!   - Store<T, S>: `KeyedSlots<String, Bucket<T>>`; named buckets plus
//!     cross-bucket queries.
//!
//! Constraints
//! - Single-threaded: no locking; the reentrancy guard makes the
//!   containers `!Sync`. Wrap a `Store` in one lock if it must be shared.
//! - Not persistent; nothing leaves the process.
//! - Identity is computed once, on insertion. Stored items are never
//!   re-identified, so mutating one in place does not move it.
//! - Lengths are derived from storage and cannot drift from it on any
//!   path, failed operations included.
//!
//! Identity and equality
//! - `Hashable::identity` may fail. `add` returns the failure as
//!   `StoreError::HashComputationFailed`; `has` treats it as absence, and
//!   so does `remove` on a non-empty bucket (`StoreError::NoItem`).
//! - `has` and `remove` require the stored item to equal the probe
//!   (`PartialEq`), not merely to share its identity.
//! - `add` of an item whose identity is already present is a no-op, even
//!   if the stored item and the new one differ. The first item wins.
//!
//! Hasher
//! - `S: BuildHasher` hashes identities and bucket names for the index.
//!   The default is SipHash-1-3 with fixed keys (`DefaultHashBuilder`),
//!   so behavior is reproducible between runs. Ordering of `buckets()`
//!   and `iter()` is still unspecified.
//!
//! Notes and non-goals
//! - No eviction, transactions, versioning or on-disk format.
//! - `buckets_which_contain` returns the buckets that hold at least one of
//!   the queried items; it does not fall back to listing every bucket.
//! - Logging goes through `tracing` at debug/trace level only; failures are
//!   returned, not logged.

mod bucket;
mod error;
mod identity;
mod keyed_slots;
mod keyed_slots_proptest;
mod reentrancy;
mod store;

// Public surface
pub use bucket::Bucket;
pub use error::StoreError;
pub use identity::{Hashable, Identity, IdentityError};
pub use keyed_slots::DefaultHashBuilder;
pub use store::{BucketsBySize, Store};
