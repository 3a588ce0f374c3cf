//! KeyedSlots: unique keys mapped to slot-stored values with stable handles.
//!
//! Storage lives in a generational `SlotMap`; a `hashbrown::HashTable` of
//! slot keys indexes it. Every entry keeps the `u64` hash computed when it
//! was inserted, and the index only ever rehashes through that stored
//! value, so `K: Hash` runs once per insertion and once per lookup probe.

use crate::reentrancy::Reentrancy;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_table::Entry as TableEntry;
use hashbrown::HashTable;
use slotmap::{DefaultKey, SlotMap};

/// Index hasher used when none is given: SipHash-1-3 with fixed keys, so
/// index layout is reproducible between runs.
pub type DefaultHashBuilder = core::hash::BuildHasherDefault<siphasher::sip::SipHasher13>;

/// Stable handle to an entry. Stale handles never resolve to a newer entry
/// that reuses the same slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Slot(DefaultKey);

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
}

pub struct KeyedSlots<K, V, S = DefaultHashBuilder> {
    hasher: S,
    index: HashTable<DefaultKey>,
    slots: SlotMap<DefaultKey, Entry<K, V>>,
    reentrancy: Reentrancy,
}

impl<K, V, S: Default> Default for KeyedSlots<K, V, S> {
    fn default() -> Self {
        Self::with_capacity_and_hasher(0, S::default())
    }
}

impl<K, V, S> KeyedSlots<K, V, S> {
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::with_capacity(capacity),
            slots: SlotMap::with_capacity_and_key(capacity),
            reentrancy: Reentrancy::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn value(&self, slot: Slot) -> Option<&V> {
        let _g = self.reentrancy.enter("value");
        self.slots.get(slot.0).map(|e| &e.value)
    }

    pub fn value_mut(&mut self, slot: Slot) -> Option<&mut V> {
        let _g = self.reentrancy.enter("value_mut");
        self.slots.get_mut(slot.0).map(|e| &mut e.value)
    }

    /// Remove the entry behind `slot`, returning its key and value. The
    /// structure is consistent again before `K`/`V` reach the caller.
    pub fn remove(&mut self, slot: Slot) -> Option<(K, V)> {
        let _g = self.reentrancy.enter("remove");
        let entry = self.slots.remove(slot.0)?;
        if let Ok(found) = self.index.find_entry(entry.hash, |&k| k == slot.0) {
            let _ = found.remove();
        }
        Some((entry.key, entry.value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, &K, &V)> + '_ {
        self.slots
            .iter()
            .map(|(k, e)| (Slot(k), &e.key, &e.value))
    }
}

impl<K, V, S> KeyedSlots<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn probe<Q>(&self, hash: u64, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let slots = &self.slots;
        self.index
            .find(hash, |&k| {
                slots
                    .get(k)
                    .map(|e| e.key.borrow() == q)
                    .unwrap_or(false)
            })
            .copied()
    }

    pub fn find<Q>(&self, q: &Q) -> Option<Slot>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("find");
        let hash = self.hasher.hash_one(q);
        self.probe(hash, q).map(Slot)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.find(q)?;
        self.value(slot)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.find(q)?;
        self.value_mut(slot)
    }

    /// Insert `key -> value` unless the key is present. On a duplicate the
    /// rejected pair comes back and the map is left untouched.
    pub fn insert(&mut self, key: K, value: V) -> Result<Slot, (K, V)> {
        let _g = self.reentrancy.enter("insert");
        let hash = self.hasher.hash_one(&key);
        let slots = &mut self.slots;
        match self.index.entry(
            hash,
            |&k| slots.get(k).map(|e| e.key == key).unwrap_or(false),
            |&k| slots.get(k).map(|e| e.hash).unwrap_or(0),
        ) {
            TableEntry::Occupied(_) => Err((key, value)),
            TableEntry::Vacant(v) => {
                let k = slots.insert(Entry { key, value, hash });
                let _ = v.insert(k);
                Ok(Slot(k))
            }
        }
    }

    pub fn remove_key<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.find(q)?;
        self.remove(slot)
    }
}
