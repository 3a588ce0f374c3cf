// Bucket integration tests.
//
// Invariants exercised:
// - Uniqueness: one entry per identity; repeated adds are successful no-ops.
// - Stable filing: an entry stays under the identity it was added with,
//   whatever happens to the item afterwards.
// - Membership: `has` needs an equal item under the probe's identity.
// - Removal: empty bucket -> ZeroItems, otherwise missing (including an
//   item whose identity cannot be computed) -> NoItem.
// - Length never moves on a failed operation.
use bucket_store::{Bucket, Hashable, Identity, IdentityError, StoreError};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
struct TestItem {
    name: String,
    surname: String,
    uid: u64,
}

impl TestItem {
    fn new(name: &str, uid: u64) -> Self {
        Self {
            name: name.to_string(),
            surname: String::new(),
            uid,
        }
    }
}

impl Hashable for TestItem {
    fn identity(&self) -> Result<Identity, IdentityError> {
        Ok(Identity::from(self.uid.to_string()))
    }
}

#[test]
fn new_bucket_is_empty() {
    let bucket: Bucket<TestItem> = Bucket::new();
    assert_eq!(bucket.len(), 0);
    assert!(bucket.is_empty());
    assert_eq!(bucket.iter().count(), 0);
}

#[test]
fn add_is_idempotent() {
    let mut bucket = Bucket::new();
    let something = TestItem::new("Foo", 1);
    bucket.add(something.clone()).unwrap();
    assert_eq!(bucket.len(), 1);
    bucket.add(something).unwrap();
    assert_eq!(bucket.len(), 1);
}

// Shared items: the caller keeps a handle to the stored item, mutates a
// field that is not part of its identity and adds it again.
#[test]
fn mutation_after_insert_does_not_rekey() {
    let mut bucket = Bucket::new();
    let something = Rc::new(RefCell::new(TestItem::new("Foo", 1)));
    bucket.add(Rc::clone(&something)).unwrap();

    something.borrow_mut().surname = "Bar".to_string();
    // The change is visible through the bucket.
    let stored = bucket.get(&Identity::from("1")).unwrap();
    assert_eq!(stored.borrow().surname, "Bar");

    bucket.add(Rc::clone(&something)).unwrap();
    assert_eq!(bucket.len(), 1);
    assert!(bucket.has(&something));
}

// Changing the identity-bearing field of a shared item leaves the entry
// where it was filed.
#[test]
fn identity_change_after_insert_keeps_original_key() {
    let mut bucket = Bucket::new();
    let something = Rc::new(RefCell::new(TestItem::new("Foo", 1)));
    bucket.add(Rc::clone(&something)).unwrap();
    something.borrow_mut().uid = 2;

    assert_eq!(
        bucket.identities().cloned().collect::<Vec<_>>(),
        vec![Identity::from("1")]
    );
    assert!(!bucket.has(&something));
    bucket.add(Rc::clone(&something)).unwrap();
    assert_eq!(bucket.len(), 2);
}

#[test]
fn remove_reports_missing_then_empty() {
    let mut bucket = Bucket::new();
    let missing = TestItem::new("Bar", 2);
    let something = TestItem::new("Foo", 1);
    bucket.add(something.clone()).unwrap();

    let err = bucket.remove(&missing).unwrap_err();
    assert!(matches!(err, StoreError::NoItem));
    assert_eq!(err.to_string(), "no such item found");
    assert_eq!(bucket.len(), 1);

    assert_eq!(bucket.remove(&something).unwrap(), something);
    assert_eq!(bucket.len(), 0);

    let err = bucket.remove(&missing).unwrap_err();
    assert!(matches!(err, StoreError::ZeroItems));
    assert_eq!(err.to_string(), "zero items");
}

#[test]
fn has_only_added_items() {
    let mut bucket = Bucket::new();
    let something_else = TestItem::new("Bar", 2);
    let something = TestItem::new("Foo", 1);
    bucket.add(something.clone()).unwrap();
    assert!(bucket.has(&something));
    assert!(!bucket.has(&something_else));
}

// Identity failure while a shared item is mutably borrowed.
#[test]
fn borrowed_item_cannot_be_added() {
    let mut bucket = Bucket::new();
    let cell = Rc::new(RefCell::new(TestItem::new("Foo", 1)));
    let guard = cell.borrow_mut();
    let err = bucket.add(Rc::clone(&cell)).unwrap_err();
    assert!(matches!(err, StoreError::HashComputationFailed(_)));
    assert!(bucket.is_empty());
    drop(guard);
    bucket.add(cell).unwrap();
    assert_eq!(bucket.len(), 1);
}

#[test]
fn failed_remove_leaves_length_alone() {
    let mut bucket = Bucket::new();
    let cell = Rc::new(RefCell::new(TestItem::new("Foo", 1)));
    bucket.add(Rc::clone(&cell)).unwrap();
    {
        let _guard = cell.borrow_mut();
        // The bucket is not empty, and `has` cannot see a mutably borrowed
        // item, so it is reported missing.
        assert!(!bucket.has(&cell));
        let err = bucket.remove(&cell).unwrap_err();
        assert!(matches!(err, StoreError::NoItem));
    }
    assert_eq!(bucket.len(), 1);
    bucket.remove(&cell).unwrap();
    assert!(bucket.is_empty());
}

#[test]
fn plain_values_are_their_own_identity() {
    let mut words = Bucket::new();
    for w in ["nodes", "edges", "nodes"] {
        words.add(w.to_string()).unwrap();
    }
    assert_eq!(words.len(), 2);
    assert_eq!(words.take(&Identity::from("edges")).unwrap(), "edges");
    assert!(matches!(
        words.take(&Identity::from("edges")),
        Err(StoreError::NoKey)
    ));
}

#[cfg(feature = "digest")]
mod digest {
    use super::*;
    use serde::Serialize;

    #[derive(Clone, Debug, PartialEq, Serialize)]
    struct Edge {
        from: u32,
        to: u32,
        weight: u32,
    }

    impl Hashable for Edge {
        fn identity(&self) -> Result<Identity, IdentityError> {
            Identity::digest(&(self.from, self.to))
        }
    }

    #[test]
    fn digest_identity_dedups_by_content() {
        let mut edges = Bucket::new();
        edges.add(Edge { from: 1, to: 2, weight: 5 }).unwrap();
        edges.add(Edge { from: 1, to: 2, weight: 9 }).unwrap();
        edges.add(Edge { from: 2, to: 1, weight: 5 }).unwrap();
        assert_eq!(edges.len(), 2);
        assert!(edges.has(&Edge { from: 1, to: 2, weight: 5 }));
        assert!(!edges.has(&Edge { from: 1, to: 2, weight: 9 }));
    }
}
