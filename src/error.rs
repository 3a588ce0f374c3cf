use crate::identity::IdentityError;

/// Failures returned by [`Bucket`](crate::Bucket) and [`Store`](crate::Store).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Nothing is stored under the requested identity.
    #[error("no such key")]
    NoKey,
    /// The bucket holds entries, but not this item.
    #[error("no such item found")]
    NoItem,
    /// The bucket is empty. Reported ahead of any other removal failure.
    #[error("zero items")]
    ZeroItems,
    /// No bucket is registered under this name.
    #[error("no such bucket {0:?}")]
    NoSuchBucket(String),
    /// The name is taken; the bucket registered there is left in place.
    #[error("bucket {0:?} already exists")]
    BucketAlreadyExists(String),
    /// The item's identity could not be computed while adding it.
    #[error(transparent)]
    HashComputationFailed(#[from] IdentityError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_bucket() {
        assert_eq!(
            StoreError::NoSuchBucket("nodes".into()).to_string(),
            "no such bucket \"nodes\""
        );
        assert_eq!(
            StoreError::BucketAlreadyExists("edges".into()).to_string(),
            "bucket \"edges\" already exists"
        );
    }

    #[test]
    fn identity_failure_is_passed_through() {
        let err = StoreError::from(IdentityError::new("boom"));
        assert_eq!(err.to_string(), "identity computation failed: boom");
        assert!(matches!(err, StoreError::HashComputationFailed(_)));
    }
}
