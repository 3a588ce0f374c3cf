//! Item identity: the key a bucket files an item under.

use core::cell::RefCell;
use core::fmt;
use std::error::Error as StdError;
use std::rc::Rc;
use std::sync::Arc;

/// Deterministic, content-derived identity of an item.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Identity {
    Text(String),
    Number(u64),
}

impl Identity {
    /// Identity of any serializable value: its JSON encoding hashed with
    /// xxh64 (seed 0). Fails when the value cannot be encoded, e.g. a map
    /// whose keys are not strings.
    #[cfg(feature = "digest")]
    pub fn digest<T>(value: &T) -> Result<Self, IdentityError>
    where
        T: ?Sized + serde::Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        Ok(Identity::Number(xxhash_rust::xxh64::xxh64(&bytes, 0)))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Text(s) => f.write_str(s),
            Identity::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<String> for Identity {
    fn from(s: String) -> Self {
        Identity::Text(s)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Identity::Text(s.to_owned())
    }
}

impl From<u64> for Identity {
    fn from(n: u64) -> Self {
        Identity::Number(n)
    }
}

impl From<u32> for Identity {
    fn from(n: u32) -> Self {
        Identity::Number(n.into())
    }
}

impl From<usize> for Identity {
    fn from(n: usize) -> Self {
        Identity::Number(n as u64)
    }
}

/// The identity of an item could not be computed.
#[derive(Debug, thiserror::Error)]
#[error("identity computation failed: {message}")]
pub struct IdentityError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl IdentityError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(feature = "digest")]
impl From<serde_json::Error> for IdentityError {
    fn from(err: serde_json::Error) -> Self {
        IdentityError::with_source("content is not serializable", err)
    }
}

/// Capability of producing an [`Identity`] from content.
///
/// Implementations must be pure: the same content yields the same identity
/// on every call. Buckets call this once when an item is stored and never
/// again for that stored item, so later mutation does not move it.
pub trait Hashable {
    fn identity(&self) -> Result<Identity, IdentityError>;
}

impl Hashable for Identity {
    fn identity(&self) -> Result<Identity, IdentityError> {
        Ok(self.clone())
    }
}

impl Hashable for str {
    fn identity(&self) -> Result<Identity, IdentityError> {
        Ok(Identity::from(self))
    }
}

impl Hashable for String {
    fn identity(&self) -> Result<Identity, IdentityError> {
        Ok(Identity::from(self.as_str()))
    }
}

macro_rules! number_identity {
    ($($t:ty),*) => {
        $(
            impl Hashable for $t {
                fn identity(&self) -> Result<Identity, IdentityError> {
                    Ok(Identity::from(*self))
                }
            }
        )*
    };
}

number_identity!(u64, u32, usize);

impl<T: ?Sized + Hashable> Hashable for &T {
    fn identity(&self) -> Result<Identity, IdentityError> {
        (**self).identity()
    }
}

impl<T: ?Sized + Hashable> Hashable for Box<T> {
    fn identity(&self) -> Result<Identity, IdentityError> {
        (**self).identity()
    }
}

impl<T: ?Sized + Hashable> Hashable for Rc<T> {
    fn identity(&self) -> Result<Identity, IdentityError> {
        (**self).identity()
    }
}

impl<T: ?Sized + Hashable> Hashable for Arc<T> {
    fn identity(&self) -> Result<Identity, IdentityError> {
        (**self).identity()
    }
}

/// Fails while the cell is mutably borrowed.
impl<T: ?Sized + Hashable> Hashable for RefCell<T> {
    fn identity(&self) -> Result<Identity, IdentityError> {
        let inner = self
            .try_borrow()
            .map_err(|e| IdentityError::with_source("item is being mutated", e))?;
        inner.identity()
    }
}
