//! Debug-only reentrancy guard for slot maps.
//!
//! `KeyedSlots` runs user code (`K: Eq`, `K: Hash`) while its index and
//! storage are being probed. A guard records which operation currently
//! holds the structure so that a nested call coming from that user code is
//! caught in debug builds, with both operation names in the panic message.
//! Release builds compile the guard away.

use core::cell::Cell;
#[cfg(not(debug_assertions))]
use core::marker::PhantomData;

/// Tracks the operation that currently holds a structure.
#[derive(Debug, Default)]
pub(crate) struct Reentrancy {
    #[cfg(debug_assertions)]
    holder: Cell<Option<&'static str>>,
    // Cell keeps the owner !Sync in release builds as well.
    #[cfg(not(debug_assertions))]
    _nosync: PhantomData<Cell<()>>,
}

impl Reentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            holder: Cell::new(None),
            #[cfg(not(debug_assertions))]
            _nosync: PhantomData,
        }
    }

    /// Enter the structure on behalf of `op`. Panics in debug builds when
    /// another operation is still inside.
    #[inline]
    pub(crate) fn enter(&self, op: &'static str) -> Held<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.holder.get() {
                panic!("reentrant call to `{op}` while `{outer}` is in progress");
            }
            self.holder.set(Some(op));
            Held { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            Held { _owner: PhantomData }
        }
    }

    #[cfg(all(test, debug_assertions))]
    fn holder(&self) -> Option<&'static str> {
        self.holder.get()
    }
}

/// Released on drop.
pub(crate) struct Held<'a> {
    #[cfg(debug_assertions)]
    owner: &'a Reentrancy,
    #[cfg(not(debug_assertions))]
    _owner: PhantomData<&'a Reentrancy>,
}

impl Drop for Held<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.holder.set(None);
    }
}
