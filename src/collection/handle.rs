//! Shared, identity-stable references to cached resources.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A stable reference to one entry of a [`ResourceCollection`](super::ResourceCollection).
///
/// Reconciliation updates the entry behind a handle in place, so a handle
/// obtained before a refresh observes the refreshed attributes as long as
/// the server still reports the same identity key. Cloning a handle is
/// cheap and yields the same entry.
///
/// Guards returned by [`read`](Self::read) / [`write`](Self::write) must not
/// be held across calls into the client.
pub struct Handle<T>(Arc<RwLock<T>>);

impl<T> Handle<T> {
    pub(crate) fn new(value: T) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write()
    }

    /// Whether both handles point at the same entry.
    pub fn same_as(&self, other: &Handle<T>) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Non-owning back-reference.
    pub fn downgrade(&self) -> WeakHandle<T> {
        WeakHandle(Arc::downgrade(&self.0))
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_read() {
            Some(value) => f.debug_tuple("Handle").field(&*value).finish(),
            None => f.write_str("Handle(<locked>)"),
        }
    }
}

/// Back-reference that does not keep the entry alive.
pub struct WeakHandle<T>(Weak<RwLock<T>>);

impl<T> WeakHandle<T> {
    pub fn upgrade(&self) -> Option<Handle<T>> {
        self.0.upgrade().map(Handle)
    }
}

impl<T> Clone for WeakHandle<T> {
    fn clone(&self) -> Self {
        Self(Weak::clone(&self.0))
    }
}

impl<T> fmt::Debug for WeakHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WeakHandle")
    }
}
