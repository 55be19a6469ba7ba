//! # Collections and reconciliation
//!
//! Sub-resources (cartridges, environment variables, aliases, gear groups,
//! applications, domains) are held in a [`ResourceCollection`]: an ordered,
//! identity-keyed set of [`Handle`]s. Converging a cached collection to a
//! fresh server listing goes through [`reconcile`], which keeps the handle
//! of every entry whose identity key survives and only swaps its attributes.

pub mod handle;
pub mod reconcile;

use std::collections::HashMap;

use crate::errors::ClientError;

pub use handle::{Handle, WeakHandle};
pub use reconcile::reconcile;

/// A resource with a stable identity key and mutable attributes.
pub trait Identified: Send + Sync + 'static {
    /// Kind name used in errors and logs ("environment variable", ...).
    const KIND: &'static str;

    /// Stable key within a collection of this kind (name or uuid).
    fn identity(&self) -> &str;

    /// Overwrite every mutable attribute (links included) from a freshly
    /// fetched copy with the same identity key.
    fn absorb(&mut self, fresh: Self)
    where
        Self: Sized;
}

/// Ordered, identity-keyed set of resources owned by one parent.
///
/// No two entries share an identity key.
pub struct ResourceCollection<T> {
    entries: Vec<Handle<T>>,
    index: HashMap<String, usize>,
}

impl<T> Default for ResourceCollection<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ResourceCollection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

impl<T: Identified> ResourceCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Handle<T>> {
        self.entries.iter()
    }

    /// Snapshot of all handles in collection order.
    pub fn handles(&self) -> Vec<Handle<T>> {
        self.entries.clone()
    }

    /// Identity keys in collection order.
    pub fn keys(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|h| h.read().identity().to_string())
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<Handle<T>> {
        self.index.get(key).map(|&i| self.entries[i].clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Append a new entry. Fails if the key is already present.
    pub fn insert(&mut self, item: T) -> Result<Handle<T>, ClientError> {
        let key = item.identity().to_string();
        if self.index.contains_key(&key) {
            return Err(ClientError::DuplicateResource { kind: T::KIND, key });
        }
        let handle = Handle::new(item);
        self.push(key, handle.clone());
        Ok(handle)
    }

    /// Remove by identity key, returning the detached handle.
    pub fn remove(&mut self, key: &str) -> Option<Handle<T>> {
        let position = self.index.remove(key)?;
        let handle = self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(handle)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    fn push(&mut self, key: String, handle: Handle<T>) {
        self.index.insert(key, self.entries.len());
        self.entries.push(handle);
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    fn entry_at(&self, position: usize) -> &Handle<T> {
        &self.entries[position]
    }

    fn into_entries(self) -> Vec<Handle<T>> {
        self.entries
    }
}

impl<T: Identified> FromIterator<T> for ResourceCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        reconcile(ResourceCollection::new(), iter.into_iter().collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct Item {
        pub key: String,
        pub value: u32,
    }

    pub(crate) fn item(key: &str, value: u32) -> Item {
        Item {
            key: key.to_string(),
            value,
        }
    }

    impl Identified for Item {
        const KIND: &'static str = "item";

        fn identity(&self) -> &str {
            &self.key
        }

        fn absorb(&mut self, fresh: Self) {
            self.value = fresh.value;
        }
    }

    #[test]
    fn test_insert_rejects_duplicate_key() {
        let mut coll = ResourceCollection::new();
        coll.insert(item("FOO", 1)).unwrap();
        let err = coll.insert(item("FOO", 2)).unwrap_err();
        assert!(matches!(
            err,
            ClientError::DuplicateResource { kind: "item", ref key } if key == "FOO"
        ));
        assert_eq!(coll.len(), 1);
        assert_eq!(coll.get("FOO").unwrap().read().value, 1);
    }

    #[test]
    fn test_remove_keeps_index_consistent() {
        let mut coll: ResourceCollection<Item> =
            vec![item("a", 1), item("b", 2), item("c", 3)].into_iter().collect();
        let removed = coll.remove("a").unwrap();
        assert_eq!(removed.read().key, "a");
        assert_eq!(coll.keys(), vec!["b", "c"]);
        assert_eq!(coll.get("c").unwrap().read().value, 3);
        assert!(coll.remove("a").is_none());
        coll.insert(item("a", 4)).unwrap();
        assert_eq!(coll.keys(), vec!["b", "c", "a"]);
    }
}
