//! Lazily loaded, refresh-aware sub-resource caches.
//!
//! A [`CollectionCache`] backs one typed collection of a parent resource
//! (an application's environment variables, a domain's applications, ...).
//! It is bound to the list operation that fills it:
//!
//! ```text
//!             load (op advertised, fetch ok)
//! Unloaded ──────────────────────────────────▶ Loaded
//!    │  ▲                                        │
//!    │  └────────────── invalidate ──────────────┤
//!    │  ▲                                        │
//!    │  └────────────── invalidate ───────┐      │
//!    │ load (op not advertised)           │      │
//!    └──────────────────────────────▶ Unsupported
//! ```
//!
//! Invalidation keeps the last loaded entries as the base for the next
//! reconciliation, so handles survive a refresh of the parent.

use crate::collection::{reconcile, Handle, Identified, ResourceCollection};
use crate::errors::ClientError;
use crate::links::{LinkMap, Params, RequestDescriptor};

/// Load state of a [`CollectionCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Not fetched since construction or the last invalidation.
    Unloaded,
    /// Holds the result of the last successful fetch (plus local edits).
    Loaded,
    /// The parent does not advertise the list operation; permanently empty
    /// until the next invalidation.
    Unsupported,
}

/// Cache for one typed sub-resource collection.
#[derive(Debug)]
pub struct CollectionCache<T> {
    operation: &'static str,
    status: CacheStatus,
    collection: ResourceCollection<T>,
}

impl<T: Identified> CollectionCache<T> {
    /// A cache filled through `operation` (e.g. `LIST_ENVIRONMENT_VARIABLES`).
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            status: CacheStatus::Unloaded,
            collection: ResourceCollection::new(),
        }
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn status(&self) -> CacheStatus {
        self.status
    }

    /// Return the cached collection, fetching it at most once.
    ///
    /// If `links` lacks the list operation the collection is empty and no
    /// fetch happens, now or on later calls. A failed fetch leaves the cache
    /// exactly as it was.
    pub fn load<F>(&mut self, links: &LinkMap, fetch: F) -> Result<&ResourceCollection<T>, ClientError>
    where
        F: FnOnce(RequestDescriptor) -> Result<Vec<T>, ClientError>,
    {
        if self.status != CacheStatus::Unloaded {
            return Ok(&self.collection);
        }

        if !links.has(self.operation) {
            log::debug!(
                "{} does not advertise {}; treating {} collection as empty",
                links.owner(),
                self.operation,
                T::KIND
            );
            self.collection.clear();
            self.status = CacheStatus::Unsupported;
            return Ok(&self.collection);
        }

        let request = links.resolve(self.operation, Params::new())?;
        let fresh = fetch(request)?;

        let previous = std::mem::take(&mut self.collection);
        self.collection = reconcile(previous, fresh);
        self.status = CacheStatus::Loaded;
        Ok(&self.collection)
    }

    /// The collection, if it is currently loaded.
    pub fn loaded(&self) -> Option<&ResourceCollection<T>> {
        match self.status {
            CacheStatus::Loaded => Some(&self.collection),
            _ => None,
        }
    }

    /// Mutable access for single-item add/remove on a loaded collection.
    pub fn loaded_mut(&mut self) -> Option<&mut ResourceCollection<T>> {
        match self.status {
            CacheStatus::Loaded => Some(&mut self.collection),
            _ => None,
        }
    }

    /// Adopt a newly created item.
    ///
    /// Inserted into the live collection when it is loaded; otherwise the
    /// next load picks the item up from the server and the returned handle
    /// stays standalone.
    pub fn insert(&mut self, item: T) -> Result<Handle<T>, ClientError> {
        match self.loaded_mut() {
            Some(collection) => collection.insert(item),
            None => Ok(Handle::new(item)),
        }
    }

    /// Drop an item from the live collection after a successful delete.
    pub fn remove(&mut self, key: &str) -> Option<Handle<T>> {
        self.loaded_mut().and_then(|collection| collection.remove(key))
    }

    /// Forget the load state; the next [`load`](Self::load) re-checks the
    /// link map and refetches. Entries are kept only as reconciliation base.
    pub fn invalidate(&mut self) {
        if self.status != CacheStatus::Unloaded {
            log::debug!("invalidating {} cache ({})", T::KIND, self.operation);
        }
        self.status = CacheStatus::Unloaded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::tests::{item, Item};
    use crate::errors::TransportError;
    use crate::links::{HttpMethod, LinkDescriptor};
    use std::cell::Cell;

    const LIST: &str = "LIST_ITEMS";

    fn links_with_list() -> LinkMap {
        LinkMap::from_links([LinkDescriptor::new(LIST, HttpMethod::Get, "https://h/items")])
    }

    #[test]
    fn test_unsupported_never_fetches() {
        let mut cache = CollectionCache::<Item>::new(LIST);
        let calls = Cell::new(0);
        for _ in 0..3 {
            let coll = cache
                .load(&LinkMap::default(), |_| {
                    calls.set(calls.get() + 1);
                    Ok(vec![item("a", 1)])
                })
                .unwrap();
            assert!(coll.is_empty());
        }
        assert_eq!(calls.get(), 0);
        assert_eq!(cache.status(), CacheStatus::Unsupported);
    }

    #[test]
    fn test_loads_exactly_once() {
        let mut cache = CollectionCache::<Item>::new(LIST);
        let calls = Cell::new(0);
        let links = links_with_list();
        for _ in 0..3 {
            let coll = cache
                .load(&links, |req| {
                    assert_eq!(req.url, "https://h/items");
                    calls.set(calls.get() + 1);
                    Ok(vec![item("a", 1)])
                })
                .unwrap();
            assert_eq!(coll.len(), 1);
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_failed_fetch_leaves_cache_untouched() {
        let mut cache = CollectionCache::<Item>::new(LIST);
        let links = links_with_list();
        cache.load(&links, |_| Ok(vec![item("a", 1)])).unwrap();
        let held = cache.loaded().unwrap().get("a").unwrap();

        cache.invalidate();
        let err = cache
            .load(&links, |_| Err(TransportError::Timeout("mock".into()).into()))
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(TransportError::Timeout(_))));
        assert_eq!(cache.status(), CacheStatus::Unloaded);

        let coll = cache.load(&links, |_| Ok(vec![item("a", 7)])).unwrap();
        assert!(held.same_as(&coll.get("a").unwrap()));
        assert_eq!(held.read().value, 7);
    }

    #[test]
    fn test_invalidate_rechecks_capability() {
        let mut cache = CollectionCache::<Item>::new(LIST);
        cache.load(&LinkMap::default(), |_| Ok(Vec::new())).unwrap();
        assert_eq!(cache.status(), CacheStatus::Unsupported);

        cache.invalidate();
        let coll = cache
            .load(&links_with_list(), |_| Ok(vec![item("a", 1)]))
            .unwrap();
        assert_eq!(coll.len(), 1);

        cache.invalidate();
        let coll = cache.load(&LinkMap::default(), |_| Ok(vec![item("b", 1)])).unwrap();
        assert!(coll.is_empty());
    }

    #[test]
    fn test_loaded_mut_only_when_loaded() {
        let mut cache = CollectionCache::<Item>::new(LIST);
        assert!(cache.loaded_mut().is_none());
        cache.load(&links_with_list(), |_| Ok(Vec::new())).unwrap();
        cache.loaded_mut().unwrap().insert(item("x", 1)).unwrap();
        assert_eq!(cache.loaded().unwrap().keys(), vec!["x"]);
    }

    #[test]
    fn test_insert_and_remove_touch_only_loaded_collection() {
        let mut cache = CollectionCache::<Item>::new(LIST);
        let standalone = cache.insert(item("x", 1)).unwrap();
        assert_eq!(standalone.read().value, 1);
        assert!(cache.remove("x").is_none());

        cache.load(&links_with_list(), |_| Ok(vec![item("a", 1)])).unwrap();
        assert!(matches!(
            cache.insert(item("a", 2)),
            Err(ClientError::DuplicateResource { .. })
        ));
        cache.insert(item("b", 2)).unwrap();
        assert!(cache.remove("a").is_some());
        assert_eq!(cache.loaded().unwrap().keys(), vec!["b"]);
    }
}
