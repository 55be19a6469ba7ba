//! Identity-preserving merge of a fresh listing into a cached collection.

use std::collections::HashMap;

use super::{Handle, Identified, ResourceCollection};

/// Converge `old` to `fresh`.
///
/// - a key present in both keeps the old handle; its attributes are
///   overwritten from the fresh item
/// - a key only in `fresh` gets a new handle
/// - a key only in `old` is dropped
///
/// The result is ordered like `fresh`. If the server lists a key twice, the
/// later item's attributes win and the first position is kept.
pub fn reconcile<T: Identified>(old: ResourceCollection<T>, fresh: Vec<T>) -> ResourceCollection<T> {
    let mut previous: HashMap<String, Handle<T>> = old
        .into_entries()
        .into_iter()
        .map(|h| {
            let key = h.read().identity().to_string();
            (key, h)
        })
        .collect();

    let mut result: ResourceCollection<T> = ResourceCollection::new();
    for item in fresh {
        let key = item.identity().to_string();

        if let Some(position) = result.position(&key) {
            log::warn!("{} '{}' listed twice by the server", T::KIND, key);
            result.entry_at(position).write().absorb(item);
            continue;
        }

        let handle = match previous.remove(&key) {
            Some(handle) => {
                handle.write().absorb(item);
                handle
            }
            None => Handle::new(item),
        };
        result.push(key, handle);
    }

    if !previous.is_empty() {
        log::debug!(
            "dropping {} {} entr{} no longer reported by the server",
            previous.len(),
            T::KIND,
            if previous.len() == 1 { "y" } else { "ies" }
        );
    }

    result
}
