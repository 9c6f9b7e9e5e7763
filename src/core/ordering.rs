//! Insertion into sequences kept sorted by a key.
//!
//! Listings are small, so a linear scan per insert is fine.

/// Insert `item` before the first element whose key is strictly greater.
///
/// Elements with equal keys keep their arrival order.
pub fn insert_sorted<T, K, F>(items: &mut Vec<T>, item: T, key: F)
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let item_key = key(&item);
    let pos = items
        .iter()
        .position(|existing| key(existing) > item_key)
        .unwrap_or(items.len());
    items.insert(pos, item);
}

/// Like [`insert_sorted`], but skips `item` when an element with an equal key
/// is already present. Returns whether the item was inserted.
pub fn insert_sorted_unique<T, K, F>(items: &mut Vec<T>, item: T, key: F) -> bool
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let item_key = key(&item);

    for (pos, existing) in items.iter().enumerate() {
        let existing_key = key(existing);
        if existing_key == item_key {
            return false;
        }
        if existing_key > item_key {
            items.insert(pos, item);
            return true;
        }
    }

    items.push(item);
    true
}
