//! Chronological ordering of extracted rows

/// Put items in ascending key order, keeping the relative order of ties
///
/// A list whose first key is greater than its last is reversed first, which
/// fixes statements listed newest-first without sorting. Only if the list
/// is still out of order afterwards is it stably sorted.
///
/// Returns `true` when a sort was needed.
pub fn sort_chronologically<T, K, F>(items: &mut [T], key: F) -> bool
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let (Some(first), Some(last)) = (items.first(), items.last()) else {
        return false;
    };
    if key(first) > key(last) {
        items.reverse();
    }

    if items.windows(2).all(|pair| key(&pair[0]) <= key(&pair[1])) {
        return false;
    }
    items.sort_by_key(|item| key(item));
    true
}
