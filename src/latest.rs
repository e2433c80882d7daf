//! Selects the most recent posts for the home page and the feed listing.
//! Recency is judged by a post's identifier, which is assigned in increasing
//! order as posts are created.

/// Anything that may carry an identifier. Items without one are never
/// selected by [`latest`].
pub trait Identified {
    type Id: Ord;

    fn identifier(&self) -> Option<&Self::Id>;
}

impl<T: Identified + ?Sized> Identified for &T {
    type Id = T::Id;

    fn identifier(&self) -> Option<&Self::Id> {
        (**self).identifier()
    }
}

/// Lets `(path, file)` pairs from a map iterator be ranked by the file.
impl<K, T: Identified> Identified for (K, T) {
    type Id = T::Id;

    fn identifier(&self) -> Option<&Self::Id> {
        self.1.identifier()
    }
}

/// Returns the (at most) `k` items with the largest identifiers, largest
/// first, in a single pass over `items`.
///
/// Each candidate goes into the left-most slot that is either free or holds
/// a strictly smaller identifier, pushing everything after it one slot to the
/// right; whatever falls off the end is discarded. On equal identifiers the
/// item seen first keeps the earlier slot, so ties are decided by the
/// iteration order of `items`.
pub fn latest<T, I>(items: I, k: usize) -> Vec<T>
where
    T: Identified,
    I: IntoIterator<Item = T>,
{
    let mut ranked: Vec<T> = Vec::with_capacity(k);
    for item in items {
        let slot = match item.identifier() {
            None => continue,
            Some(id) => ranked
                .iter()
                .position(|held| held.identifier().map_or(true, |held_id| held_id < id)),
        };
        let free = Some(ranked.len()).filter(|&len| len < k);
        if let Some(slot) = slot.or(free) {
            ranked.insert(slot, item);
            ranked.truncate(k);
        }
    }
    ranked
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item {
        id: Option<u32>,
        name: &'static str,
    }

    impl Identified for Item {
        type Id = u32;

        fn identifier(&self) -> Option<&u32> {
            self.id.as_ref()
        }
    }

    fn item(id: u32, name: &'static str) -> Item {
        let id = Some(id);
        Item { id, name }
    }

    fn unidentified(name: &'static str) -> Item {
        Item { id: None, name }
    }

    fn ids(items: &[&Item]) -> Vec<u32> {
        items.iter().filter_map(|i| i.id).collect()
    }

    #[test]
    fn test_latest_picks_largest_identifiers() {
        let items: Vec<Item> = (1..=5).map(|id| item(id, "")).collect();
        assert_eq!(ids(&latest(&items, 3)), vec![5, 4, 3]);
    }

    #[test]
    fn test_latest_is_independent_of_input_order() {
        let items: Vec<Item> = [3, 9, 1, 7, 5].iter().map(|&id| item(id, "")).collect();
        assert_eq!(ids(&latest(&items, 2)), vec![9, 7]);
        assert_eq!(ids(&latest(items.iter().rev(), 2)), vec![9, 7]);
    }

    #[test]
    fn test_latest_short_input() {
        let items = vec![item(2, ""), item(8, "")];
        assert_eq!(ids(&latest(&items, 10)), vec![8, 2]);
    }

    #[test]
    fn test_latest_zero_and_empty() {
        let items = vec![item(2, "")];
        assert!(latest(&items, 0).is_empty());
        assert!(latest(Vec::<&Item>::new(), 3).is_empty());
    }

    #[test]
    fn test_latest_skips_items_without_identifier() {
        let items = vec![unidentified("draft"), item(1, "first"), unidentified("page")];
        let selected = latest(&items, 3);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "first");
    }

    #[test]
    fn test_latest_ties_keep_encounter_order() {
        let items = vec![item(4, "a"), item(4, "b"), item(2, "c"), item(4, "d")];
        let names: Vec<&str> = latest(&items, 3).iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["a", "b", "d"]);
    }

    #[test]
    fn test_latest_over_map_entries() {
        use std::collections::BTreeMap;
        let mut map = BTreeMap::new();
        map.insert("a.html", item(1, ""));
        map.insert("b.html", item(3, ""));
        map.insert("c.html", item(2, ""));
        let keys: Vec<&str> = latest(map.iter(), 2).iter().map(|(k, _)| **k).collect();
        assert_eq!(keys, vec!["b.html", "c.html"]);
    }
}
