//! Priority-ordered threshold type lookup.
//!
//! Several threshold types describe the same semantic level measured on a
//! different basis. Callers keep only one of them by walking a fixed list
//! of type strings and taking the first that matches.

use std::collections::HashSet;
use std::hash::Hash;

/// A fixed, ordered list of acceptable threshold type strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityOrder {
    types: &'static [&'static str],
}

impl PriorityOrder {
    pub const fn new(types: &'static [&'static str]) -> Self {
        Self { types }
    }

    /// All items of the highest-priority type that has at least one item.
    /// Lower-priority types are never consulted once a match is found.
    pub fn first_matching<'a, T>(
        &self,
        items: &'a [T],
        type_of: impl Fn(&T) -> &str,
    ) -> Vec<&'a T> {
        for wanted in self.types {
            let matched: Vec<&T> = items.iter().filter(|item| type_of(item) == *wanted).collect();
            if !matched.is_empty() {
                return matched;
            }
        }
        Vec::new()
    }

    /// One item per key: for each key, the first item of the first type in
    /// priority order wins and later matches for that key are discarded.
    ///
    /// Output is ordered by type priority, then by input order.
    pub fn one_per_key<'a, T, K>(
        &self,
        items: &'a [T],
        type_of: impl Fn(&T) -> &str,
        key_of: impl Fn(&T) -> K,
    ) -> Vec<&'a T>
    where
        K: Eq + Hash,
    {
        let mut resolved = HashSet::new();
        let mut selected = Vec::new();
        for wanted in self.types {
            for item in items.iter().filter(|item| type_of(item) == *wanted) {
                if resolved.insert(key_of(item)) {
                    selected.push(item);
                }
            }
        }
        selected
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER: PriorityOrder = PriorityOrder::new(&["first", "second", "third"]);

    #[test]
    fn test_first_matching_prefers_higher_priority_type() {
        let items = [("third", 1), ("second", 2), ("second", 3), ("first", 4)];
        let matched = ORDER.first_matching(&items, |i| i.0);
        assert_eq!(matched, vec![&("first", 4)]);
    }

    #[test]
    fn test_first_matching_falls_through_to_later_types() {
        let items = [("third", 1), ("second", 2), ("second", 3)];
        let matched = ORDER.first_matching(&items, |i| i.0);
        assert_eq!(matched, vec![&("second", 2), &("second", 3)]);
    }

    #[test]
    fn test_first_matching_ignores_unlisted_types() {
        let items = [("other", 1)];
        assert!(ORDER.first_matching(&items, |i| i.0).is_empty());
    }

    #[test]
    fn test_one_per_key_keeps_first_type_per_key() {
        // (type, key)
        let items = [("second", 'a'), ("first", 'b'), ("first", 'a'), ("third", 'c'), ("first", 'a')];
        let selected = ORDER.one_per_key(&items, |i| i.0, |i| i.1);
        assert_eq!(selected, vec![&("first", 'b'), &("first", 'a'), &("third", 'c')]);
    }
}
