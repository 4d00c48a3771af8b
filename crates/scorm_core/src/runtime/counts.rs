//! Derived list counters.
//!
//! # Responsibility
//! - Track the highest index observed per list family and per interaction
//!   sub-list.
//! - Report the synthetic `_count` writes the store must receive.
//!
//! # Invariants
//! - Counters never decrease.
//! - Counters are `u64` so `index + 1` is exact for every `u32` index.
//! - An interaction entry exists before any of its sub-list counters change.

use crate::model::key::{
    list_count_key, nested_count_key, ElementKey, InteractionList, INTERACTIONS,
};
use std::collections::BTreeMap;

/// List families tracked from the first observation.
pub const KNOWN_LISTS: &[&str] = &[
    "comments_from_learner",
    "comments_from_lms",
    "interactions",
    "objectives",
];

/// Sub-list counters for one interaction record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionCounts {
    pub objectives: u64,
    pub correct_responses: u64,
}

impl InteractionCounts {
    pub fn get(&self, list: InteractionList) -> u64 {
        match list {
            InteractionList::Objectives => self.objectives,
            InteractionList::CorrectResponses => self.correct_responses,
        }
    }

    fn raise_to(&mut self, list: InteractionList, count: u64) -> u64 {
        let slot = match list {
            InteractionList::Objectives => &mut self.objectives,
            InteractionList::CorrectResponses => &mut self.correct_responses,
        };
        *slot = (*slot).max(count);
        *slot
    }
}

/// Store write produced by one observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountWrite {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCounts {
    counts: BTreeMap<String, u64>,
    interaction_counts: BTreeMap<u32, InteractionCounts>,
}

impl Default for ListCounts {
    fn default() -> Self {
        Self {
            counts: KNOWN_LISTS.iter().map(|list| (list.to_string(), 0)).collect(),
            interaction_counts: BTreeMap::new(),
        }
    }
}

impl ListCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates counters for one written key.
    ///
    /// The list-member and nested-member passes run independently; a nested
    /// key yields writes from both.
    pub fn observe(&mut self, key: &str) -> Vec<CountWrite> {
        let parsed = ElementKey::parse(key);
        let mut writes = Vec::new();

        if let Some((list, index)) = parsed.list_member() {
            let observed = u64::from(index) + 1;
            let count = self.counts.entry(list.to_string()).or_insert(0);
            *count = (*count).max(observed);
            writes.push(CountWrite {
                key: list_count_key(list),
                value: count.to_string(),
            });
            if list == INTERACTIONS {
                self.interaction_counts.entry(index).or_default();
            }
        }

        if let Some((interaction, list, index)) = parsed.nested_member() {
            let count = self
                .interaction_counts
                .entry(interaction)
                .or_default()
                .raise_to(list, u64::from(index) + 1);
            writes.push(CountWrite {
                key: nested_count_key(interaction, list),
                value: count.to_string(),
            });
        }

        writes
    }

    /// Highest observed index + 1 for `list`, if the list is tracked.
    pub fn count(&self, list: &str) -> Option<u64> {
        self.counts.get(list).copied()
    }

    pub fn interaction(&self, index: u32) -> Option<&InteractionCounts> {
        self.interaction_counts.get(&index)
    }

    /// Interaction indices that have been observed, ascending.
    pub fn interaction_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.interaction_counts.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{CountWrite, InteractionCounts, ListCounts};
    use crate::model::key::InteractionList;

    #[test]
    fn starts_with_known_lists_at_zero() {
        let counts = ListCounts::new();
        assert_eq!(counts.count("objectives"), Some(0));
        assert_eq!(counts.count("comments_from_lms"), Some(0));
        assert_eq!(counts.count("unknown"), None);
        assert_eq!(counts.interaction_indices().count(), 0);
    }

    #[test]
    fn scalar_keys_produce_no_writes() {
        let mut counts = ListCounts::new();
        assert!(counts.observe("cmi.location").is_empty());
        assert!(counts.observe("cmi.objectives._count").is_empty());
    }

    #[test]
    fn counts_are_monotonic_in_any_order() {
        let mut counts = ListCounts::new();
        for key in ["cmi.objectives.2.id", "cmi.objectives.0.id", "cmi.objectives.5.id"] {
            counts.observe(key);
        }
        assert_eq!(counts.count("objectives"), Some(6));

        let writes = counts.observe("cmi.objectives.1.id");
        assert_eq!(
            writes,
            vec![CountWrite {
                key: "cmi.objectives._count".to_string(),
                value: "6".to_string(),
            }]
        );
    }

    #[test]
    fn unknown_lists_are_tracked_on_first_observation() {
        let mut counts = ListCounts::new();
        counts.observe("cmi.custom_list.3");
        assert_eq!(counts.count("custom_list"), Some(4));
    }

    #[test]
    fn interaction_member_creates_sparse_entry() {
        let mut counts = ListCounts::new();
        counts.observe("cmi.interactions.4.id");

        assert_eq!(counts.interaction(4), Some(&InteractionCounts::default()));
        assert_eq!(counts.interaction(0), None);
        assert_eq!(counts.interaction_indices().collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn nested_key_updates_both_levels() {
        let mut counts = ListCounts::new();
        let writes = counts.observe("cmi.interactions.2.objectives.0.id");

        assert_eq!(
            writes,
            vec![
                CountWrite {
                    key: "cmi.interactions._count".to_string(),
                    value: "3".to_string(),
                },
                CountWrite {
                    key: "cmi.interactions.2.objectives._count".to_string(),
                    value: "1".to_string(),
                },
            ]
        );
        let entry = counts.interaction(2).expect("interaction entry");
        assert_eq!(entry.get(InteractionList::Objectives), 1);
        assert_eq!(entry.get(InteractionList::CorrectResponses), 0);
    }

    #[test]
    fn nested_counters_are_independent_per_interaction() {
        let mut counts = ListCounts::new();
        counts.observe("cmi.interactions.0.correct_responses.3.pattern");
        counts.observe("cmi.interactions.1.correct_responses.0.pattern");
        counts.observe("cmi.interactions.0.correct_responses.1.pattern");

        let first = counts.interaction(0).expect("interaction 0");
        let second = counts.interaction(1).expect("interaction 1");
        assert_eq!(first.correct_responses, 4);
        assert_eq!(second.correct_responses, 1);
        assert_eq!(counts.count("interactions"), Some(2));
    }

    #[test]
    fn largest_index_counts_one_past_it() {
        let mut counts = ListCounts::new();
        let writes = counts.observe("cmi.objectives.4294967295.id");
        assert_eq!(counts.count("objectives"), Some(4_294_967_296));
        assert_eq!(writes[0].value, "4294967296");

        let writes = counts.observe("cmi.interactions.0.objectives.4294967295.id");
        assert_eq!(
            counts
                .interaction(0)
                .expect("interaction 0")
                .get(InteractionList::Objectives),
            4_294_967_296
        );
        assert_eq!(
            writes[1],
            CountWrite {
                key: "cmi.interactions.0.objectives._count".to_string(),
                value: "4294967296".to_string(),
            }
        );
    }
}
