//! Expand/collapse state for long content items
//!
//! Keyed by [`ContentItemId`]. Ids that were never toggled read as collapsed.
//! Items are independent: any number may be expanded at once, and nothing
//! collapses automatically. Mutual exclusivity is available as an explicit
//! caller policy through [`ExpansionRegistry::toggle_exclusive`].

use crate::region::ContentItemId;
use indexmap::IndexMap;

/// Mapping from content item to expanded flag
#[derive(Debug, Default, Clone)]
pub struct ExpansionRegistry {
    /// Insertion-ordered so snapshots and reports are stable
    items: IndexMap<ContentItemId, bool>,
}

impl ExpansionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an item is expanded (false for unknown ids)
    pub fn is_expanded(&self, id: &ContentItemId) -> bool {
        self.items.get(id).copied().unwrap_or(false)
    }

    /// Flip one item, returning its new state
    pub fn toggle(&mut self, id: ContentItemId) -> bool {
        let entry = self.items.entry(id).or_insert(false);
        *entry = !*entry;
        *entry
    }

    /// Expand `id` and collapse every other item
    ///
    /// Toggling an already-expanded item collapses it, like [`toggle`](Self::toggle).
    pub fn toggle_exclusive(&mut self, id: ContentItemId) -> bool {
        let was_expanded = self.is_expanded(&id);
        for (other, expanded) in self.items.iter_mut() {
            if *other != id {
                *expanded = false;
            }
        }
        self.items.insert(id, !was_expanded);
        !was_expanded
    }

    /// Ids currently expanded, in first-toggled order
    pub fn expanded_ids(&self) -> impl Iterator<Item = &ContentItemId> {
        self.items
            .iter()
            .filter_map(|(id, expanded)| expanded.then_some(id))
    }

    pub fn expanded_count(&self) -> usize {
        self.items.values().filter(|expanded| **expanded).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_are_collapsed() {
        let registry = ExpansionRegistry::new();
        assert!(!registry.is_expanded(&ContentItemId::Index(4)));
        assert!(!registry.is_expanded(&"bio".into()));
    }

    #[test]
    fn toggle_is_self_inverse() {
        let mut registry = ExpansionRegistry::new();
        let id = ContentItemId::Index(2);
        assert!(registry.toggle(id.clone()));
        assert!(!registry.toggle(id.clone()));
        assert!(!registry.is_expanded(&id));
    }

    #[test]
    fn toggling_one_item_never_changes_another() {
        let ids: Vec<ContentItemId> = (0..5).map(ContentItemId::Index).collect();
        for i in 0..ids.len() {
            let mut registry = ExpansionRegistry::new();
            // Seed a mixed state
            registry.toggle(ids[1].clone());
            registry.toggle(ids[3].clone());
            let before: Vec<bool> = ids.iter().map(|id| registry.is_expanded(id)).collect();

            registry.toggle(ids[i].clone());

            for (j, id) in ids.iter().enumerate() {
                if j != i {
                    assert_eq!(registry.is_expanded(id), before[j], "toggle({i}) changed {j}");
                } else {
                    assert_ne!(registry.is_expanded(id), before[j]);
                }
            }
        }
    }

    #[test]
    fn many_items_can_be_expanded_together() {
        let mut registry = ExpansionRegistry::new();
        registry.toggle(0usize.into());
        registry.toggle(1usize.into());
        registry.toggle("summary".into());
        assert_eq!(registry.expanded_count(), 3);
        let ids: Vec<String> = registry.expanded_ids().map(|id| id.to_string()).collect();
        assert_eq!(ids, vec!["0", "1", "summary"]);
    }

    #[test]
    fn exclusive_policy_collapses_others() {
        let mut registry = ExpansionRegistry::new();
        registry.toggle(0usize.into());
        registry.toggle(1usize.into());
        assert!(registry.toggle_exclusive(2usize.into()));
        assert_eq!(registry.expanded_count(), 1);
        assert!(registry.is_expanded(&2usize.into()));

        assert!(!registry.toggle_exclusive(2usize.into()));
        assert_eq!(registry.expanded_count(), 0);
    }
}
