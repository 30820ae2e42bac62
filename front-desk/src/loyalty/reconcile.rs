//! Reward catalog reconciliation
//!
//! The catalog screen edits a whole list and hands it back. [`RewardDiff`]
//! turns "old list, new list" into the minimal set of store writes.

use std::collections::HashSet;

use shared::models::Reward;
use uuid::Uuid;

/// Writes needed to turn `current` into `new`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardDiff {
    /// Unsaved (nil id) or unknown to `current`
    pub additions: Vec<Reward>,
    /// Same id, different content
    pub updates: Vec<Reward>,
    /// Ids in `current` missing from `new`
    pub deletions: Vec<Uuid>,
}

impl RewardDiff {
    pub fn between(current: &[Reward], new: &[Reward]) -> Self {
        let mut diff = Self::default();

        for reward in new {
            match current.iter().find(|r| !reward.is_unsaved() && r.id == reward.id) {
                None => diff.additions.push(reward.clone()),
                Some(existing) if existing != reward => diff.updates.push(reward.clone()),
                Some(_) => {}
            }
        }

        let kept: HashSet<Uuid> = new.iter().map(|r| r.id).collect();
        diff.deletions = current
            .iter()
            .filter(|r| !kept.contains(&r.id))
            .map(|r| r.id)
            .collect();
        diff
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.updates.is_empty() && self.deletions.is_empty()
    }

    /// Number of store writes the diff needs
    pub fn len(&self) -> usize {
        self.additions.len() + self.updates.len() + self.deletions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reward(name: &str, points: i64) -> Reward {
        Reward {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            points_required: points,
            expiry_days: Some(30),
            is_active: true,
            category: None,
        }
    }

    #[test]
    fn test_classifies_add_update_delete() {
        let a = reward("A", 100);
        let b = reward("B", 200);
        let mut a2 = a.clone();
        a2.points_required = 150;
        let mut c = reward("C", 300);
        c.id = Uuid::nil();

        let diff = RewardDiff::between(&[a.clone(), b.clone()], &[a2.clone(), c.clone()]);

        assert_eq!(diff.updates, vec![a2]);
        assert_eq!(diff.additions, vec![c]);
        assert_eq!(diff.deletions, vec![b.id]);
        assert_eq!(diff.len(), 3);
    }

    #[test]
    fn test_unchanged_list_is_empty() {
        let list = vec![reward("A", 100), reward("B", 200)];
        let diff = RewardDiff::between(&list, &list);
        assert!(diff.is_empty());
    }

    #[test]
    fn test_unknown_id_is_an_addition() {
        let current = vec![reward("A", 100)];
        let mut new = current.clone();
        let extra = reward("Imported", 50);
        new.push(extra.clone());

        let diff = RewardDiff::between(&current, &new);
        assert_eq!(diff.additions, vec![extra]);
        assert!(diff.updates.is_empty());
        assert!(diff.deletions.is_empty());
    }

    #[test]
    fn test_toggle_is_an_update() {
        let current = vec![reward("A", 100)];
        let mut new = current.clone();
        new[0].is_active = false;

        let diff = RewardDiff::between(&current, &new);
        assert_eq!(diff.updates.len(), 1);
        assert!(diff.additions.is_empty());
    }
}
