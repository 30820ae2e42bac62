//! Reward catalog editing
//!
//! Each action takes the current catalog and returns the complete new list,
//! which is then handed to [`LoyaltyState::update_rewards`](crate::core::LoyaltyState::update_rewards).

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::Reward;
use shared::util::non_empty;
use shared::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, parse_optional_days, parse_points, validate_optional_text, validate_required_text,
};
use uuid::Uuid;

/// Reward categories offered by the catalog form: (value, label)
pub const CATEGORIES: &[(&str, &str)] = &[
    ("service", "Service"),
    ("product", "Product"),
    ("discount", "Discount"),
    ("addon", "Add-on"),
    ("special", "Special"),
];

/// Reward form as typed. Empty fields mean "not given".
#[derive(Debug, Clone, Default)]
pub struct RewardDraft {
    pub name: String,
    pub description: String,
    pub points_required: String,
    pub expiry_days: String,
    pub category: String,
}

impl RewardDraft {
    /// Draft prefilled from an existing reward
    pub fn from_reward(reward: &Reward) -> Self {
        Self {
            name: reward.name.clone(),
            description: reward.description.clone(),
            points_required: reward.points_required.to_string(),
            expiry_days: reward.expiry_days.map(|d| d.to_string()).unwrap_or_default(),
            category: reward.category.clone().unwrap_or_default(),
        }
    }

    /// Build a new, active, unsaved reward
    pub fn build(&self) -> AppResult<Reward> {
        let name = self.name.trim();
        if name.is_empty() || self.points_required.trim().is_empty() {
            return Err(AppError::new(ErrorCode::RewardNameRequired));
        }
        validate_required_text(name, "name", MAX_NAME_LEN)?;
        let description = non_empty(&self.description);
        validate_optional_text(&description, "description", MAX_NOTE_LEN)?;

        Ok(Reward {
            id: Uuid::nil(),
            name: name.to_string(),
            description: description.unwrap_or_default(),
            points_required: parse_points(&self.points_required)?,
            expiry_days: parse_optional_days(&self.expiry_days)?,
            is_active: true,
            category: category(&self.category)?,
        })
    }

    /// Merge the non-empty fields into `reward`
    pub fn merge_into(&self, reward: &Reward) -> AppResult<Reward> {
        let mut merged = reward.clone();
        if let Some(name) = non_empty(&self.name) {
            validate_required_text(&name, "name", MAX_NAME_LEN)?;
            merged.name = name;
        }
        let description = non_empty(&self.description);
        validate_optional_text(&description, "description", MAX_NOTE_LEN)?;
        if let Some(description) = description {
            merged.description = description;
        }
        if !self.points_required.trim().is_empty() {
            merged.points_required = parse_points(&self.points_required)?;
        }
        if let Some(days) = parse_optional_days(&self.expiry_days)? {
            merged.expiry_days = Some(days);
        }
        if let Some(category) = category(&self.category)? {
            merged.category = Some(category);
        }
        Ok(merged)
    }
}

/// Typed category, if any, must be one of [`CATEGORIES`]
fn category(value: &str) -> AppResult<Option<String>> {
    match non_empty(value) {
        Some(c) if !CATEGORIES.iter().any(|(known, _)| *known == c) => {
            Err(AppError::validation(format!("Unknown category \"{c}\"")).with_detail("field", "category"))
        }
        other => Ok(other),
    }
}

fn position(rewards: &[Reward], id: Uuid) -> AppResult<usize> {
    rewards
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| AppError::new(ErrorCode::RewardNotFound))
}

/// Catalog with a new reward appended
pub fn add(rewards: &[Reward], draft: &RewardDraft) -> AppResult<Vec<Reward>> {
    let mut next = rewards.to_vec();
    next.push(draft.build()?);
    Ok(next)
}

/// Catalog with one reward edited
pub fn edit(rewards: &[Reward], id: Uuid, draft: &RewardDraft) -> AppResult<Vec<Reward>> {
    let index = position(rewards, id)?;
    let mut next = rewards.to_vec();
    next[index] = draft.merge_into(&rewards[index])?;
    Ok(next)
}

/// Catalog with one reward's active flag flipped
pub fn toggle_active(rewards: &[Reward], id: Uuid) -> AppResult<Vec<Reward>> {
    let index = position(rewards, id)?;
    let mut next = rewards.to_vec();
    next[index].is_active = !next[index].is_active;
    Ok(next)
}

/// Catalog without one reward
pub fn remove(rewards: &[Reward], id: Uuid) -> AppResult<Vec<Reward>> {
    position(rewards, id)?;
    Ok(rewards.iter().filter(|r| r.id != id).cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Reward> {
        let draft = RewardDraft {
            name: "Free Basic Haircut".into(),
            description: "Redeem for a complimentary basic haircut service".into(),
            points_required: "200".into(),
            expiry_days: "90".into(),
            category: "service".into(),
        };
        let mut reward = draft.build().unwrap();
        reward.id = Uuid::new_v4();
        vec![reward]
    }

    #[test]
    fn test_build_requires_name_and_points() {
        let draft = RewardDraft {
            name: "Sample Kit".into(),
            ..Default::default()
        };
        assert_eq!(draft.build().unwrap_err().code, ErrorCode::RewardNameRequired);

        let draft = RewardDraft {
            name: "Sample Kit".into(),
            points_required: "0".into(),
            ..Default::default()
        };
        assert_eq!(draft.build().unwrap_err().code, ErrorCode::RewardPointsInvalid);

        let draft = RewardDraft {
            name: "Sample Kit".into(),
            points_required: "100".into(),
            ..Default::default()
        };
        let reward = draft.build().unwrap();
        assert!(reward.is_unsaved());
        assert!(reward.is_active);
        assert_eq!(reward.category, None);
        assert_eq!(reward.expiry_days, None);
    }

    #[test]
    fn test_add_appends_unsaved_reward() {
        let current = catalog();
        let draft = RewardDraft {
            name: "VIP Treatment Add-on".into(),
            points_required: "150".into(),
            category: "addon".into(),
            ..Default::default()
        };
        let next = add(&current, &draft).unwrap();
        assert_eq!(next.len(), 2);
        assert_eq!(next[0], current[0]);
        assert!(next[1].is_unsaved());
    }

    #[test]
    fn test_edit_merges_non_empty_fields() {
        let current = catalog();
        let id = current[0].id;
        let draft = RewardDraft {
            points_required: "250".into(),
            ..Default::default()
        };
        let next = edit(&current, id, &draft).unwrap();

        assert_eq!(next[0].points_required, 250);
        assert_eq!(next[0].name, "Free Basic Haircut");
        assert_eq!(next[0].expiry_days, Some(90));
        assert_eq!(next[0].id, id);

        let prefilled = RewardDraft::from_reward(&current[0]);
        assert_eq!(edit(&current, id, &prefilled).unwrap(), current);
    }

    #[test]
    fn test_toggle_and_remove() {
        let current = catalog();
        let id = current[0].id;

        let toggled = toggle_active(&current, id).unwrap();
        assert!(!toggled[0].is_active);
        assert!(toggle_active(&toggled, id).unwrap()[0].is_active);

        assert!(remove(&current, id).unwrap().is_empty());
        assert_eq!(
            remove(&current, Uuid::new_v4()).unwrap_err().code,
            ErrorCode::RewardNotFound
        );
    }

    #[test]
    fn test_category_must_be_known() {
        let draft = RewardDraft {
            name: "Mystery Box".into(),
            points_required: "100".into(),
            category: "lottery".into(),
            ..Default::default()
        };
        let err = draft.build().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.is_validation());

        let current = catalog();
        let edit_draft = RewardDraft {
            category: "lottery".into(),
            ..Default::default()
        };
        assert!(edit(&current, current[0].id, &edit_draft).is_err());

        let edit_draft = RewardDraft {
            category: " product ".into(),
            ..Default::default()
        };
        let next = edit(&current, current[0].id, &edit_draft).unwrap();
        assert_eq!(next[0].category.as_deref(), Some("product"));
    }
}
