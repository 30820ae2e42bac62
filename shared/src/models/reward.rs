//! Reward Model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog entry redeemable once a customer's points meet its threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    /// `Uuid::nil()` marks a reward that has not been stored yet
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub points_required: i64,
    /// Validity window length in days (not an absolute date)
    pub expiry_days: Option<i32>,
    pub is_active: bool,
    pub category: Option<String>,
}

impl Reward {
    /// True when the reward has no identity yet
    pub fn is_unsaved(&self) -> bool {
        self.id.is_nil()
    }
}
