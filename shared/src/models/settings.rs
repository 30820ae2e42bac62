//! Business Settings

use serde::{Deserialize, Serialize};

/// Business-level settings shown on the settings screen.
///
/// `points_per_dollar` is informational only: accrual is always one point per
/// whole major currency unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessSettings {
    pub name: String,
    pub points_per_dollar: f64,
    /// Points validity in days
    pub expiry_days: u32,
    pub welcome_bonus: i64,
    pub birthday_bonus: i64,
}

impl Default for BusinessSettings {
    fn default() -> Self {
        Self {
            name: "My Business".to_string(),
            points_per_dollar: 1.0,
            expiry_days: 365,
            welcome_bonus: 50,
            birthday_bonus: 25,
        }
    }
}
