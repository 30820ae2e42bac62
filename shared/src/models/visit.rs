//! Visit Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minor currency units per major unit (cents per dollar)
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// A recorded, paid service event. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub date: DateTime<Utc>,
    pub service: String,
    /// Amount paid, in minor currency units
    pub amount: i64,
    /// Points earned, fixed when the visit is recorded
    pub points: i64,
    pub notes: Option<String>,
    pub staff_member: Option<String>,
}
