//! Redemption Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Redemption history entry: a customer spent `points` on a reward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redemption {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub reward_id: Uuid,
    pub date: DateTime<Utc>,
    pub points: i64,
}
