//! Store row shapes
//!
//! The hosted tables name customer columns in flattened lowercase
//! (`firstname`, `lastname`, `joindate`) and everything else in snake_case.
//! This module is the only place that knows those names.
//!
//! | Table | Columns |
//! |-------|---------|
//! | customers | id, firstname, lastname, phone, email, joindate, birthday, notes, preferences |
//! | visits | id, customer_id, date, service, amount, points, notes, staff_member |
//! | rewards | id, name, description, points_required, expiry_days, is_active, category |
//! | redemptions | id, customer_id, reward_id, date, points |
//!
//! `visits.amount` holds integer minor currency units.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::{Customer, CustomerUpdate, Redemption, Reward, Visit};
use uuid::Uuid;

use crate::{ClientError, ClientResult};

// ========== Tables ==========

pub const CUSTOMERS: &str = "customers";
pub const VISITS: &str = "visits";
pub const REWARDS: &str = "rewards";
pub const REDEMPTIONS: &str = "redemptions";

// ========== Columns ==========

pub const ID: &str = "id";
pub const CUSTOMER_ID: &str = "customer_id";
pub const DATE: &str = "date";
pub const IS_ACTIVE: &str = "is_active";

/// `customers` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRow {
    pub id: Uuid,
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "joindate")]
    pub join_date: DateTime<Utc>,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub preferences: Option<Vec<String>>,
}

impl From<Customer> for CustomerRow {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            first_name: c.first_name,
            last_name: c.last_name,
            phone: c.phone,
            email: Some(c.email),
            join_date: c.join_date,
            birthday: c.birthday,
            notes: c.notes,
            preferences: Some(c.preferences),
        }
    }
}

impl From<CustomerRow> for Customer {
    fn from(r: CustomerRow) -> Self {
        Self {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            phone: r.phone,
            email: r.email.unwrap_or_default(),
            join_date: r.join_date,
            birthday: r.birthday,
            notes: r.notes,
            preferences: r.preferences.unwrap_or_default(),
        }
    }
}

/// Partial `customers` update: only present fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomerPatch {
    #[serde(rename = "firstname", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "lastname", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// `Some(None)` is sent as `null`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Vec<String>>,
}

impl From<CustomerUpdate> for CustomerPatch {
    fn from(u: CustomerUpdate) -> Self {
        Self {
            first_name: u.first_name,
            last_name: u.last_name,
            phone: u.phone,
            email: u.email,
            birthday: u.birthday,
            notes: u.notes,
            preferences: u.preferences,
        }
    }
}

/// `visits` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub date: DateTime<Utc>,
    pub service: String,
    pub amount: i64,
    pub points: i64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub staff_member: Option<String>,
}

impl From<Visit> for VisitRow {
    fn from(v: Visit) -> Self {
        Self {
            id: v.id,
            customer_id: v.customer_id,
            date: v.date,
            service: v.service,
            amount: v.amount,
            points: v.points,
            notes: v.notes,
            staff_member: v.staff_member,
        }
    }
}

impl From<VisitRow> for Visit {
    fn from(r: VisitRow) -> Self {
        Self {
            id: r.id,
            customer_id: r.customer_id,
            date: r.date,
            service: r.service,
            amount: r.amount,
            points: r.points,
            notes: r.notes,
            staff_member: r.staff_member,
        }
    }
}

/// `rewards` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardRow {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub points_required: i64,
    #[serde(default)]
    pub expiry_days: Option<i32>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub category: Option<String>,
}

fn default_active() -> bool {
    true
}

impl From<Reward> for RewardRow {
    fn from(r: Reward) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: Some(r.description),
            points_required: r.points_required,
            expiry_days: r.expiry_days,
            is_active: r.is_active,
            category: r.category,
        }
    }
}

impl From<RewardRow> for Reward {
    fn from(r: RewardRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description.unwrap_or_default(),
            points_required: r.points_required,
            expiry_days: r.expiry_days,
            is_active: r.is_active,
            category: r.category,
        }
    }
}

/// `redemptions` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedemptionRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub reward_id: Uuid,
    pub date: DateTime<Utc>,
    pub points: i64,
}

impl From<Redemption> for RedemptionRow {
    fn from(r: Redemption) -> Self {
        Self {
            id: r.id,
            customer_id: r.customer_id,
            reward_id: r.reward_id,
            date: r.date,
            points: r.points,
        }
    }
}

impl From<RedemptionRow> for Redemption {
    fn from(r: RedemptionRow) -> Self {
        Self {
            id: r.id,
            customer_id: r.customer_id,
            reward_id: r.reward_id,
            date: r.date,
            points: r.points,
        }
    }
}

// ========== JSON helpers ==========

/// Serialize a row struct into a JSON object
pub fn encode<R: Serialize>(row: &R) -> ClientResult<Value> {
    Ok(serde_json::to_value(row)?)
}

/// Decode store rows into domain records through their row type
pub fn decode<R, T>(rows: Vec<Value>) -> ClientResult<Vec<T>>
where
    R: DeserializeOwned + Into<T>,
{
    rows.into_iter()
        .map(|row| {
            serde_json::from_value::<R>(row)
                .map(Into::into)
                .map_err(ClientError::from)
        })
        .collect()
}
