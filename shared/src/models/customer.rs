//! Customer Model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult, ErrorCode};
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_email, validate_optional_text, validate_phone, validate_required_text,
};

/// Customer entity (会员)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub join_date: DateTime<Utc>,
    pub birthday: Option<NaiveDate>,
    pub notes: Option<String>,
    /// Ordered preference tags ("balayage", "beard trim", ...)
    #[serde(default)]
    pub preferences: Vec<String>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Create customer payload
///
/// The identifier is not part of the payload; the gateway generates it before
/// insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub join_date: DateTime<Utc>,
    pub birthday: Option<NaiveDate>,
    pub notes: Option<String>,
    #[serde(default)]
    pub preferences: Vec<String>,
}

impl NewCustomer {
    /// Payload for a customer joining now, as created at check-in
    pub fn joining_now(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: phone.into(),
            email: email.into(),
            join_date: crate::util::now(),
            birthday: None,
            notes: None,
            preferences: Vec::new(),
        }
    }

    pub fn into_customer(self, id: Uuid) -> Customer {
        Customer {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            email: self.email,
            join_date: self.join_date,
            birthday: self.birthday,
            notes: self.notes,
            preferences: self.preferences,
        }
    }
}

/// Update customer payload (partial edit, `None` leaves the field untouched)
///
/// `birthday` and `notes` can be cleared: `Some(None)` writes an empty value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub birthday: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
    pub preferences: Option<Vec<String>>,
}

impl CustomerUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Check every present field with the rules applied at registration
    pub fn validate(&self) -> AppResult<()> {
        let blank = |v: &Option<String>| v.as_deref().is_some_and(|s| s.trim().is_empty());
        if blank(&self.first_name) || blank(&self.last_name) {
            return Err(AppError::new(ErrorCode::CustomerNameRequired));
        }
        if let Some(first) = &self.first_name {
            validate_required_text(first, "first_name", MAX_NAME_LEN)?;
        }
        if let Some(last) = &self.last_name {
            validate_required_text(last, "last_name", MAX_NAME_LEN)?;
        }
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(notes) = &self.notes {
            validate_optional_text(notes, "notes", MAX_NOTE_LEN)?;
        }
        Ok(())
    }
}

/// A field that is present in the input, even as `null`, is `Some`
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
