//! Input validation helpers
//!
//! Preconditions checked before any network call. Every failure is an
//! [`AppError`] whose message is ready to be shown as a transient notice.

use std::str::FromStr;

use rust_decimal::prelude::*;
use validator::ValidateEmail;

use crate::error::{AppError, AppResult, ErrorCode};
use crate::models::MINOR_UNITS_PER_MAJOR;

// ── Text length limits ──────────────────────────────────────────────

/// Names: customer first/last name, reward name, service label
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, category, staff member
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Shortest phone input accepted by the check-in search
pub const MIN_PHONE_LEN: usize = 7;

// ── Text ────────────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::required(field));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} is too long ({len} chars, max {max_len})"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: &Option<String>, field: &str, max_len: usize) -> AppResult<()> {
    if let Some(v) = value {
        let len = v.chars().count();
        if len > max_len {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("{field} is too long ({len} chars, max {max_len})"),
            )
            .with_detail("field", field));
        }
    }
    Ok(())
}

/// Phone input must be at least [`MIN_PHONE_LEN`] characters and hold digits.
pub fn validate_phone(phone: &str) -> AppResult<()> {
    let trimmed = phone.trim();
    if trimmed.chars().count() < MIN_PHONE_LEN || crate::util::digits_only(trimmed).is_empty() {
        return Err(AppError::new(ErrorCode::CustomerPhoneInvalid).with_detail("field", "phone"));
    }
    if trimmed.chars().count() > MAX_SHORT_TEXT_LEN {
        return Err(AppError::new(ErrorCode::CustomerPhoneInvalid).with_detail("field", "phone"));
    }
    Ok(())
}

/// Email is optional on the check-in form; a non-empty value must be well formed.
pub fn validate_email(email: &str) -> AppResult<()> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    if trimmed.len() > MAX_EMAIL_LEN || !trimmed.validate_email() {
        return Err(AppError::new(ErrorCode::CustomerEmailInvalid).with_detail("field", "email"));
    }
    Ok(())
}

// ── Numbers ─────────────────────────────────────────────────────────

/// Parse a typed major-unit amount ("35.50") into minor units (3550).
///
/// Sub-cent input is rounded half away from zero. Zero, negative and
/// non-numeric input are rejected.
pub fn parse_amount(input: &str) -> AppResult<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::new(ErrorCode::VisitServiceRequired).with_detail("field", "amount"));
    }
    let invalid = || AppError::new(ErrorCode::VisitAmountInvalid).with_detail("field", "amount");

    let major = Decimal::from_str(trimmed).map_err(|_| invalid())?;
    if major <= Decimal::ZERO {
        return Err(invalid());
    }
    let minor = major
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
        .ok_or_else(invalid)?;
    minor.to_i64().filter(|v| *v > 0).ok_or_else(invalid)
}

/// Parse a reward threshold: a strictly positive whole number of points.
pub fn parse_points(input: &str) -> AppResult<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::new(ErrorCode::RewardNameRequired).with_detail("field", "points_required"));
    }
    match trimmed.parse::<i64>() {
        Ok(points) if points > 0 => Ok(points),
        _ => Err(AppError::new(ErrorCode::RewardPointsInvalid).with_detail("field", "points_required")),
    }
}

/// Parse an optional validity window in days. Empty input means "no expiry".
pub fn parse_optional_days(input: &str) -> AppResult<Option<i32>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<i32>() {
        Ok(days) if days > 0 => Ok(Some(days)),
        _ => Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "Expiry days must be a positive whole number",
        )
        .with_detail("field", "expiry_days")),
    }
}
