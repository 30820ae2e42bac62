//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Customer errors
//! - 2xxx: Visit errors
//! - 3xxx: Reward errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for compact serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Customer ====================
    /// Phone number too short to search or store
    CustomerPhoneInvalid = 1002,
    CustomerNameRequired = 1003,
    CustomerEmailInvalid = 1004,

    // ==================== 2xxx: Visit ====================
    VisitServiceRequired = 2001,
    /// Amount is not a positive number
    VisitAmountInvalid = 2002,

    // ==================== 3xxx: Reward ====================
    RewardNotFound = 3001,
    RewardInactive = 3002,
    /// Points required is not a positive integer
    RewardPointsInvalid = 3003,
    /// Customer balance is below the reward threshold
    InsufficientPoints = 3004,
    RewardNameRequired = 3005,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    DatabaseError = 9002,
    NetworkError = 9003,
    TimeoutError = 9004,
    ConfigError = 9005,
    /// Store rejected the write (unique / foreign key constraint)
    ConstraintViolation = 9006,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Customer
            ErrorCode::CustomerPhoneInvalid => "Please enter a valid phone number",
            ErrorCode::CustomerNameRequired => "Please enter first and last name",
            ErrorCode::CustomerEmailInvalid => "Please enter a valid email address",

            // Visit
            ErrorCode::VisitServiceRequired => "Please select a service and enter an amount",
            ErrorCode::VisitAmountInvalid => "Please enter a valid amount",

            // Reward
            ErrorCode::RewardNotFound => "Reward not found",
            ErrorCode::RewardInactive => "Reward is not active",
            ErrorCode::RewardPointsInvalid => "Please enter a valid point value",
            ErrorCode::InsufficientPoints => "Not enough points to redeem this reward",
            ErrorCode::RewardNameRequired => "Please enter a name and points required",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::ConstraintViolation => "The store rejected the change",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Customer
            1002 => Ok(ErrorCode::CustomerPhoneInvalid),
            1003 => Ok(ErrorCode::CustomerNameRequired),
            1004 => Ok(ErrorCode::CustomerEmailInvalid),

            // Visit
            2001 => Ok(ErrorCode::VisitServiceRequired),
            2002 => Ok(ErrorCode::VisitAmountInvalid),

            // Reward
            3001 => Ok(ErrorCode::RewardNotFound),
            3002 => Ok(ErrorCode::RewardInactive),
            3003 => Ok(ErrorCode::RewardPointsInvalid),
            3004 => Ok(ErrorCode::InsufficientPoints),
            3005 => Ok(ErrorCode::RewardNameRequired),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::ConstraintViolation),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}
