//! Unified error system for the loyalty desk
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Customer errors
//! - 2xxx: Visit errors
//! - 3xxx: Reward errors
//! - 9xxx: System errors (store unreachable, constraint violations, config)
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::RewardNotFound);
//! assert_eq!(err.message, "Reward not found");
//!
//! let err = AppError::validation("Please enter a valid amount")
//!     .with_detail("field", "amount");
//! assert!(err.is_validation());
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
