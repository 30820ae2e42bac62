//! Shared types for the loyalty desk
//!
//! Domain records, the error taxonomy, input validation and small utilities
//! used by both the store client and the front desk.

pub mod error;
pub mod models;
pub mod util;
pub mod validation;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
