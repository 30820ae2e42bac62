//! Desk error type
//!
//! Every state operation fails with a [`DeskError`]. Nothing is fatal: the
//! caller shows [`DeskError::notice`] and the desk keeps running.

use loyalty_client::ClientError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeskError {
    /// Input rejected before any network call
    #[error("验证错误: {0}")]
    Validation(#[from] AppError),

    /// The store could not be reached or refused the write
    #[error("持久化错误: {0}")]
    Persistence(#[from] ClientError),

    /// Referenced record is not in local state
    #[error("{0} not found")]
    NotFound(String),

    /// Valid input refused by a business rule (inactive reward, not enough points)
    #[error("操作被拒绝: {0}")]
    Rejected(AppError),
}

impl DeskError {
    /// Short message for a transient notice
    pub fn notice(&self) -> String {
        match self {
            DeskError::Validation(e) | DeskError::Rejected(e) => e.message.clone(),
            DeskError::Persistence(e) if e.is_network() => {
                "Unable to reach the server. Please try again.".to_string()
            }
            DeskError::Persistence(_) => "Failed to save changes. Please try again.".to_string(),
            DeskError::NotFound(what) => format!("{what} not found"),
        }
    }

    pub fn rejected(code: ErrorCode) -> Self {
        DeskError::Rejected(AppError::new(code))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, DeskError::Persistence(_))
    }
}

impl From<DeskError> for AppError {
    fn from(err: DeskError) -> Self {
        match err {
            DeskError::Validation(e) | DeskError::Rejected(e) => e,
            DeskError::Persistence(e) => e.into(),
            DeskError::NotFound(what) => AppError::not_found(what),
        }
    }
}

pub type DeskResult<T> = Result<T, DeskError>;
