//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// - 0xxx: General errors
/// - 1xxx: Customer errors
/// - 2xxx: Visit errors
/// - 3xxx: Reward errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Customer errors (1xxx)
    Customer,
    /// Visit errors (2xxx)
    Visit,
    /// Reward errors (3xxx)
    Reward,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            1000..2000 => Self::Customer,
            2000..3000 => Self::Visit,
            3000..4000 => Self::Reward,
            9000.. => Self::System,
            _ => Self::General,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Customer => "customer",
            Self::Visit => "visit",
            Self::Reward => "reward",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(8), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Customer);
        assert_eq!(ErrorCategory::from_code(2999), ErrorCategory::Visit);
        assert_eq!(ErrorCategory::from_code(3004), ErrorCategory::Reward);
        assert_eq!(ErrorCategory::from_code(5000), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::RequiredField.category(), ErrorCategory::General);
        assert_eq!(
            ErrorCode::CustomerPhoneInvalid.category(),
            ErrorCategory::Customer
        );
        assert_eq!(ErrorCode::VisitAmountInvalid.category(), ErrorCategory::Visit);
        assert_eq!(ErrorCode::InsufficientPoints.category(), ErrorCategory::Reward);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
        assert_eq!(ErrorCategory::System.name(), "system");
    }
}
