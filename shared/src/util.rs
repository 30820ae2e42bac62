use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current UTC time, truncated to whole milliseconds.
///
/// The hosted store keeps microsecond precision at most, so trimming here keeps
/// a record equal to itself after a round trip.
pub fn now() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(now_millis()).unwrap_or_else(Utc::now)
}

/// Generate a client-side record identifier (UUID v4).
///
/// Identifiers are assigned before insertion so the same value travels in the
/// insert payload and in local state.
pub fn new_id() -> Uuid {
    Uuid::new_v4()
}

/// Keep only ASCII digits: `"+254 712-345 678"` -> `"254712345678"`.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Trimmed text, or `None` when nothing but whitespace was typed.
pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("+254 712 345 678"), "254712345678");
        assert_eq!(digits_only("712-345-678"), "712345678");
        assert_eq!(digits_only("(no digits)"), "");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  Grace "), Some("Grace".to_string()));
        assert_eq!(non_empty(" \t "), None);
    }

    #[test]
    fn test_new_id_is_unique() {
        assert_ne!(new_id(), new_id());
        assert!(!new_id().is_nil());
    }

    #[test]
    fn test_now_has_millisecond_precision() {
        let t = now();
        assert_eq!(t.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
