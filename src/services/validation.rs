//! Field validation helpers shared by the entity services

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ServiceError, ServiceResult};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$",
    )
    .expect("email pattern is valid")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ().\-]+$").expect("phone pattern is valid"));

pub const MIN_PHONE_DIGITS: usize = 8;
pub const MAX_PHONE_LEN: usize = 20;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Digits with an optional leading `+`, separated by spaces, dashes, dots
/// or parentheses.
pub fn is_valid_phone(phone: &str) -> bool {
    let len = phone.chars().count();
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    (MIN_PHONE_DIGITS..=MAX_PHONE_LEN).contains(&len)
        && digits >= MIN_PHONE_DIGITS
        && PHONE_RE.is_match(phone)
}

/// Trimmed, non-blank value of at most `max` characters
pub fn required(field: &str, value: &str, max: usize) -> ServiceResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::validation(format!("{} is required", field)));
    }
    max_len(field, value, max)?;
    Ok(value.to_string())
}

/// Like [`required`] without a length limit
pub fn required_unbounded(field: &str, value: &str) -> ServiceResult<String> {
    required(field, value, usize::MAX)
}

/// Blank values become `None`
pub fn optional(field: &str, value: Option<String>, max: usize) -> ServiceResult<Option<String>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => {
            max_len(field, v, max)?;
            Ok(Some(v.to_string()))
        }
    }
}

pub fn max_len(field: &str, value: &str, max: usize) -> ServiceResult<()> {
    if value.chars().count() > max {
        return Err(ServiceError::validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

pub fn email(field: &str, value: &str, max: usize) -> ServiceResult<String> {
    let value = required(field, value, max)?;
    if !is_valid_email(&value) {
        return Err(ServiceError::validation(format!("{} must be a valid email address", field)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("invalid-email"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("user @example.com"));
    }

    #[test]
    fn test_phone_validation() {
        assert!(is_valid_phone("+55 11 91234-5678"));
        assert!(is_valid_phone("(555) 123-4567"));
        assert!(is_valid_phone("12345678"));
        assert!(!is_valid_phone("1234567"));
        assert!(!is_valid_phone("call me maybe"));
        assert!(!is_valid_phone("+1 (555) 123-4567 ext 9"));
        assert!(!is_valid_phone("123456789012345678901"));
    }

    #[test]
    fn test_required_trims_and_bounds() {
        assert_eq!(required("name", "  Ana ", 10).unwrap(), "Ana");
        assert!(matches!(required("name", "   ", 10), Err(ServiceError::Validation(_))));
        assert!(required("name", "abcdefghijk", 10).is_err());
        // Limits count characters, not bytes.
        assert!(required("name", "ééééé", 5).is_ok());
    }

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(optional("message", Some("  ".to_string()), 5).unwrap(), None);
        assert_eq!(optional("message", None, 5).unwrap(), None);
        assert_eq!(optional("message", Some(" hi ".to_string()), 5).unwrap(), Some("hi".to_string()));
        assert!(optional("message", Some("toolong".to_string()), 5).is_err());
    }
}
