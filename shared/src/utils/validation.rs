//! Common validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email pattern")
});

static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{2,31}$").expect("valid username pattern"));

/// Check whether a string is a plausible email address
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Check whether a username is acceptable
///
/// 3 to 32 characters, starting with a letter or digit, then letters,
/// digits, `.`, `_`, or `-`.
pub fn is_valid_username(value: &str) -> bool {
    USERNAME_PATTERN.is_match(value)
}
