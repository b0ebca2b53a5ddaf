// File: crm-core/src/validation/validators.rs
// Purpose: Basic input validators

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum digit count for a dialable phone number (area code included)
pub const MIN_PHONE_DIGITS: usize = 8;

// URL validation regex
static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("URL pattern is valid")
});

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate URL format
pub fn is_valid_url(url: &str) -> bool {
    URL_REGEX.is_match(url)
}

/// Control characters never belong in a typed field and break generated links
pub fn has_control_chars(value: &str) -> bool {
    value.chars().any(char::is_control)
}

/// Keep only ASCII digits
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

pub fn has_min_phone_digits(phone: &str) -> bool {
    digits_only(phone).len() >= MIN_PHONE_DIGITS
}
