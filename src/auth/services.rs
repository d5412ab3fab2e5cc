use lazy_static::lazy_static;
use regex::Regex;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Normalized phone signature: country code and number concatenated with
/// every non-digit character stripped. Two identities match when their
/// signatures are equal.
pub(crate) fn phone_signature(country: &str, digits: &str) -> String {
    strip_non_digits(&format!("{country}{digits}"))
}

pub(crate) fn strip_non_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}
