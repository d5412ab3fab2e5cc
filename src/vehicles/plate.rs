use lazy_static::lazy_static;
use regex::Regex;

/// Canonical plate form: trimmed and upper-cased.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// A normalized plate is valid when it is 1-7 characters of `[A-Z0-9-]`.
pub fn is_valid(plate: &str) -> bool {
    lazy_static! {
        static ref PLATE_RE: Regex = Regex::new(r"^[A-Z0-9-]{1,7}$").unwrap();
    }
    PLATE_RE.is_match(plate)
}

/// The single gate in front of every registry mutation and authoritative
/// query: normalizes the raw input and returns it only when valid.
pub fn normalize_valid(raw: &str) -> Option<String> {
    let plate = normalize(raw);
    is_valid(&plate).then_some(plate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_uppercases() {
        assert_eq!(normalize(" abc123 "), "ABC123");
        assert_eq!(normalize("\txy9 "), "XY9");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["abc123", " AB-12 ", "xy9", "A"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn accepts_the_full_charset_within_bounds() {
        assert!(is_valid("A"));
        assert!(is_valid("ABC123-"));
        assert!(is_valid("0000000"));
    }

    #[test]
    fn rejects_out_of_bounds_or_charset() {
        assert!(!is_valid(""));
        assert!(!is_valid("ABCD1234")); // 8 chars
        assert!(!is_valid("abc123")); // not normalized
        assert!(!is_valid("AB 123"));
        assert!(!is_valid("ÅBC"));
    }

    #[test]
    fn gate_combines_both_steps() {
        assert_eq!(normalize_valid(" abc123 ").as_deref(), Some("ABC123"));
        assert_eq!(normalize_valid("  "), None);
        assert_eq!(normalize_valid("toolong99"), None);
    }
}
