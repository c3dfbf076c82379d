//! Text, email and phone cleanup.

use serde::{Deserialize, Serialize};

use super::patterns::WHITESPACE_RUN;

/// How phone numbers are cleaned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhonePolicy {
    /// Trim and collapse whitespace; keep the source grouping and punctuation.
    #[default]
    Preserve,
    /// Keep digits only, plus a leading `+`.
    Digits,
}

/// Trim and collapse internal whitespace runs to a single space.
pub fn collapse_whitespace(raw: &str) -> String {
    WHITESPACE_RUN.replace_all(raw.trim(), " ").into_owned()
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn normalize_phone(raw: &str, policy: PhonePolicy) -> String {
    match policy {
        PhonePolicy::Preserve => collapse_whitespace(raw),
        PhonePolicy::Digits => {
            let trimmed = raw.trim();
            let mut out = String::with_capacity(trimmed.len());
            if trimmed.starts_with('+') {
                out.push('+');
            }
            out.extend(trimmed.chars().filter(|c| c.is_ascii_digit()));
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Jane   Q.\tDoe \n"), "Jane Q. Doe");
        assert_eq!(
            collapse_whitespace("9 Oak Street\nDenver, CO 80203"),
            "9 Oak Street Denver, CO 80203"
        );
    }

    #[test]
    fn test_email() {
        assert_eq!(normalize_email("  John.Smith@Example.COM "), "john.smith@example.com");
        assert_eq!(normalize_email("john@x.com"), normalize_email(&normalize_email("john@x.com")));
    }

    #[test]
    fn test_phone_preserve() {
        assert_eq!(normalize_phone(" (555)  123-4567 ", PhonePolicy::Preserve), "(555) 123-4567");
        assert_eq!(normalize_phone("+1 555.123.4567", PhonePolicy::Preserve), "+1 555.123.4567");
    }

    #[test]
    fn test_phone_digits() {
        assert_eq!(normalize_phone(" (555) 123-4567 ", PhonePolicy::Digits), "5551234567");
        assert_eq!(normalize_phone("+1 (555) 123-4567", PhonePolicy::Digits), "+15551234567");
        assert_eq!(normalize_phone("555+1234", PhonePolicy::Digits), "5551234");
    }

    #[test]
    fn test_phone_idempotent() {
        for policy in [PhonePolicy::Preserve, PhonePolicy::Digits] {
            let once = normalize_phone("+44 (20) 7946-0958", policy);
            assert_eq!(normalize_phone(&once, policy), once);
        }
    }
}
