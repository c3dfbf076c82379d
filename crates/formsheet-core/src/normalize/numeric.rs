//! Numeric values: salaries, years, GPA, ratings.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::NUMBER;

/// Locate the first numeric substring of `raw`, without thousands separators.
///
/// A hyphen counts as a minus sign only when it does not follow a letter or
/// digit, so "May-2020" reads as 2020.
pub fn find_number(raw: &str) -> Option<String> {
    let m = NUMBER.find(raw)?;
    let mut number = m.as_str();

    let glued = raw[..m.start()]
        .chars()
        .next_back()
        .is_some_and(char::is_alphanumeric);
    if glued {
        number = number.strip_prefix('-').unwrap_or(number);
    }

    Some(number.replace(',', ""))
}

/// Parse the first numeric substring of `raw`.
///
/// Comma thousands separators are dropped. No range checks are applied:
/// a GPA of 7.2 passes through as 7.2. A number too large for a decimal
/// yields `None`.
pub fn parse_first_number(raw: &str) -> Option<Decimal> {
    find_number(raw).and_then(|n| Decimal::from_str(&n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_first_number_wins() {
        assert_eq!(parse_first_number("3.75/4.0"), Some(dec("3.75")));
        assert_eq!(parse_first_number("5-7 years"), Some(dec("5")));
    }

    #[test]
    fn test_thousands_separators() {
        assert_eq!(parse_first_number("$72,500"), Some(dec("72500")));
        assert_eq!(parse_first_number("USD 1,250,000.50 per year"), Some(dec("1250000.50")));
        assert_eq!(parse_first_number("72500"), Some(dec("72500")));
    }

    #[test]
    fn test_no_number() {
        assert_eq!(parse_first_number("Negotiable"), None);
        assert_eq!(parse_first_number(""), None);
    }

    #[test]
    fn test_out_of_range_passes_through() {
        assert_eq!(parse_first_number("GPA 7.2"), Some(dec("7.2")));
        assert_eq!(parse_first_number("-3"), Some(dec("-3")));
        assert_eq!(parse_first_number("balance (-3)"), Some(dec("-3")));
        assert_eq!(parse_first_number("net -1,200"), Some(dec("-1200")));
    }

    #[test]
    fn test_hyphen_after_word_is_not_minus() {
        assert_eq!(parse_first_number("May-2020"), Some(dec("2020")));
        assert_eq!(parse_first_number("Spring-2024"), Some(dec("2024")));
        assert_eq!(parse_first_number("Grade-3.5"), Some(dec("3.5")));
    }

    #[test]
    fn test_overflow_is_found_but_not_parsed() {
        let raw = "123456789012345678901234567890123";
        assert_eq!(find_number(raw).as_deref(), Some(raw));
        assert_eq!(parse_first_number(raw), None);
    }

    #[test]
    fn test_idempotent() {
        let once = parse_first_number("$72,500.00").unwrap();
        assert_eq!(parse_first_number(&once.normalize().to_string()), Some(once));
    }
}
