//! Common regex patterns for value normalization.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    // 72,500.50 / 72500.50 / 3.75 / -4
    pub static ref NUMBER: Regex = Regex::new(
        r"-?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?"
    ).unwrap();

    // 1990-03-14 or 1990/03/14
    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[./\-](\d{1,2})[./\-](\d{1,2})\b"
    ).unwrap();

    // 03/14/1990, 14.03.1990, 3-14-90
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\b(\d{1,2})[./\-](\d{1,2})[./\-](\d{4}|\d{2})\b"
    ).unwrap();

    // March 14, 1990 / Mar. 14th 1990
    pub static ref DATE_MONTH_FIRST: Regex = Regex::new(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b"
    ).unwrap();

    // 14 March 1990 / 14th of March, 1990
    pub static ref DATE_DAY_FIRST: Regex = Regex::new(
        r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+(?:of\s+)?(jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?,?\s+(\d{4})\b"
    ).unwrap();
}
