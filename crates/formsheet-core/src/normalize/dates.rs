//! Date parsing across the layouts found on forms.

use chrono::NaiveDate;
use regex::Captures;
use serde::{Deserialize, Serialize};

use super::patterns::{DATE_DAY_FIRST, DATE_MONTH_FIRST, DATE_NUMERIC, DATE_YMD};

/// How to read a numeric date such as `03/04/1990`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// month/day/year
    #[default]
    MonthFirst,
    /// day/month/year
    DayFirst,
}

/// Parse the earliest date found in `raw`.
///
/// Numeric dates are read in `order`; when that reading is not a valid
/// date the other order is tried, so 14/03/1990 still parses month-first.
pub fn parse_date(raw: &str, order: DateOrder) -> Option<NaiveDate> {
    let mut found: Vec<(usize, NaiveDate)> = Vec::new();

    if let Some(caps) = DATE_YMD.captures(raw) {
        let year: i32 = caps[1].parse().unwrap_or(0);
        let month: u32 = caps[2].parse().unwrap_or(0);
        let day: u32 = caps[3].parse().unwrap_or(0);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            found.push((start(&caps), date));
        }
    }

    for caps in DATE_NUMERIC.captures_iter(raw) {
        let first: u32 = caps[1].parse().unwrap_or(0);
        let second: u32 = caps[2].parse().unwrap_or(0);
        let year = parse_year(&caps[3]);

        let (month, day) = match order {
            DateOrder::MonthFirst => (first, second),
            DateOrder::DayFirst => (second, first),
        };

        let date = NaiveDate::from_ymd_opt(year, month, day)
            .or_else(|| NaiveDate::from_ymd_opt(year, day, month));
        if let Some(date) = date {
            found.push((start(&caps), date));
            break;
        }
    }

    if let Some(caps) = DATE_MONTH_FIRST.captures(raw) {
        let month = month_to_number(&caps[1]);
        let day: u32 = caps[2].parse().unwrap_or(0);
        let year: i32 = caps[3].parse().unwrap_or(0);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            found.push((start(&caps), date));
        }
    }

    if let Some(caps) = DATE_DAY_FIRST.captures(raw) {
        let day: u32 = caps[1].parse().unwrap_or(0);
        let month = month_to_number(&caps[2]);
        let year: i32 = caps[3].parse().unwrap_or(0);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            found.push((start(&caps), date));
        }
    }

    found.into_iter().min_by_key(|(pos, _)| *pos).map(|(_, date)| date)
}

fn start(caps: &Captures<'_>) -> usize {
    caps.get(0).map(|m| m.start()).unwrap_or(0)
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 {
            2000 + year
        } else {
            1900 + year
        }
    } else {
        year
    }
}

fn month_to_number(month: &str) -> u32 {
    match month.to_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" | "sept" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => 0,
    }
}
