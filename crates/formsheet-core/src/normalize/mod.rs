//! Value normalization per field kind.
//!
//! A raw value that was never extracted stays [`FieldValue::Absent`]. Values
//! that cannot be canonicalized are kept verbatim and flagged rather than
//! dropped: dates become [`FieldValue::Unparsed`], enumerations
//! [`FieldValue::Unmapped`].

mod choices;
mod dates;
mod numeric;
pub mod patterns;
mod text;

pub use choices::match_choice;
pub use dates::{DateOrder, parse_date};
pub use numeric::{find_number, parse_first_number};
pub use text::{PhonePolicy, collapse_whitespace, normalize_email, normalize_phone};

use std::str::FromStr;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extract::ExtractedRecord;
use crate::models::record::{FieldValue, NormalizedRecord};
use crate::registry::{Registry, ValueKind};

/// Tunables for normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    pub date_order: DateOrder,
    pub phone_policy: PhonePolicy,
}

/// Turns raw captures into canonical values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> NormalizeOptions {
        self.options
    }

    /// Normalize one raw value of the given kind.
    pub fn normalize(&self, field: &str, raw: Option<&str>, kind: &ValueKind) -> FieldValue {
        let Some(raw) = raw else {
            return FieldValue::Absent;
        };

        match kind {
            ValueKind::Text => FieldValue::Text(collapse_whitespace(raw)),
            ValueKind::Email => FieldValue::Text(normalize_email(raw)),
            ValueKind::Phone => FieldValue::Text(normalize_phone(raw, self.options.phone_policy)),
            ValueKind::Numeric => match find_number(raw) {
                Some(number) => match Decimal::from_str(&number) {
                    Ok(n) => FieldValue::Number(n),
                    Err(e) => {
                        debug!("{}: number {} out of range ({}), keeping raw", field, number, e);
                        FieldValue::Unparsed(collapse_whitespace(raw))
                    }
                },
                None => {
                    debug!("{}: no number in {:?}, treating as absent", field, raw);
                    FieldValue::Absent
                }
            },
            ValueKind::Date => match parse_date(raw, self.options.date_order) {
                Some(date) => FieldValue::Date(date),
                None => {
                    debug!("{}: unparsed date {:?}", field, raw);
                    FieldValue::Unparsed(collapse_whitespace(raw))
                }
            },
            ValueKind::Enumerated(choices) => match match_choice(raw, choices) {
                Some(label) => FieldValue::Label(label.to_string()),
                None => {
                    debug!("{}: unmapped value {:?}", field, raw);
                    FieldValue::Unmapped(collapse_whitespace(raw))
                }
            },
        }
    }

    /// Normalize every field of an extracted record, in registry order.
    pub fn normalize_record(
        &self,
        source: &str,
        extracted: &ExtractedRecord,
        registry: &Registry,
    ) -> NormalizedRecord {
        let values: IndexMap<String, FieldValue> = registry
            .iter()
            .map(|spec| {
                let value = self.normalize(spec.name(), extracted.raw(spec.name()), spec.kind());
                (spec.name().to_string(), value)
            })
            .collect();

        NormalizedRecord::new(source, values)
    }
}

/// Normalize with default options.
pub fn normalize(field: &str, raw: Option<&str>, kind: &ValueKind) -> FieldValue {
    Normalizer::default().normalize(field, raw, kind)
}
