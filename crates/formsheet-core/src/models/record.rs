//! Document and record models flowing through the extraction pipeline.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Canonical date layout for normalized dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Text of one source document as produced by the text-extraction step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Display name of the source (file name).
    pub source: String,
    /// Full text, pages joined with the page marker.
    pub text: String,
    /// Number of pages the text was assembled from.
    pub page_count: usize,
}

impl RawDocument {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
            page_count: 1,
        }
    }

    /// Assemble a document from per-page text.
    pub fn from_pages<I, S>(source: impl Into<String>, pages: I, page_marker: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        let mut page_count = 0;

        for page in pages {
            if page_count > 0 {
                text.push_str(page_marker);
            }
            text.push_str(page.as_ref());
            page_count += 1;
        }

        Self {
            source: source.into(),
            text,
            page_count,
        }
    }
}

/// A normalized field value.
///
/// `Absent` means no rule matched; it is distinct from an empty text value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// No rule matched (or a numeric field held no number).
    Absent,
    /// Cleaned text, email or phone value.
    Text(String),
    /// Parsed numeric value.
    Number(Decimal),
    /// Date in canonical form.
    Date(NaiveDate),
    /// Enumerated value mapped to its canonical label.
    Label(String),
    /// Date-like value no known layout could parse; raw text kept.
    Unparsed(String),
    /// Enumerated value outside the closed set; raw text kept.
    Unmapped(String),
}

impl FieldValue {
    /// Whether the field was extracted at all.
    pub fn is_present(&self) -> bool {
        !matches!(self, FieldValue::Absent)
    }

    /// Whether the value was kept verbatim because it could not be canonicalized.
    pub fn is_flagged(&self) -> bool {
        matches!(self, FieldValue::Unparsed(_) | FieldValue::Unmapped(_))
    }

    /// Render the value for a spreadsheet cell, using `missing` for absent values.
    pub fn to_cell(&self, missing: &str) -> String {
        match self {
            FieldValue::Absent => missing.to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Absent => Ok(()),
            FieldValue::Text(s)
            | FieldValue::Label(s)
            | FieldValue::Unparsed(s)
            | FieldValue::Unmapped(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{}", n.normalize()),
            FieldValue::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
        }
    }
}

/// A document's fields after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Source the record was built from.
    pub source: String,
    /// When the record was produced.
    pub processed_at: DateTime<Utc>,
    /// Field name to value, in registry order.
    pub values: IndexMap<String, FieldValue>,
}

impl NormalizedRecord {
    pub fn new(source: impl Into<String>, values: IndexMap<String, FieldValue>) -> Self {
        Self {
            source: source.into(),
            processed_at: Utc::now(),
            values,
        }
    }

    /// Value of a field, if the record has that column.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Names of the fields that were never matched.
    pub fn missing_fields(&self) -> Vec<&str> {
        self.values
            .iter()
            .filter(|(_, v)| !v.is_present())
            .map(|(k, _)| k.as_str())
            .collect()
    }
}
