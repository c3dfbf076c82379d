//! Completeness reporting over a dataset.

mod insights;

pub use insights::{DatasetInsights, Tally, compute_insights};

use serde::Serialize;

use crate::aggregate::Dataset;

/// Extraction-rate band of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityBand {
    /// Above 90%.
    Excellent,
    /// Above 70%.
    Good,
    /// Above 50%.
    Fair,
    Poor,
}

impl QualityBand {
    pub fn from_fraction(fraction: f64) -> Self {
        if fraction > 0.9 {
            QualityBand::Excellent
        } else if fraction > 0.7 {
            QualityBand::Good
        } else if fraction > 0.5 {
            QualityBand::Fair
        } else {
            QualityBand::Poor
        }
    }
}

impl std::fmt::Display for QualityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            QualityBand::Excellent => "excellent",
            QualityBand::Good => "good",
            QualityBand::Fair => "fair",
            QualityBand::Poor => "poor",
        };
        f.pad(s)
    }
}

/// Completeness of one field across all records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCompleteness {
    pub field: String,
    /// Records where the field was extracted.
    pub present: usize,
    /// Present values kept verbatim (unparsed dates, unmapped labels).
    pub flagged: usize,
    pub total: usize,
}

impl FieldCompleteness {
    /// Fraction of records with the field present; `None` when there are no records.
    pub fn fraction(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.present as f64 / self.total as f64)
        }
    }

    pub fn band(&self) -> Option<QualityBand> {
        self.fraction().map(QualityBand::from_fraction)
    }
}

/// Missing fields of one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordCompleteness {
    pub source: String,
    pub missing_fields: Vec<String>,
}

impl RecordCompleteness {
    pub fn missing(&self) -> usize {
        self.missing_fields.len()
    }
}

/// Read-only completeness view of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletenessReport {
    pub total_records: usize,
    pub fields: Vec<FieldCompleteness>,
    pub records: Vec<RecordCompleteness>,
}

impl CompletenessReport {
    pub fn field(&self, name: &str) -> Option<&FieldCompleteness> {
        self.fields.iter().find(|f| f.field == name)
    }

    /// Mean of the per-field fractions; `None` with no records or no fields.
    pub fn overall_rate(&self) -> Option<f64> {
        let fractions: Vec<f64> = self.fields.iter().filter_map(|f| f.fraction()).collect();
        if fractions.is_empty() {
            None
        } else {
            Some(fractions.iter().sum::<f64>() / fractions.len() as f64)
        }
    }

    /// Field with the highest fraction; earlier fields win ties.
    pub fn best_field(&self) -> Option<&FieldCompleteness> {
        self.fields
            .iter()
            .filter(|f| f.fraction().is_some())
            .fold(None, |best: Option<&FieldCompleteness>, f| match best {
                Some(b) if b.present >= f.present => Some(b),
                _ => Some(f),
            })
    }

    /// Field with the lowest fraction; earlier fields win ties.
    pub fn worst_field(&self) -> Option<&FieldCompleteness> {
        self.fields
            .iter()
            .filter(|f| f.fraction().is_some())
            .fold(None, |worst: Option<&FieldCompleteness>, f| match worst {
                Some(w) if w.present <= f.present => Some(w),
                _ => Some(f),
            })
    }
}

/// Compute per-field and per-record completeness.
pub fn compute_completeness(dataset: &Dataset) -> CompletenessReport {
    let total = dataset.len();

    let fields = dataset
        .columns()
        .iter()
        .map(|column| {
            let values = dataset.records().iter().filter_map(|r| r.get(column));
            let (present, flagged) = values.fold((0, 0), |(present, flagged), v| {
                (
                    present + usize::from(v.is_present()),
                    flagged + usize::from(v.is_flagged()),
                )
            });
            FieldCompleteness {
                field: column.clone(),
                present,
                flagged,
                total,
            }
        })
        .collect();

    let records = dataset
        .records()
        .iter()
        .map(|r| RecordCompleteness {
            source: r.source.clone(),
            missing_fields: r.missing_fields().into_iter().map(String::from).collect(),
        })
        .collect();

    CompletenessReport {
        total_records: total,
        fields,
        records,
    }
}
