//! Record aggregation into a single ordered dataset.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SchemaError;
use crate::models::record::{FieldValue, NormalizedRecord};
use crate::registry::Registry;

/// Result type for aggregation.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Builds a [`Dataset`] one record at a time.
///
/// The column set is fixed when the aggregator is created. Records keep
/// their append order.
#[derive(Debug, Clone)]
pub struct Aggregator {
    columns: Vec<String>,
    records: Vec<NormalizedRecord>,
}

impl Aggregator {
    pub fn new(registry: &Registry) -> Self {
        Self::with_columns(registry.ordered_fields().into_iter().map(String::from).collect())
    }

    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    /// Append a record whose field set must equal the column set.
    pub fn append(&mut self, record: NormalizedRecord) -> Result<()> {
        let expected: HashSet<&str> = self.columns.iter().map(String::as_str).collect();
        let actual: HashSet<&str> = record.values.keys().map(String::as_str).collect();

        if expected != actual {
            let mut missing: Vec<String> = self
                .columns
                .iter()
                .filter(|c| !actual.contains(c.as_str()))
                .cloned()
                .collect();
            missing.sort();
            let mut unexpected: Vec<String> = actual
                .difference(&expected)
                .map(|s| s.to_string())
                .collect();
            unexpected.sort();

            return Err(SchemaError {
                source_name: record.source,
                missing,
                unexpected,
            });
        }

        let NormalizedRecord {
            source,
            processed_at,
            mut values,
        } = record;

        // Store in column order regardless of how the record was assembled.
        let ordered: IndexMap<String, FieldValue> = self
            .columns
            .iter()
            .filter_map(|c| values.swap_remove_entry(c.as_str()))
            .collect();

        debug!("Appended record {} as row {}", source, self.records.len() + 1);
        self.records.push(NormalizedRecord {
            source,
            processed_at,
            values: ordered,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Freeze the records into a dataset.
    pub fn finalize(self) -> Dataset {
        Dataset {
            columns: self.columns,
            records: self.records,
        }
    }
}

/// Ordered records sharing one column set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<NormalizedRecord>,
}

impl Dataset {
    /// Columns in registry order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Column order for output: `priority` first, then the rest in registry order.
    ///
    /// Priority names that are not columns are skipped.
    pub fn ordered_columns<S: AsRef<str>>(&self, priority: &[S]) -> Vec<&str> {
        let mut ordered: Vec<&str> = Vec::with_capacity(self.columns.len());

        for name in priority {
            let name = name.as_ref();
            match self.columns.iter().find(|c| c.as_str() == name) {
                Some(column) if !ordered.contains(&column.as_str()) => ordered.push(column),
                Some(_) => {}
                None => warn!("Priority column {} is not a field, skipping", name),
            }
        }

        for column in &self.columns {
            if !ordered.contains(&column.as_str()) {
                ordered.push(column);
            }
        }

        ordered
    }

    /// Rows of cell text in the given column order.
    pub fn rows<'a>(
        &'a self,
        columns: &'a [&'a str],
        missing: &'a str,
    ) -> impl Iterator<Item = Vec<String>> + 'a {
        self.records.iter().map(move |record| {
            columns
                .iter()
                .map(|c| {
                    record
                        .get(c)
                        .map(|v| v.to_cell(missing))
                        .unwrap_or_else(|| missing.to_string())
                })
                .collect()
        })
    }
}
