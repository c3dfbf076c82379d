//! Per-document pipeline and batch collection.
//!
//! A [`Pipeline`] is cheap to clone and holds only shared, immutable state,
//! so one clone per worker is enough for parallel processing. Results are
//! handed to a single [`BatchCollector`], which owns the aggregator.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregate::{Aggregator, Dataset};
use crate::error::{DocumentError, SchemaError};
use crate::extract::extract;
use crate::models::record::{NormalizedRecord, RawDocument};
use crate::normalize::{NormalizeOptions, Normalizer};
use crate::registry::Registry;
use crate::source::SourceReader;

/// Raw document to normalized record.
#[derive(Debug, Clone)]
pub struct Pipeline {
    registry: Arc<Registry>,
    normalizer: Normalizer,
}

impl Pipeline {
    pub fn new(registry: Arc<Registry>, options: NormalizeOptions) -> Self {
        Self {
            registry,
            normalizer: Normalizer::new(options),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Extract and normalize one document.
    ///
    /// A document with no text is an error; a document where no field
    /// matched is not.
    pub fn process(&self, doc: &RawDocument) -> Result<NormalizedRecord, DocumentError> {
        if doc.text.trim().is_empty() {
            return Err(DocumentError::EmptyText(doc.source.clone()));
        }

        let extracted = extract(&doc.text, &self.registry);
        debug!(
            "{}: matched {}/{} fields",
            doc.source,
            extracted.matched_count(),
            extracted.len()
        );

        Ok(self
            .normalizer
            .normalize_record(&doc.source, &extracted, &self.registry))
    }

    /// Load a file and process it.
    pub fn process_file(
        &self,
        reader: &SourceReader,
        path: &Path,
    ) -> Result<NormalizedRecord, DocumentError> {
        let doc = reader.load(path)?;
        self.process(&doc)
    }
}

/// A document left out of the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDocument {
    pub source: String,
    pub reason: String,
}

impl From<DocumentError> for SkippedDocument {
    fn from(err: DocumentError) -> Self {
        Self {
            source: err.source_name().to_string(),
            reason: err.to_string(),
        }
    }
}

/// What a batch run produced.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub dataset: Dataset,
    pub skipped: Vec<SkippedDocument>,
}

impl BatchOutcome {
    /// Documents seen, processed or not.
    pub fn total(&self) -> usize {
        self.dataset.len() + self.skipped.len()
    }
}

/// Single writer for a batch: appends records, logs skipped documents.
#[derive(Debug)]
pub struct BatchCollector {
    aggregator: Aggregator,
    skipped: Vec<SkippedDocument>,
}

impl BatchCollector {
    pub fn new(registry: &Registry) -> Self {
        Self {
            aggregator: Aggregator::new(registry),
            skipped: Vec::new(),
        }
    }

    /// Record one document result.
    ///
    /// Document errors are kept as skipped entries. A schema mismatch is
    /// an internal fault and is returned.
    pub fn push(
        &mut self,
        result: Result<NormalizedRecord, DocumentError>,
    ) -> Result<(), SchemaError> {
        match result {
            Ok(record) => self.aggregator.append(record),
            Err(err) => {
                warn!("Skipping {}", err);
                self.skipped.push(err.into());
                Ok(())
            }
        }
    }

    pub fn finish(self) -> BatchOutcome {
        let outcome = BatchOutcome {
            dataset: self.aggregator.finalize(),
            skipped: self.skipped,
        };
        info!(
            "Batch done: {} records, {} skipped",
            outcome.dataset.len(),
            outcome.skipped.len()
        );
        outcome
    }
}

/// Process documents one after another, in the given order.
pub fn run_batch<I>(pipeline: &Pipeline, docs: I) -> Result<BatchOutcome, SchemaError>
where
    I: IntoIterator<Item = Result<RawDocument, DocumentError>>,
{
    let mut collector = BatchCollector::new(pipeline.registry());
    for doc in docs {
        collector.push(doc.and_then(|d| pipeline.process(&d)))?;
    }
    Ok(collector.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::FieldValue;
    use crate::registry::{RuleDef, ValueKind};
    use pretty_assertions::assert_eq;

    fn pipeline() -> Pipeline {
        let mut builder = Registry::builder();
        builder
            .register(
                "email",
                vec![RuleDef::new(r"Email:\s*([^\s]+@[^\s]+)")],
                ValueKind::Email,
            )
            .unwrap()
            .register("gpa", vec![RuleDef::new(r"GPA:\s*([^\n]+)")], ValueKind::Numeric)
            .unwrap();
        Pipeline::new(Arc::new(builder.build()), NormalizeOptions::default())
    }

    #[test]
    fn test_process_document() {
        let doc = RawDocument::new("a.txt", "Email: a@b.com\nPhone: 123");
        let record = pipeline().process(&doc).unwrap();

        assert_eq!(record.source, "a.txt");
        assert_eq!(record.get("email"), Some(&FieldValue::Text("a@b.com".into())));
        assert_eq!(record.get("gpa"), Some(&FieldValue::Absent));
    }

    #[test]
    fn test_empty_text_is_document_error() {
        let doc = RawDocument::new("blank.txt", " \n\t ");
        assert_eq!(
            pipeline().process(&doc).unwrap_err(),
            DocumentError::EmptyText("blank.txt".to_string())
        );
    }

    #[test]
    fn test_no_matches_is_not_an_error() {
        let doc = RawDocument::new("other.txt", "Nothing to see here");
        let record = pipeline().process(&doc).unwrap();
        assert_eq!(record.missing_fields(), vec!["email", "gpa"]);
    }

    #[test]
    fn test_batch_skips_unreadable_document() {
        let docs = vec![
            Ok(RawDocument::new("a.txt", "Email: a@b.com")),
            Err(DocumentError::Unreadable {
                source_name: "b.pdf".to_string(),
                reason: "broken xref".to_string(),
            }),
            Ok(RawDocument::new("c.txt", "GPA: 3.75/4.0")),
        ];

        let outcome = run_batch(&pipeline(), docs).unwrap();

        assert_eq!(outcome.dataset.len(), 2);
        assert_eq!(outcome.total(), 3);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].source, "b.pdf");
        assert!(outcome.skipped[0].reason.contains("broken xref"));

        let sources: Vec<&str> = outcome
            .dataset
            .records()
            .iter()
            .map(|r| r.source.as_str())
            .collect();
        assert_eq!(sources, vec!["a.txt", "c.txt"]);
    }

    #[test]
    fn test_collector_rejects_foreign_record() {
        let pipeline = pipeline();
        let mut collector = BatchCollector::new(pipeline.registry());
        let record = NormalizedRecord::new("x.txt", Default::default());

        let err = collector.push(Ok(record)).unwrap_err();
        assert_eq!(err.missing, vec!["email".to_string(), "gpa".to_string()]);
    }

    #[test]
    fn test_process_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.txt");
        std::fs::write(&path, "GPA: 3.9").unwrap();

        let record = pipeline()
            .process_file(&SourceReader::new("\n"), &path)
            .unwrap();
        assert_eq!(record.source, "form.txt");
        assert_eq!(record.get("gpa").unwrap().to_string(), "3.9");
    }
}
