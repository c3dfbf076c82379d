//! Core library for turning form documents into a tabular dataset.
//!
//! This crate provides:
//! - A declarative field registry with ordered recognition rules
//! - Rule-based field extraction from document text
//! - Value normalization (text, email, phone, numbers, dates, enumerations)
//! - Record aggregation and completeness reporting
//! - Source loading for plain text and PDF files

pub mod aggregate;
pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod source;

pub use aggregate::{Aggregator, Dataset};
pub use error::{ConfigError, DocumentError, FormsheetError, Result, SchemaError};
pub use extract::{ExtractedField, ExtractedRecord, extract};
pub use models::config::FormsheetConfig;
pub use models::record::{FieldValue, NormalizedRecord, RawDocument};
pub use normalize::{NormalizeOptions, Normalizer};
pub use pipeline::{BatchCollector, BatchOutcome, Pipeline, SkippedDocument, run_batch};
pub use registry::{FieldDef, FieldSpec, Registry, RuleDef, ValueKind};
pub use report::{CompletenessReport, DatasetInsights, QualityBand, compute_completeness, compute_insights};
pub use source::{SourceReader, discover_sources};
