//! Data models for documents, records and configuration.

pub mod config;
pub mod record;

pub use config::{BatchConfig, ExtractionConfig, FormsheetConfig, OutputConfig};
pub use record::{DATE_FORMAT, FieldValue, NormalizedRecord, RawDocument};
