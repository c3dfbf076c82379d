//! Error types for the formsheet-core library.

use thiserror::Error;

/// Main error type for the formsheet library.
#[derive(Error, Debug)]
pub enum FormsheetError {
    /// Field registry configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A single document could not be turned into a record.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// A record did not cover the dataset's column set.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while building the field registry.
///
/// All of these are fatal and surface before any document is processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The same field name was registered twice in one load.
    #[error("field registered twice: {0}")]
    DuplicateField(String),

    /// A lookup named a field the registry does not hold.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A rule pattern has no capture group to take the value from.
    #[error("rule {index} of field {field} has no capture group: {pattern}")]
    MalformedPattern {
        field: String,
        index: usize,
        pattern: String,
    },

    /// A rule pattern failed to compile.
    #[error("rule {index} of field {field} is not a valid pattern: {reason}")]
    InvalidPattern {
        field: String,
        index: usize,
        reason: String,
    },

    /// A field was declared without any rules.
    #[error("field {0} has no rules")]
    NoRules(String),

    /// An enumerated field was declared without a closed set of labels.
    #[error("enumerated field {0} has no choices")]
    MissingChoices(String),
}

/// Per-document failures. These skip the document, never the batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The source could not be read or decoded.
    #[error("{source_name}: unreadable source: {reason}")]
    Unreadable { source_name: String, reason: String },

    /// The source was read but held no text.
    #[error("{0}: no text extracted")]
    EmptyText(String),

    /// The source format is not handled.
    #[error("{source_name}: unsupported format: {extension}")]
    Unsupported {
        source_name: String,
        extension: String,
    },
}

impl DocumentError {
    /// Name of the source the failure belongs to.
    pub fn source_name(&self) -> &str {
        match self {
            DocumentError::Unreadable { source_name, .. } => source_name,
            DocumentError::EmptyText(source_name) => source_name,
            DocumentError::Unsupported { source_name, .. } => source_name,
        }
    }
}

/// A record's field set differs from the registry's.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("record {source_name} does not match the column set (missing: {missing:?}, unexpected: {unexpected:?})")]
pub struct SchemaError {
    pub source_name: String,
    pub missing: Vec<String>,
    pub unexpected: Vec<String>,
}

/// Result type for the formsheet library.
pub type Result<T> = std::result::Result<T, FormsheetError>;
