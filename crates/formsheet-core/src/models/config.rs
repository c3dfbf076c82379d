//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::normalize::{DateOrder, NormalizeOptions, PhonePolicy};
use crate::registry::{FieldDef, Registry, default_field_defs};

/// Main configuration for the formsheet pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsheetConfig {
    /// Extraction and normalization settings.
    pub extraction: ExtractionConfig,

    /// Spreadsheet output settings.
    pub output: OutputConfig,

    /// Batch processing settings.
    pub batch: BatchConfig,

    /// Field definitions. Empty means the built-in form fields.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDef>,
}

/// Extraction and normalization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// How to read ambiguous numeric dates such as 03/04/1990.
    pub date_order: DateOrder,

    /// How phone numbers are cleaned.
    pub phone_policy: PhonePolicy,

    /// Inserted between pages when a multi-page source is flattened.
    pub page_marker: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            date_order: DateOrder::MonthFirst,
            phone_policy: PhonePolicy::Preserve,
            page_marker: "\n\u{c}\n".to_string(),
        }
    }
}

/// Spreadsheet output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Fields placed first, after the source column. Remaining fields follow in registry order.
    pub priority_columns: Vec<String>,

    /// Append a processed-date column.
    pub include_processed_date: bool,

    /// Cell text for fields no rule matched.
    pub missing_marker: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            priority_columns: [
                "name",
                "email",
                "phone",
                "position",
                "customer_name",
                "product",
                "rating",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            include_processed_date: true,
            missing_marker: String::new(),
        }
    }
}

/// Batch processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of parallel workers.
    pub jobs: usize,

    /// Source file extensions picked up from a directory.
    pub extensions: Vec<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            jobs: 4,
            extensions: vec!["pdf".to_string(), "txt".to_string()],
        }
    }
}

impl FormsheetConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Field definitions in effect: the configured ones, or the built-in table.
    pub fn field_defs(&self) -> Vec<FieldDef> {
        if self.fields.is_empty() {
            default_field_defs()
        } else {
            self.fields.clone()
        }
    }

    /// Build the field registry. Fails on the first configuration error.
    pub fn build_registry(&self) -> std::result::Result<Registry, ConfigError> {
        Registry::from_defs(&self.field_defs())
    }

    /// Normalizer options derived from the extraction section.
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            date_order: self.extraction.date_order,
            phone_policy: self.extraction.phone_policy,
        }
    }
}
