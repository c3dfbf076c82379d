//! Rule-based field extraction.
//!
//! Every field in the registry is looked up independently against the whole
//! text: rules never consume input, so two fields may read overlapping text.
//! Within a field the first rule whose capture is non-empty wins and the
//! remaining rules are not tried.

mod boundary;

pub use boundary::{extend_capture, is_label_line};

use indexmap::IndexMap;
use tracing::trace;

use crate::registry::{FieldSpec, Registry, Rule};

/// A raw value captured for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedField {
    /// Captured text, trimmed.
    pub value: String,
    /// Index of the rule that produced it.
    pub rule_index: usize,
    /// Byte range of the capture in the source text.
    pub position: (usize, usize),
}

/// Raw field values of one document, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedRecord {
    fields: IndexMap<String, Option<ExtractedField>>,
}

impl ExtractedRecord {
    /// Captured field, or `None` when no rule matched.
    pub fn get(&self, field: &str) -> Option<&ExtractedField> {
        self.fields.get(field).and_then(Option::as_ref)
    }

    /// Captured text, or `None` when no rule matched.
    pub fn raw(&self, field: &str) -> Option<&str> {
        self.get(field).map(|f| f.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ExtractedField>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Number of fields some rule matched.
    pub fn matched_count(&self) -> usize {
        self.fields.values().filter(|v| v.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Extract every registered field from `text`.
pub fn extract(text: &str, registry: &Registry) -> ExtractedRecord {
    let fields = registry
        .iter()
        .map(|spec| (spec.name().to_string(), extract_field(spec, text)))
        .collect();

    ExtractedRecord { fields }
}

/// Try a field's rules in order; the first non-empty capture wins.
pub fn extract_field(spec: &FieldSpec, text: &str) -> Option<ExtractedField> {
    for (index, rule) in spec.rules().iter().enumerate() {
        if let Some((value, position)) = apply_rule(rule, text) {
            trace!("{}: rule {} matched {:?}", spec.name(), index, value);
            return Some(ExtractedField {
                value,
                rule_index: index,
                position,
            });
        }
        trace!("{}: rule {} did not match", spec.name(), index);
    }

    None
}

fn apply_rule(rule: &Rule, text: &str) -> Option<(String, (usize, usize))> {
    for caps in rule.regex().captures_iter(text) {
        // Optional groups may not take part in a match.
        let Some(group) = caps.get(1) else {
            continue;
        };

        let end = if rule.is_multiline() {
            extend_capture(text, group.end())
        } else {
            group.end()
        };

        // A blank field must not borrow the next field's label line.
        let crossed_line = text[caps.get(0).map_or(group.start(), |m| m.start())..group.start()]
            .contains('\n');
        if crossed_line {
            let first_line = text[group.start()..].lines().next().unwrap_or_default();
            if is_label_line(first_line) {
                continue;
            }
        }

        let value = text[group.start()..end].trim();
        if !value.is_empty() {
            return Some((value.to_string(), (group.start(), end)));
        }
    }

    None
}
