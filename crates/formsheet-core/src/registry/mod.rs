//! Field registry: the ordered table of fields and their recognition rules.
//!
//! The registry is built once from declarative [`FieldDef`]s and never
//! mutated afterwards. Registration order is the output column order.

mod defaults;

pub use defaults::default_field_defs;

use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Declared kind of a field, as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindName {
    Text,
    Email,
    Phone,
    Date,
    Numeric,
    Enumerated,
}

impl std::fmt::Display for KindName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            KindName::Text => "text",
            KindName::Email => "email",
            KindName::Phone => "phone",
            KindName::Date => "date",
            KindName::Numeric => "numeric",
            KindName::Enumerated => "enumerated",
        };
        f.pad(s)
    }
}

/// One canonical label of an enumerated field and the spellings that map to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl Choice {
    pub fn new(label: impl Into<String>, aliases: &[&str]) -> Self {
        Self {
            label: label.into(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Value kind of a registered field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Email,
    Phone,
    Date,
    Numeric,
    /// Closed set of canonical labels.
    Enumerated(Vec<Choice>),
}

impl ValueKind {
    pub fn name(&self) -> KindName {
        match self {
            ValueKind::Text => KindName::Text,
            ValueKind::Email => KindName::Email,
            ValueKind::Phone => KindName::Phone,
            ValueKind::Date => KindName::Date,
            ValueKind::Numeric => KindName::Numeric,
            ValueKind::Enumerated(_) => KindName::Enumerated,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Declarative form of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDef {
    /// Pattern with at least one capture group; group 1 is the value.
    pub pattern: String,

    /// Continue the capture over following lines up to the next field label.
    #[serde(default)]
    pub multiline: bool,

    /// Match labels regardless of case.
    #[serde(default = "default_true")]
    pub case_insensitive: bool,
}

impl RuleDef {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            multiline: false,
            case_insensitive: true,
        }
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_insensitive = false;
        self
    }
}

/// Declarative form of a field, as loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub kind: KindName,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    pub rules: Vec<RuleDef>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: KindName, rules: Vec<RuleDef>) -> Self {
        Self {
            name: name.into(),
            kind,
            choices: Vec::new(),
            rules,
        }
    }

    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }

    /// Resolve the declared kind, pulling in the choice list for enumerated fields.
    pub fn value_kind(&self) -> Result<ValueKind> {
        Ok(match self.kind {
            KindName::Text => ValueKind::Text,
            KindName::Email => ValueKind::Email,
            KindName::Phone => ValueKind::Phone,
            KindName::Date => ValueKind::Date,
            KindName::Numeric => ValueKind::Numeric,
            KindName::Enumerated => {
                if self.choices.is_empty() {
                    return Err(ConfigError::MissingChoices(self.name.clone()));
                }
                ValueKind::Enumerated(self.choices.clone())
            }
        })
    }
}

/// A compiled recognition rule.
#[derive(Debug, Clone)]
pub struct Rule {
    regex: Regex,
    multiline: bool,
}

impl Rule {
    /// Compile a rule definition. `field` and `index` only label errors.
    pub fn compile(field: &str, index: usize, def: &RuleDef) -> Result<Self> {
        let regex = RegexBuilder::new(&def.pattern)
            .multi_line(true)
            .case_insensitive(def.case_insensitive)
            .build()
            .map_err(|e| ConfigError::InvalidPattern {
                field: field.to_string(),
                index,
                reason: e.to_string(),
            })?;

        // Group 0 is the whole match.
        if regex.captures_len() < 2 {
            return Err(ConfigError::MalformedPattern {
                field: field.to_string(),
                index,
                pattern: def.pattern.clone(),
            });
        }

        Ok(Self {
            regex,
            multiline: def.multiline,
        })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// A registered field: name, ordered rules and value kind.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    rules: Vec<Rule>,
    kind: ValueKind,
}

impl FieldSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rules in precedence order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }
}

/// Immutable, ordered field table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    fields: IndexMap<String, FieldSpec>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Build a registry from declarative definitions, in order.
    pub fn from_defs(defs: &[FieldDef]) -> Result<Self> {
        let mut builder = Self::builder();
        for def in defs {
            builder.register(def.name.clone(), def.rules.clone(), def.value_kind()?)?;
        }
        Ok(builder.build())
    }

    pub fn lookup(&self, name: &str) -> Result<&FieldSpec> {
        self.fields
            .get(name)
            .ok_or_else(|| ConfigError::UnknownField(name.to_string()))
    }

    /// Field names in registration order.
    pub fn ordered_fields(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.values()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Collects field registrations for a single configuration load.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    fields: IndexMap<String, FieldSpec>,
}

impl RegistryBuilder {
    /// Register a field. Each name may be registered once per load.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        rules: Vec<RuleDef>,
        kind: ValueKind,
    ) -> Result<&mut Self> {
        let name = name.into();

        if self.fields.contains_key(&name) {
            return Err(ConfigError::DuplicateField(name));
        }
        if rules.is_empty() {
            return Err(ConfigError::NoRules(name));
        }
        if let ValueKind::Enumerated(choices) = &kind {
            if choices.is_empty() {
                return Err(ConfigError::MissingChoices(name));
            }
        }

        let rules = rules
            .iter()
            .enumerate()
            .map(|(index, def)| Rule::compile(&name, index, def))
            .collect::<Result<Vec<_>>>()?;

        debug!("Registered field {} ({:?}, {} rules)", name, kind.name(), rules.len());

        self.fields.insert(
            name.clone(),
            FieldSpec { name, rules, kind },
        );
        Ok(self)
    }

    pub fn build(self) -> Registry {
        Registry {
            fields: self.fields,
        }
    }
}
