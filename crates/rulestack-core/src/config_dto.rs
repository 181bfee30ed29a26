//! Document deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization of TOML and JSON
//! documents. They are converted to model types via the loader.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Fields shared by the root document, override blocks and base configs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDto {
    /// Parser identifier.
    #[serde(default)]
    pub parser: Option<String>,
    /// Parser options, passed through to the engine.
    #[serde(default)]
    pub parser_options: Map<String, Value>,
    /// Plugin names to activate.
    #[serde(default)]
    pub plugins: Vec<String>,
    /// Environment flags.
    #[serde(default)]
    pub env: BTreeMap<String, bool>,
    /// Opaque settings shared with every rule.
    #[serde(default)]
    pub settings: Map<String, Value>,
    /// Base config names; later entries take precedence.
    #[serde(default)]
    pub extends: OneOrMany,
    /// Rule name → severity or `[severity, ...options]`.
    #[serde(default)]
    pub rules: BTreeMap<String, Value>,
    /// Keys no other field claimed. The loader rejects any entry here.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Root configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigurationDto {
    /// Top-level settings.
    #[serde(flatten)]
    pub layer: LayerDto,
    /// File-scoped override blocks, in authoring order.
    #[serde(default)]
    pub overrides: Vec<OverrideDto>,
}

/// An override block.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideDto {
    /// Patterns selecting the files this block applies to.
    #[serde(default)]
    pub files: OneOrMany,
    /// Patterns removing files from the selection.
    #[serde(default)]
    pub excluded_files: OneOrMany,
    /// Settings applied to matching files.
    #[serde(flatten)]
    pub layer: LayerDto,
}

/// A catalog of named base configs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaseCatalogDto {
    /// Base configs keyed by the name used in `extends`.
    #[serde(default)]
    pub bases: BTreeMap<String, LayerDto>,
}

/// A single string or a sequence of strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    /// One entry.
    One(String),
    /// Several entries, in order.
    Many(Vec<String>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl OneOrMany {
    /// Returns the entries as a vec.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(s) => vec![s],
            Self::Many(v) => v,
        }
    }
}
