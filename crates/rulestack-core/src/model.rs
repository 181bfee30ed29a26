//! Validated configuration model.
//!
//! Everything here is built by the loader from a parsed document and is
//! immutable afterwards. Glob patterns are compiled and rule values are
//! checked at construction, so resolution only has to walk the layers.

use crate::error::ConfigError;
use crate::loader;
use crate::pattern::{normalize_path, GlobPattern};
use crate::types::RuleSet;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The settings one layer contributes: a base config, the root document,
/// or a matching override block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigLayer {
    pub(crate) parser: Option<String>,
    pub(crate) parser_options: Map<String, Value>,
    pub(crate) plugins: Vec<String>,
    pub(crate) env: BTreeMap<String, bool>,
    pub(crate) settings: Map<String, Value>,
    pub(crate) extends: Vec<String>,
    pub(crate) rules: RuleSet,
}

impl ConfigLayer {
    /// Creates an empty layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the parser.
    #[must_use]
    pub fn with_parser(mut self, parser: impl Into<String>) -> Self {
        self.parser = Some(parser.into());
        self
    }

    /// Appends a base config reference.
    #[must_use]
    pub fn with_extends(mut self, name: impl Into<String>) -> Self {
        self.extends.push(name.into());
        self
    }

    /// Activates a plugin.
    #[must_use]
    pub fn with_plugin(mut self, name: impl Into<String>) -> Self {
        self.plugins.push(name.into());
        self
    }

    /// Sets an environment flag.
    #[must_use]
    pub fn with_env(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.env.insert(name.into(), enabled);
        self
    }

    /// Replaces the rule mapping.
    #[must_use]
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Returns the parser, if this layer selects one.
    #[must_use]
    pub fn parser(&self) -> Option<&str> {
        self.parser.as_deref()
    }

    /// Returns the parser options.
    #[must_use]
    pub fn parser_options(&self) -> &Map<String, Value> {
        &self.parser_options
    }

    /// Returns the activated plugins.
    #[must_use]
    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    /// Returns the environment flags.
    #[must_use]
    pub fn env(&self) -> &BTreeMap<String, bool> {
        &self.env
    }

    /// Returns the opaque settings.
    #[must_use]
    pub fn settings(&self) -> &Map<String, Value> {
        &self.settings
    }

    /// Returns the base config names, in application order.
    #[must_use]
    pub fn extends(&self) -> &[String] {
        &self.extends
    }

    /// Returns this layer's own rules.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

/// A named, reusable bundle of settings referenced from `extends`.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseConfig {
    name: String,
    layer: ConfigLayer,
}

impl BaseConfig {
    /// Creates a base config.
    #[must_use]
    pub fn new(name: impl Into<String>, layer: ConfigLayer) -> Self {
        Self {
            name: name.into(),
            layer,
        }
    }

    /// Returns the name other configs refer to it by.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the settings it contributes.
    #[must_use]
    pub fn layer(&self) -> &ConfigLayer {
        &self.layer
    }
}

/// Settings applied only to files matching `files` and not `excluded_files`.
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideBlock {
    files: Vec<GlobPattern>,
    excluded_files: Vec<GlobPattern>,
    layer: ConfigLayer,
}

impl OverrideBlock {
    /// Creates an override block.
    #[must_use]
    pub fn new(
        files: Vec<GlobPattern>,
        excluded_files: Vec<GlobPattern>,
        layer: ConfigLayer,
    ) -> Self {
        Self {
            files,
            excluded_files,
            layer,
        }
    }

    /// Returns the inclusion patterns.
    #[must_use]
    pub fn files(&self) -> &[GlobPattern] {
        &self.files
    }

    /// Returns the exclusion patterns.
    #[must_use]
    pub fn excluded_files(&self) -> &[GlobPattern] {
        &self.excluded_files
    }

    /// Returns the settings applied to matching files.
    #[must_use]
    pub fn layer(&self) -> &ConfigLayer {
        &self.layer
    }

    /// Tests whether a normalized path falls under this block.
    #[must_use]
    pub fn applies_to(&self, path: &str) -> bool {
        self.files.iter().any(|p| p.matches(path))
            && !self.excluded_files.iter().any(|p| p.matches(path))
    }
}

/// The root configuration document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    layer: ConfigLayer,
    overrides: Vec<OverrideBlock>,
    base_dir: Option<PathBuf>,
}

impl Configuration {
    /// Creates a configuration from its top-level layer and override blocks.
    #[must_use]
    pub fn new(layer: ConfigLayer, overrides: Vec<OverrideBlock>) -> Self {
        Self {
            layer,
            overrides,
            base_dir: None,
        }
    }

    /// Sets the directory absolute file paths are made relative to.
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Parses a configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or any field fails validation.
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        loader::load_configuration(toml::from_str(content)?)
    }

    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or any field fails validation.
    pub fn parse_json(content: &str) -> Result<Self, ConfigError> {
        loader::load_configuration(serde_json::from_str(content)?)
    }

    /// Loads a configuration file, picking the format from its extension.
    ///
    /// The file's directory becomes the base directory for path matching.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unsupported
    /// extension, or fails to parse.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config = match loader::read_document(path)? {
            loader::Document::Toml(content) => Self::parse_toml(&content)?,
            loader::Document::Json(content) => Self::parse_json(&content)?,
        };
        Ok(match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => config.with_base_dir(dir),
            _ => config,
        })
    }

    /// Returns the top-level layer.
    #[must_use]
    pub fn layer(&self) -> &ConfigLayer {
        &self.layer
    }

    /// Returns the override blocks, in authoring order.
    #[must_use]
    pub fn overrides(&self) -> &[OverrideBlock] {
        &self.overrides
    }

    /// Returns the base directory, if one was set.
    #[must_use]
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Normalizes a file path for matching against override patterns.
    #[must_use]
    pub fn normalize(&self, path: &Path) -> String {
        normalize_path(path, self.base_dir())
    }

    /// Returns the indices of the override blocks that apply to a path,
    /// in authoring order.
    #[must_use]
    pub fn matching_overrides(&self, path: &Path) -> Vec<usize> {
        let normalized = self.normalize(path);
        self.overrides
            .iter()
            .enumerate()
            .filter(|(_, block)| block.applies_to(&normalized))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(files: &[&str], excluded: &[&str]) -> OverrideBlock {
        OverrideBlock::new(
            files.iter().map(|p| GlobPattern::new(p).unwrap()).collect(),
            excluded.iter().map(|p| GlobPattern::new(p).unwrap()).collect(),
            ConfigLayer::new(),
        )
    }

    #[test]
    fn override_applies_to_matching_files() {
        let b = block(&["**/*.ts"], &[]);
        assert!(b.applies_to("src/a.ts"));
        assert!(!b.applies_to("src/a.js"));
    }

    #[test]
    fn excluded_files_win_over_files() {
        let b = block(&["**/*.ts"], &["**/*.d.ts"]);
        assert!(b.applies_to("src/a.ts"));
        assert!(!b.applies_to("src/types.d.ts"));
    }

    #[test]
    fn matching_overrides_in_order() {
        let config = Configuration::new(
            ConfigLayer::new(),
            vec![
                block(&["**/*.js"], &[]),
                block(&["**/*.tsx"], &[]),
                block(&["src/**"], &[]),
            ],
        );
        assert_eq!(config.matching_overrides(Path::new("src/App.tsx")), vec![1, 2]);
        assert_eq!(config.matching_overrides(Path::new("lib/a.js")), vec![0]);
        assert!(config.matching_overrides(Path::new("README.md")).is_empty());
    }

    #[test]
    fn absolute_paths_use_base_dir() {
        let config = Configuration::new(ConfigLayer::new(), vec![block(&["src/**"], &[])])
            .with_base_dir("/repo");
        assert_eq!(config.matching_overrides(Path::new("/repo/src/a.js")), vec![0]);
        assert!(config.matching_overrides(Path::new("/other/src/a.js")).is_empty());
    }

    #[test]
    fn layer_builders() {
        let layer = ConfigLayer::new()
            .with_parser("@babel/eslint-parser")
            .with_extends("airbnb")
            .with_plugin("import")
            .with_env("browser", true);
        assert_eq!(layer.parser(), Some("@babel/eslint-parser"));
        assert_eq!(layer.extends(), ["airbnb".to_string()]);
        assert_eq!(layer.plugins(), ["import".to_string()]);
        assert_eq!(layer.env().get("browser"), Some(&true));
        assert!(layer.rules().is_empty());
    }
}
