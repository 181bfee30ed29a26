//! Per-file resolution of layered configurations.
//!
//! # Layer order
//!
//! ```text
//! extends[0] .. extends[n]        (each base: its own extends, then its rules)
//!   ↓
//! top-level settings and rules
//!   ↓
//! matching overrides[i], in order (each: its extends, then its rules)
//!   ↓
//! EffectiveConfig
//! ```
//!
//! A later layer replaces a rule's whole value; options are never merged.

use crate::error::ConfigError;
use crate::model::{ConfigLayer, Configuration};
use crate::registry::BaseConfigSource;
use crate::types::{RuleName, RuleSet};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// The fully resolved configuration for one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    parser: Option<String>,
    parser_options: Map<String, Value>,
    plugins: Vec<String>,
    env: BTreeMap<String, bool>,
    settings: Map<String, Value>,
    rules: RuleSet,
}

impl EffectiveConfig {
    /// Returns the selected parser.
    #[must_use]
    pub fn parser(&self) -> Option<&str> {
        self.parser.as_deref()
    }

    /// Returns the merged parser options.
    #[must_use]
    pub fn parser_options(&self) -> &Map<String, Value> {
        &self.parser_options
    }

    /// Returns every activated plugin, in first-seen order.
    #[must_use]
    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    /// Returns the merged environment flags.
    #[must_use]
    pub fn env(&self) -> &BTreeMap<String, bool> {
        &self.env
    }

    /// Returns the merged settings.
    #[must_use]
    pub fn settings(&self) -> &Map<String, Value> {
        &self.settings
    }

    /// Returns the effective rules.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Consumes the configuration, keeping only the rules.
    #[must_use]
    pub fn into_rules(self) -> RuleSet {
        self.rules
    }

    /// Returns plugin rules whose plugin no applied layer activates.
    #[must_use]
    pub fn rules_missing_plugin(&self) -> Vec<&RuleName> {
        self.rules
            .iter()
            .filter(|(name, _)| {
                name.plugin()
                    .is_some_and(|plugin| !self.plugins.iter().any(|p| p == plugin))
            })
            .map(|(name, _)| name)
            .collect()
    }

    fn absorb(&mut self, layer: &ConfigLayer) {
        if let Some(parser) = &layer.parser {
            self.parser = Some(parser.clone());
        }
        merge_map(&mut self.parser_options, &layer.parser_options);
        for plugin in &layer.plugins {
            if !self.plugins.contains(plugin) {
                self.plugins.push(plugin.clone());
            }
        }
        self.env.extend(layer.env.iter().map(|(k, v)| (k.clone(), *v)));
        merge_map(&mut self.settings, &layer.settings);
        self.rules.overlay(&layer.rules);
    }
}

/// Recursively merges mappings; any other value replaces the old one.
fn merge_map(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        match (target.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_map(existing, incoming);
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Resolves a [`Configuration`] against a source of base configs.
///
/// The resolver borrows both inputs and holds no state of its own, so one
/// instance can serve any number of files, from any number of threads.
pub struct Resolver<'a, S: ?Sized> {
    config: &'a Configuration,
    bases: &'a S,
}

impl<'a, S: BaseConfigSource + ?Sized> Resolver<'a, S> {
    /// Creates a resolver.
    #[must_use]
    pub fn new(config: &'a Configuration, bases: &'a S) -> Self {
        Self { config, bases }
    }

    /// Resolves the configuration for a file.
    ///
    /// # Errors
    ///
    /// Returns an error if any applied `extends` entry names an unknown base
    /// config, or base configs extend each other in a cycle.
    pub fn resolve_for_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<EffectiveConfig, ConfigError> {
        let path = path.as_ref();
        let mut effective = self.resolve_global()?;
        let normalized = self.config.normalize(path);

        for (i, block) in self.config.overrides().iter().enumerate() {
            if !block.applies_to(&normalized) {
                continue;
            }
            tracing::debug!(file = %normalized, "Applying overrides[{i}]");
            self.apply_layer(
                &mut effective,
                block.layer(),
                &format!("overrides[{i}]"),
                &mut Vec::new(),
            )?;
        }

        for name in effective.rules_missing_plugin() {
            tracing::debug!(file = %normalized, rule = %name, "Rule plugin is not activated");
        }
        Ok(effective)
    }

    /// Resolves the configuration for a file no override block matches.
    ///
    /// # Errors
    ///
    /// Same as [`Resolver::resolve_for_file`], for the top-level `extends`.
    pub fn resolve_global(&self) -> Result<EffectiveConfig, ConfigError> {
        let mut effective = EffectiveConfig::default();
        self.apply_layer(&mut effective, self.config.layer(), "extends", &mut Vec::new())?;
        Ok(effective)
    }

    /// Resolves a single base config, including everything it extends.
    ///
    /// # Errors
    ///
    /// Returns an error if the base or anything it extends is unknown, or if
    /// the chain is circular.
    pub fn resolve_base(&self, name: &str) -> Result<EffectiveConfig, ConfigError> {
        let mut effective = EffectiveConfig::default();
        self.apply_base(&mut effective, name, "resolve_base", &mut Vec::new())?;
        Ok(effective)
    }

    fn apply_layer(
        &self,
        effective: &mut EffectiveConfig,
        layer: &ConfigLayer,
        context: &str,
        chain: &mut Vec<String>,
    ) -> Result<(), ConfigError> {
        for name in layer.extends() {
            self.apply_base(effective, name, context, chain)?;
        }
        effective.absorb(layer);
        Ok(())
    }

    fn apply_base(
        &self,
        effective: &mut EffectiveConfig,
        name: &str,
        context: &str,
        chain: &mut Vec<String>,
    ) -> Result<(), ConfigError> {
        if chain.iter().any(|seen| seen == name) {
            let mut cycle = chain.clone();
            cycle.push(name.to_string());
            return Err(ConfigError::CircularExtends { chain: cycle });
        }
        let base = self
            .bases
            .base(name)
            .ok_or_else(|| ConfigError::UnknownBase {
                context: context.to_string(),
                name: name.to_string(),
            })?;

        tracing::debug!(base = name, rules = base.layer().rules().len(), "Applying base config");
        chain.push(name.to_string());
        self.apply_layer(effective, base.layer(), &format!("base `{name}`"), chain)?;
        chain.pop();
        Ok(())
    }
}

/// Resolves the effective configuration for `path`.
///
/// Shorthand for `Resolver::new(config, bases).resolve_for_file(path)`.
///
/// # Errors
///
/// See [`Resolver::resolve_for_file`].
pub fn resolve_for_file<S: BaseConfigSource + ?Sized>(
    config: &Configuration,
    bases: &S,
    path: impl AsRef<Path>,
) -> Result<EffectiveConfig, ConfigError> {
    Resolver::new(config, bases).resolve_for_file(path)
}
