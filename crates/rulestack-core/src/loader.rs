//! DTO → model conversion with validation.

use crate::config_dto::{BaseCatalogDto, ConfigurationDto, LayerDto, OverrideDto};
use crate::error::{ConfigError, ModelError};
use crate::model::{BaseConfig, ConfigLayer, Configuration, OverrideBlock};
use crate::pattern::GlobPattern;
use crate::types::{RuleName, RuleSet, RuleValue};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Raw document content tagged with its format.
pub(crate) enum Document {
    Toml(String),
    Json(String),
}

/// Reads a document, choosing the format from the file extension.
pub(crate) fn read_document(path: &Path) -> Result<Document, ConfigError> {
    let extension = path.extension().and_then(|e| e.to_str());
    if !matches!(extension, Some("toml" | "json")) {
        return Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!("Read config document {}", path.display());
    Ok(if extension == Some("toml") {
        Document::Toml(content)
    } else {
        Document::Json(content)
    })
}

/// Converts a `ConfigurationDto` to a validated [`Configuration`].
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load_configuration(dto: ConfigurationDto) -> Result<Configuration, ConfigError> {
    let layer = load_layer(dto.layer, "")?;
    let overrides = dto
        .overrides
        .into_iter()
        .enumerate()
        .map(|(i, o)| load_override(o, i))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Configuration::new(layer, overrides))
}

/// Converts a base-config catalog into named [`BaseConfig`]s.
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load_catalog(dto: BaseCatalogDto) -> Result<Vec<BaseConfig>, ConfigError> {
    dto.bases
        .into_iter()
        .map(|(name, layer)| {
            if name.is_empty() {
                return Err(ConfigError::invalid("bases", ModelError::EmptyBaseName));
            }
            let layer = load_layer(layer, &format!("bases.{name}"))?;
            Ok(BaseConfig::new(name, layer))
        })
        .collect()
}

fn load_override(dto: OverrideDto, index: usize) -> Result<OverrideBlock, ConfigError> {
    let ctx = format!("overrides[{index}]");
    let layer = load_layer(dto.layer, &ctx)?;
    let files = load_globs(dto.files.into_vec(), &format!("{ctx}.files"))?;
    if files.is_empty() {
        return Err(ConfigError::invalid(format!("{ctx}.files"), ModelError::MissingFiles));
    }
    let excluded_files = load_globs(
        dto.excluded_files.into_vec(),
        &format!("{ctx}.excludedFiles"),
    )?;
    Ok(OverrideBlock::new(files, excluded_files, layer))
}

fn load_globs(patterns: Vec<String>, ctx: &str) -> Result<Vec<GlobPattern>, ConfigError> {
    patterns
        .iter()
        .enumerate()
        .map(|(i, p)| {
            GlobPattern::new(p).map_err(|e| ConfigError::invalid(format!("{ctx}[{i}]"), e))
        })
        .collect()
}

fn load_layer(dto: LayerDto, ctx: &str) -> Result<ConfigLayer, ConfigError> {
    if let Some(name) = dto.extra.keys().next() {
        return Err(ConfigError::invalid(
            join(ctx, name),
            ModelError::UnknownField { name: name.clone() },
        ));
    }

    let extends = dto.extends.into_vec();
    if let Some(i) = extends.iter().position(String::is_empty) {
        return Err(ConfigError::invalid(
            join(ctx, &format!("extends[{i}]")),
            ModelError::EmptyBaseName,
        ));
    }

    let mut plugins: Vec<String> = Vec::with_capacity(dto.plugins.len());
    for plugin in dto.plugins {
        if !plugins.contains(&plugin) {
            plugins.push(plugin);
        }
    }

    Ok(ConfigLayer {
        parser: dto.parser,
        parser_options: dto.parser_options,
        plugins,
        env: dto.env,
        settings: dto.settings,
        extends,
        rules: load_rules(dto.rules, &join(ctx, "rules"))?,
    })
}

fn load_rules(rules: BTreeMap<String, Value>, ctx: &str) -> Result<RuleSet, ConfigError> {
    rules
        .into_iter()
        .map(|(name, value)| {
            let rule_ctx = format!("{ctx}.{name}");
            let rule = RuleName::new(&name).map_err(|e| ConfigError::invalid(&rule_ctx, e))?;
            let value = RuleValue::from_value(&value).map_err(|e| ConfigError::invalid(&rule_ctx, e))?;
            Ok((rule, value))
        })
        .collect()
}

fn join(ctx: &str, field: &str) -> String {
    if ctx.is_empty() {
        field.to_string()
    } else {
        format!("{ctx}.{field}")
    }
}
