//! Named base configs referenced from `extends`.

use crate::config_dto::BaseCatalogDto;
use crate::error::ConfigError;
use crate::loader::{self, Document};
use crate::model::BaseConfig;
use std::collections::HashMap;
use std::path::Path;

/// Anything that can look up a base config by name.
///
/// The resolver only needs lookups, so engines with their own plugin
/// loading can implement this directly instead of filling a registry.
pub trait BaseConfigSource {
    /// Returns the base config registered under `name`.
    fn base(&self, name: &str) -> Option<&BaseConfig>;
}

/// In-memory set of base configs.
#[derive(Debug, Clone, Default)]
pub struct BaseConfigRegistry {
    bases: HashMap<String, BaseConfig>,
}

impl BaseConfigRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a base config, returning the one it replaced.
    pub fn insert(&mut self, base: BaseConfig) -> Option<BaseConfig> {
        self.bases.insert(base.name().to_string(), base)
    }

    /// Adds a base config (builder style).
    #[must_use]
    pub fn with_base(mut self, base: BaseConfig) -> Self {
        self.insert(base);
        self
    }

    /// Adds every base config from `other`, replacing same-named entries.
    pub fn extend_from(&mut self, other: BaseConfigRegistry) {
        self.bases.extend(other.bases);
    }

    /// Returns the number of registered base configs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Returns registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bases.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Parses a TOML catalog of `[bases."<name>"]` tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or a base fails validation.
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        Self::from_catalog(toml::from_str(content)?)
    }

    /// Parses a JSON catalog: `{ "bases": { "<name>": { ... } } }`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or a base fails validation.
    pub fn parse_json(content: &str) -> Result<Self, ConfigError> {
        Self::from_catalog(serde_json::from_str(content)?)
    }

    /// Loads a catalog file, picking the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match loader::read_document(path)? {
            Document::Toml(content) => Self::parse_toml(&content),
            Document::Json(content) => Self::parse_json(&content),
        }
    }

    fn from_catalog(dto: BaseCatalogDto) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for base in loader::load_catalog(dto)? {
            registry.insert(base);
        }
        tracing::debug!("Loaded {} base config(s)", registry.len());
        Ok(registry)
    }
}

impl BaseConfigSource for BaseConfigRegistry {
    fn base(&self, name: &str) -> Option<&BaseConfig> {
        self.bases.get(name)
    }
}

impl<S: BaseConfigSource + ?Sized> BaseConfigSource for &S {
    fn base(&self, name: &str) -> Option<&BaseConfig> {
        (**self).base(name)
    }
}

impl FromIterator<BaseConfig> for BaseConfigRegistry {
    fn from_iter<I: IntoIterator<Item = BaseConfig>>(iter: I) -> Self {
        let mut registry = Self::new();
        for base in iter {
            registry.insert(base);
        }
        registry
    }
}
