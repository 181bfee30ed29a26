//! Configuration file discovery with global fallback.
//!
//! Resolves the configuration file using a deterministic priority order:
//!
//! 1. Explicit path from the caller
//! 2. `{project}/rulestack.toml`, `.rulestack.toml` or `rulestack.json`
//! 3. `$RULESTACK_CONFIG_DIR/config.toml`, else `~/.rulestack/config.toml`
//! 4. No config found → the embedded project configuration

use crate::project;
use rulestack_core::{ConfigError, Configuration};
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified by the caller.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Loaded from the global config directory.
    Global(PathBuf),
    /// No file found; the embedded configuration is used.
    Embedded,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Embedded => None,
        }
    }

    /// Returns `true` if the config was loaded from the global directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }

    /// Loads the configuration this source points at.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    pub fn load(&self) -> Result<Configuration, ConfigError> {
        match self.path() {
            Some(path) => Configuration::from_file(path),
            None => project::project_config(),
        }
    }
}

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["rulestack.toml", ".rulestack.toml", "rulestack.json"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration source for a project directory.
///
/// See module-level docs for resolution order.
#[must_use]
pub fn resolve_source(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_inner(project_dir, explicit, global_config_dir())
}

/// Resolves and loads the configuration for a project directory.
///
/// # Errors
///
/// Returns an error if the resolved file cannot be read or fails validation.
pub fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<Configuration, ConfigError> {
    let source = resolve_source(project_dir, explicit);
    tracing::debug!(?source, "Resolved configuration source");
    source.load()
}

/// Testable core: accepts `global_dir` as parameter to avoid env var races.
fn resolve_inner(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    for name in PROJECT_CONFIG_NAMES {
        let candidate = project_dir.join(name);
        if candidate.exists() {
            tracing::debug!("Found project config: {}", candidate.display());
            return ConfigSource::Project(candidate);
        }
    }

    if let Some(dir) = global_dir {
        let candidate = dir.join(GLOBAL_CONFIG_NAME);
        if candidate.exists() {
            tracing::debug!("Found global config: {}", candidate.display());
            return ConfigSource::Global(candidate);
        }
    }

    ConfigSource::Embedded
}

/// Returns the global config directory path.
///
/// Resolution: `$RULESTACK_CONFIG_DIR` > `~/.rulestack/`
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("RULESTACK_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".rulestack"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_takes_priority_over_project() {
        let tmp = TempDir::new().unwrap();
        let explicit = tmp.path().join("custom.toml");
        fs::write(&explicit, "").unwrap();

        let project = tmp.path().join("project");
        fs::create_dir(&project).unwrap();
        fs::write(project.join("rulestack.toml"), "").unwrap();

        let result = resolve_inner(&project, Some(&explicit), None);
        assert_eq!(result, ConfigSource::Explicit(explicit));
    }

    #[test]
    fn project_toml_preferred_over_dot_prefix_and_json() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("rulestack.toml"), "").unwrap();
        fs::write(tmp.path().join(".rulestack.toml"), "").unwrap();
        fs::write(tmp.path().join("rulestack.json"), "{}").unwrap();

        let result = resolve_inner(tmp.path(), None, None);
        assert_eq!(
            result,
            ConfigSource::Project(tmp.path().join("rulestack.toml"))
        );
    }

    #[test]
    fn project_json_found() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("rulestack.json"), "{}").unwrap();

        let result = resolve_inner(tmp.path(), None, None);
        assert_eq!(
            result,
            ConfigSource::Project(tmp.path().join("rulestack.json"))
        );
    }

    #[test]
    fn global_fallback_when_no_project_config() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let result = resolve_inner(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(
            result,
            ConfigSource::Global(global.path().join("config.toml"))
        );
        assert!(result.is_global());
    }

    #[test]
    fn no_config_anywhere_uses_embedded() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        let result = resolve_inner(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(result, ConfigSource::Embedded);
        assert!(result.path().is_none());
    }

    #[test]
    fn project_file_loads_with_base_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("rulestack.toml"),
            "[[overrides]]\nfiles = [\"src/**\"]\n",
        )
        .unwrap();

        let config = resolve_inner(tmp.path(), None, None).load().unwrap();
        assert_eq!(config.base_dir(), Some(tmp.path()));
        assert_eq!(
            config.matching_overrides(&tmp.path().join("src/a.js")),
            vec![0]
        );
    }

    #[test]
    fn explicit_unsupported_extension_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        fs::write(&path, "rules: {}").unwrap();

        let result = ConfigSource::Explicit(path).load();
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat { .. })));
    }

    #[test]
    fn explicit_missing_file_fails_with_io() {
        let result = ConfigSource::Explicit(PathBuf::from("/nonexistent/rulestack.toml")).load();
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
