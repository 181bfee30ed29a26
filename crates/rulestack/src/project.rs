//! The project configuration shipped with this crate.

use rulestack_core::{ConfigError, Configuration};

/// TOML source of the embedded project configuration.
pub const PROJECT_CONFIG: &str = include_str!("../config/project.toml");

/// Base config names the embedded configuration extends, in order.
///
/// Includes the bases its TypeScript override extends. A registry passed to
/// the resolver has to provide all of them.
pub const REQUIRED_BASES: &[&str] = &[
    "airbnb",
    "eslint:recommended",
    "react-app",
    "plugin:promise/recommended",
    "plugin:@typescript-eslint/recommended",
    "plugin:@typescript-eslint/recommended-requiring-type-checking",
    "plugin:import/typescript",
];

/// Parses the embedded project configuration.
///
/// # Errors
///
/// Returns an error only if the embedded document is invalid.
pub fn project_config() -> Result<Configuration, ConfigError> {
    Configuration::parse_toml(PROJECT_CONFIG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn embedded_config_parses() {
        let config = project_config().unwrap();
        assert_eq!(config.layer().parser(), Some("@babel/eslint-parser"));
        assert_eq!(config.layer().extends().len(), 4);
        assert_eq!(config.overrides().len(), 1);
    }

    #[test]
    fn required_bases_cover_every_extends() {
        let config = project_config().unwrap();
        let mentioned = config
            .layer()
            .extends()
            .iter()
            .chain(config.overrides().iter().flat_map(|o| o.layer().extends()));
        for name in mentioned {
            assert!(REQUIRED_BASES.contains(&name.as_str()), "missing {name}");
        }
    }

    #[test]
    fn typescript_override_targets_ts_and_tsx() {
        let config = project_config().unwrap();
        assert_eq!(config.matching_overrides(Path::new("src/App.tsx")), vec![0]);
        assert_eq!(config.matching_overrides(Path::new("src/api.ts")), vec![0]);
        assert!(config.matching_overrides(Path::new("src/index.js")).is_empty());
    }
}
