//! Error types for loading and resolving configurations.

use miette::Diagnostic;
use std::path::PathBuf;

/// Field-level validation errors raised while building the model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Rule name is empty.
    #[error("rule name must not be empty")]
    EmptyRuleName,

    /// Rule name contains whitespace or a dangling namespace separator.
    #[error("invalid rule name `{name}`")]
    InvalidRuleName {
        /// The invalid name.
        name: String,
    },

    /// Severity is neither a known keyword nor 0, 1 or 2.
    #[error("unknown severity `{value}`, expected: off, warn, error, 0, 1, 2")]
    UnknownSeverity {
        /// The offending value, rendered as written.
        value: String,
    },

    /// Rule value is not a severity or a `[severity, ...options]` sequence.
    #[error("malformed rule value: {reason}")]
    MalformedRuleValue {
        /// What is wrong with the shape.
        reason: String,
    },

    /// Glob pattern is empty.
    #[error("glob pattern must not be empty")]
    EmptyGlobPattern,

    /// Glob pattern has invalid syntax.
    #[error("invalid glob pattern `{pattern}`: {reason}")]
    InvalidGlobPattern {
        /// The invalid pattern.
        pattern: String,
        /// Why it's invalid.
        reason: String,
    },

    /// An override block has no `files` patterns.
    #[error("override must list at least one `files` pattern")]
    MissingFiles,

    /// A document key that no field recognizes.
    #[error("unknown field `{name}`")]
    UnknownField {
        /// The unrecognized key.
        name: String,
    },

    /// A base config name is empty.
    #[error("base config name must not be empty")]
    EmptyBaseName,
}

/// Errors from loading a configuration document or resolving it for a file.
///
/// Every failure is reported to the caller as-is; resolution never returns
/// a partial result.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ConfigError {
    /// IO error reading a config file.
    #[error("Failed to read config file {path}: {source}")]
    #[diagnostic(code(rulestack::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    #[diagnostic(code(rulestack::parse::toml))]
    Toml(#[from] toml::de::Error),

    /// JSON deserialization failed.
    #[error("JSON parse error: {0}")]
    #[diagnostic(code(rulestack::parse::json))]
    Json(#[from] serde_json::Error),

    /// The file extension does not name a supported document format.
    #[error("unsupported config format: {}", path.display())]
    #[diagnostic(
        code(rulestack::format),
        help("use a `.toml` or `.json` configuration file")
    )]
    UnsupportedFormat {
        /// The offending path.
        path: PathBuf,
    },

    /// A field failed validation.
    #[error("{context}: {source}")]
    #[diagnostic(code(rulestack::invalid))]
    Invalid {
        /// Where the error occurred (e.g., "overrides[0].files[1]").
        context: String,
        /// The underlying model error.
        source: ModelError,
    },

    /// An `extends` entry names a base config nobody provides.
    #[error("{context}: unknown base config `{name}`")]
    #[diagnostic(
        code(rulestack::unknown_base),
        help("register the base config before resolving")
    )]
    UnknownBase {
        /// Where the reference was found.
        context: String,
        /// The unresolvable name.
        name: String,
    },

    /// Base configs extend each other in a loop.
    #[error("circular extends: {}", chain.join(" -> "))]
    #[diagnostic(code(rulestack::circular_extends))]
    CircularExtends {
        /// The chain of base names, ending with the repeated one.
        chain: Vec<String>,
    },
}

impl ConfigError {
    pub(crate) fn invalid(context: impl Into<String>, source: ModelError) -> Self {
        Self::Invalid {
            context: context.into(),
            source,
        }
    }
}
