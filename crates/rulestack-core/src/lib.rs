//! # rulestack-core
//!
//! Layered lint configuration: named base configs, a root document, and
//! file-scoped override blocks, resolved into one effective rule set per
//! file.
//!
//! This crate provides:
//!
//! - [`Configuration`] and [`OverrideBlock`], the validated document model
//! - [`BaseConfigSource`] and [`BaseConfigRegistry`] for named base configs
//! - [`Resolver`] / [`resolve_for_file`] for per-file resolution
//! - [`RuleValue`], the `off | warn(options) | error(options)` rule setting
//!
//! ## Example
//!
//! ```ignore
//! use rulestack_core::{BaseConfigRegistry, Configuration, resolve_for_file};
//!
//! let config = Configuration::parse_toml(include_str!("rulestack.toml"))?;
//! let bases = BaseConfigRegistry::from_file("bases.toml".as_ref())?;
//!
//! let effective = resolve_for_file(&config, &bases, "src/App.tsx")?;
//! println!("{}", effective.rules());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config_dto;
mod error;
pub mod loader;
mod model;
mod pattern;
mod registry;
mod resolver;
mod types;

pub use error::{ConfigError, ModelError};
pub use model::{BaseConfig, ConfigLayer, Configuration, OverrideBlock};
pub use pattern::{normalize_path, GlobPattern};
pub use registry::{BaseConfigRegistry, BaseConfigSource};
pub use resolver::{resolve_for_file, EffectiveConfig, Resolver};
pub use types::{RuleName, RuleSet, RuleValue, Severity};
