//! # rulestack
//!
//! Layered lint configuration for JavaScript/TypeScript projects.
//!
//! This is the main facade crate that re-exports the core model and
//! resolver, and ships the project's own rule set.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rulestack::{BaseConfigRegistry, Resolver};
//!
//! let config = rulestack::load(Path::new("."), None)?;
//! let bases = BaseConfigRegistry::from_file(Path::new("bases.toml"))?;
//!
//! let resolver = Resolver::new(&config, &bases);
//! for file in files {
//!     let effective = resolver.resolve_for_file(file)?;
//!     engine.lint(file, effective.rules());
//! }
//! ```
//!
//! Without a `rulestack.toml` in the project or `~/.rulestack/config.toml`,
//! [`load`] falls back to the embedded [`project_config`].

#![forbid(unsafe_code)]

// Re-export core types and functions
pub use rulestack_core::*;

mod discovery;
mod project;

pub use discovery::{global_config_dir, load, resolve_source, ConfigSource};
pub use project::{project_config, PROJECT_CONFIG, REQUIRED_BASES};
