//! Configuration loading and merging
//!
//! Handles loading from config files, the `AUTH_*` environment, and CLI
//! arguments with proper precedence (CLI > File > Env > Defaults).

pub mod auth;
pub mod loader;
pub mod merge;

pub use auth::resolve_authentication;
pub use loader::{load_sources, RawSources, SourceKind, SourceOutcome, SourcePaths, SourceStatus};
pub use merge::{merge_cli_with_config, CliOverrides, ExtensionFilter, Settings};
