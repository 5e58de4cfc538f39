//! Error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning resolved configuration into launch settings.
///
/// Resolution failures (missing or unparsable files) never produce one of
/// these; they are recorded in the load report instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: '{section}' in {origin} is malformed: {source}")]
    Malformed {
        section: &'static str,
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("config error: 'intents' must be a non-negative integer or an integer literal, got '{0}'")]
    InvalidIntents(String),

    #[error("config error: invalid log level '{0}' (expected one of NOTSET, DEBUG, INFO, WARNING, WARN, ERROR, FATAL, CRITICAL)")]
    InvalidLogLevel(String),

    #[error("config error: 'mention_as_command_prefix' must be enabled when 'command_prefix' is empty or null")]
    NoPrefix,

    #[error("config error: 'authentication' must provide '{0}' (set it in botconfig or via AUTH_{upper})", upper = .0.to_ascii_uppercase())]
    MissingCredential(&'static str),

    #[error("config error: invalid authentication settings: {0}")]
    Authentication(#[from] figment::Error),
}

/// Errors raised by the extension loader.
#[derive(Debug, Error)]
pub enum ExtensionError {
    #[error("extension '{0}' is not registered")]
    NotFound(String),

    #[error("extension '{0}' is already loaded")]
    AlreadyLoaded(String),

    #[error("extension '{name}' rejected its configuration: {reason}")]
    Setup { name: String, reason: String },

    #[error("extension '{extension}' defines command '{command}' which is already registered")]
    CommandConflict { extension: String, command: String },
}

/// Reason a configuration source was skipped.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid YAML in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unsupported config extension '.{ext}' for file {}", .path.display())]
    UnsupportedFormat { path: PathBuf, ext: String },

    #[error("{} does not define a '{section}' table", .path.display())]
    MissingSection { path: PathBuf, section: &'static str },
}
