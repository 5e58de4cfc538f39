//! `launchconfig`: prefix, logging and extension list

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

use crate::error::ConfigError;
use crate::exts;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// `None` only when explicitly nulled; an absent key means `"!"`.
    #[serde(default = "default_command_prefix")]
    pub command_prefix: Option<CommandPrefix>,

    #[serde(default)]
    pub mention_as_command_prefix: bool,

    /// Absent disables logging entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,

    #[serde(default = "default_extra_extensions")]
    pub extensions: Vec<ExtensionDescriptor>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            command_prefix: default_command_prefix(),
            mention_as_command_prefix: false,
            log_level: None,
            extensions: default_extra_extensions(),
        }
    }
}

fn default_command_prefix() -> Option<CommandPrefix> {
    Some(CommandPrefix::One("!".to_string()))
}

fn default_extra_extensions() -> Vec<ExtensionDescriptor> {
    vec![ExtensionDescriptor::new(exts::ping_pong::NAME)]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandPrefix {
    One(String),
    Many(Vec<String>),
}

impl CommandPrefix {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            CommandPrefix::One(prefix) => vec![prefix.clone()],
            CommandPrefix::Many(prefixes) => prefixes.clone(),
        }
    }
}

/// Log level names accepted in config files and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LogLevel {
    #[value(name = "NOTSET")]
    NotSet,
    #[value(name = "DEBUG")]
    Debug,
    #[value(name = "INFO")]
    Info,
    #[value(name = "WARNING")]
    Warning,
    #[value(name = "WARN")]
    Warn,
    #[value(name = "ERROR")]
    Error,
    #[value(name = "FATAL")]
    Fatal,
    #[value(name = "CRITICAL")]
    Critical,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::NotSet => "NOTSET",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
            LogLevel::Critical => "CRITICAL",
        }
    }

    /// NOTSET lets everything through; FATAL and CRITICAL collapse onto ERROR.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            LogLevel::NotSet => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warning | LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error | LogLevel::Fatal | LogLevel::Critical => LevelFilter::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <LogLevel as ValueEnum>::from_str(s.trim(), true)
            .map_err(|_| ConfigError::InvalidLogLevel(s.to_string()))
    }
}

impl TryFrom<String> for LogLevel {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, ConfigError> {
        value.parse()
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.as_str().to_string()
    }
}

/// One entry of the `extensions` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionDescriptor {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Keyword configuration passed through untouched to the extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
}

impl ExtensionDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), package: None, config: None }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn with_config(mut self, config: Map<String, Value>) -> Self {
        self.config = Some(config);
        self
    }

    /// Absolute dotted name of the extension.
    ///
    /// A name with leading dots is relative to `package`: one dot means the
    /// package itself, each further dot climbs one level. Relative names
    /// without a package are returned unchanged.
    pub fn qualified_name(&self) -> String {
        let rest = self.name.trim_start_matches('.');
        let dots = self.name.len() - rest.len();
        let Some(package) = self.package.as_deref().filter(|_| dots > 0) else {
            return self.name.clone();
        };

        let mut parts: Vec<&str> = package.split('.').filter(|p| !p.is_empty()).collect();
        for _ in 1..dots {
            parts.pop();
        }
        if !rest.is_empty() {
            parts.push(rest);
        }
        parts.join(".")
    }
}
