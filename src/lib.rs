//! template-bot: a configurable Discord bot scaffold
//!
//! Loads `botconfig` / `launchconfig` from TOML or YAML files, applies
//! command-line overrides, loads the configured extensions and runs a
//! serenity gateway client.

pub mod bot;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod exts;
pub mod logging;
