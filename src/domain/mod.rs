//! Typed configuration model

pub mod botconfig;
pub mod intents;
pub mod launchconfig;

pub use botconfig::{Authentication, BotConfig, Credentials, DatabaseDescriptor};
pub use intents::{default_intents, parse_int_literal, IntentsValue};
pub use launchconfig::{CommandPrefix, ExtensionDescriptor, LaunchConfig, LogLevel};
