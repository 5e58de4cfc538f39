//! Built-in extensions

use crate::bot::ExtensionRegistry;
use crate::domain::ExtensionDescriptor;

pub mod meta;
pub mod ping_pong;

/// Every extension compiled into this binary.
pub fn builtin_registry() -> ExtensionRegistry {
    ExtensionRegistry::new()
        .register(meta::NAME, meta::setup)
        .register(ping_pong::NAME, ping_pong::setup)
}

/// Extensions loaded on every launch unless `--ignore-default-extensions`
/// or `--ignore-extension` exclude them.
pub fn default_extensions() -> Vec<ExtensionDescriptor> {
    vec![ExtensionDescriptor::new(meta::NAME)]
}
