//! Extension registry
//!
//! Extensions are compiled in and registered under a dotted qualified name.
//! Loading an extension looks the name up, hands the descriptor's `config`
//! mapping to the factory, and collects the commands it contributes.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use super::command::Command;
use crate::domain::ExtensionDescriptor;
use crate::error::ExtensionError;

/// Keyword configuration given to an extension factory.
pub type ExtensionConfig = Map<String, Value>;

/// Builds an extension from its configuration, or explains why it cannot.
pub type ExtensionFactory = fn(&ExtensionConfig) -> Result<Box<dyn Extension>, String>;

pub trait Extension: Send + Sync {
    fn commands(&self) -> Vec<Command>;
}

#[derive(Default, Clone)]
pub struct ExtensionRegistry {
    factories: BTreeMap<String, ExtensionFactory>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, name: impl Into<String>, factory: ExtensionFactory) -> Self {
        self.factories.insert(name.into(), factory);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Build the extension a descriptor refers to.
    pub fn instantiate(
        &self,
        descriptor: &ExtensionDescriptor,
    ) -> Result<Box<dyn Extension>, ExtensionError> {
        let name = descriptor.qualified_name();
        let factory = self.factories.get(&name).ok_or_else(|| ExtensionError::NotFound(name.clone()))?;

        let empty = ExtensionConfig::new();
        let config = descriptor.config.as_ref().unwrap_or(&empty);
        factory(config).map_err(|reason| ExtensionError::Setup { name, reason })
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Empty;

    impl Extension for Empty {
        fn commands(&self) -> Vec<Command> {
            Vec::new()
        }
    }

    fn empty(_: &ExtensionConfig) -> Result<Box<dyn Extension>, String> {
        Ok(Box::new(Empty))
    }

    fn picky(config: &ExtensionConfig) -> Result<Box<dyn Extension>, String> {
        match config.get("level") {
            Some(Value::Number(_)) => Ok(Box::new(Empty)),
            _ => Err("'level' must be a number".to_string()),
        }
    }

    #[test]
    fn resolves_relative_descriptors() {
        let registry = ExtensionRegistry::new().register("bot.exts.empty", empty);
        let descriptor = ExtensionDescriptor::new(".exts.empty").with_package("bot");
        assert!(registry.instantiate(&descriptor).is_ok());
    }

    #[test]
    fn unknown_extension_is_not_found() {
        let registry = ExtensionRegistry::new();
        let err = registry.instantiate(&ExtensionDescriptor::new("bot.exts.nope")).err();
        assert!(matches!(err, Some(ExtensionError::NotFound(name)) if name == "bot.exts.nope"));
    }

    #[test]
    fn names_are_sorted() {
        let registry = ExtensionRegistry::new().register("b.second", empty).register("a.first", empty);
        assert_eq!(registry.names().collect::<Vec<_>>(), ["a.first", "b.second"]);
    }

    #[test]
    fn factory_sees_descriptor_config() {
        let registry = ExtensionRegistry::new().register("picky", picky);

        let bad = ExtensionDescriptor::new("picky");
        assert!(matches!(registry.instantiate(&bad).err(), Some(ExtensionError::Setup { .. })));

        let config = json!({"level": 3}).as_object().cloned().expect("object");
        let good = ExtensionDescriptor::new("picky").with_config(config);
        assert!(registry.instantiate(&good).is_ok());
    }
}
