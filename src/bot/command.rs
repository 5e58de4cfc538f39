//! Text commands contributed by extensions

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::BotData;
use crate::error::ExtensionError;

/// Everything a command sees when it runs.
pub struct Invocation<'a> {
    /// Text after the command name, trimmed.
    pub args: &'a str,
    pub author: &'a str,
    pub commands: &'a CommandTable,
    pub data: &'a BotData,
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Run the command. `Some` text is sent back to the invoking channel.
    async fn call(&self, invocation: Invocation<'_>) -> Result<Option<String>>;
}

#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
    handler: Arc<dyn CommandHandler>,
}

impl Command {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl CommandHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: description.into(),
            handler: Arc::new(handler),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub async fn call(&self, invocation: Invocation<'_>) -> Result<Option<String>> {
        self.handler.call(invocation).await
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Registered commands, looked up by name or alias.
#[derive(Debug, Default, Clone)]
pub struct CommandTable {
    commands: Vec<(String, Command)>,
    index: HashMap<String, usize>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every command of one extension, or none of them if any name
    /// (or alias) is already taken.
    pub fn insert_all(&mut self, extension: &str, commands: Vec<Command>) -> Result<(), ExtensionError> {
        let mut seen = std::collections::HashSet::new();
        for command in &commands {
            for name in command.names() {
                if self.index.contains_key(name) || !seen.insert(name) {
                    return Err(ExtensionError::CommandConflict {
                        extension: extension.to_string(),
                        command: name.to_string(),
                    });
                }
            }
        }

        for command in commands {
            let slot = self.commands.len();
            for name in command.names() {
                self.index.insert(name.to_string(), slot);
            }
            self.commands.push((extension.to_string(), command));
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.index.get(name).and_then(|&slot| self.commands.get(slot)).map(|(_, cmd)| cmd)
    }

    /// Commands in registration order, with the extension that owns them.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Command)> {
        self.commands.iter().map(|(ext, cmd)| (ext.as_str(), cmd))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
