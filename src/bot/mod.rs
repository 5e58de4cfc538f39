//! The bot: extension loading and the gateway client lifecycle

use anyhow::Result;
use serenity::all::{ApplicationId, Client, GatewayIntents};
use std::collections::BTreeMap;
use std::sync::Arc;

pub mod command;
pub mod extension;
pub mod handler;
pub mod prefix;

pub use command::{Command, CommandHandler, CommandTable, Invocation};
pub use extension::{Extension, ExtensionConfig, ExtensionFactory, ExtensionRegistry};
pub use handler::Handler;
pub use prefix::PrefixRule;

use crate::config::Settings;
use crate::domain::intents::to_gateway_intents;
use crate::domain::{Credentials, DatabaseDescriptor, ExtensionDescriptor};
use crate::error::ExtensionError;

/// Read-only data shared with every command.
#[derive(Debug, Clone, Default)]
pub struct BotData {
    pub client_id: Option<u64>,
    pub databases: BTreeMap<String, DatabaseDescriptor>,
}

pub struct Bot {
    prefix: PrefixRule,
    intents: GatewayIntents,
    registry: ExtensionRegistry,
    loaded: Vec<String>,
    commands: CommandTable,
    data: BotData,
}

impl Bot {
    pub fn new(prefix: PrefixRule, intents: u64, registry: ExtensionRegistry, data: BotData) -> Self {
        Self {
            prefix,
            intents: to_gateway_intents(intents),
            registry,
            loaded: Vec::new(),
            commands: CommandTable::new(),
            data,
        }
    }

    pub fn from_settings(settings: &Settings, registry: ExtensionRegistry) -> Self {
        let data = BotData {
            client_id: settings.authentication.client_id,
            databases: settings.databases.clone(),
        };
        Self::new(settings.prefix.clone(), settings.intents, registry, data)
    }

    pub fn intents(&self) -> GatewayIntents {
        self.intents
    }

    pub fn prefix(&self) -> &PrefixRule {
        &self.prefix
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    /// Qualified names of loaded extensions, in load order.
    pub fn loaded_extensions(&self) -> &[String] {
        &self.loaded
    }

    pub fn load_extension(&mut self, descriptor: &ExtensionDescriptor) -> Result<(), ExtensionError> {
        let name = descriptor.qualified_name();
        if self.loaded.contains(&name) {
            return Err(ExtensionError::AlreadyLoaded(name));
        }
        let extension = self.registry.instantiate(descriptor)?;
        self.commands.insert_all(&name, extension.commands())?;
        self.loaded.push(name);
        Ok(())
    }

    /// Load each descriptor in turn. Failures are logged and skipped; the
    /// return value is the number of extensions that loaded.
    pub fn load_extensions(&mut self, descriptors: &[ExtensionDescriptor]) -> usize {
        let mut count = 0;
        for descriptor in descriptors {
            match self.load_extension(descriptor) {
                Ok(()) => {
                    tracing::info!("Successfully loaded extension '{}' at launch", descriptor.qualified_name());
                    count += 1;
                }
                Err(ExtensionError::AlreadyLoaded(name)) => {
                    tracing::warn!("Extension '{}' listed more than once, skipping", name);
                }
                Err(e @ ExtensionError::NotFound(_)) => {
                    let known: Vec<&str> = self.registry.names().collect();
                    tracing::error!(
                        "Failed to load extension at launch: {} (registered: {})",
                        e,
                        known.join(", ")
                    );
                }
                Err(e) => {
                    tracing::error!("Failed to load extension at launch: {}", e);
                }
            }
        }
        count
    }

    /// Connect to the gateway and block until the client stops or Ctrl-C is
    /// received.
    pub async fn start(self, credentials: &Credentials) -> Result<()> {
        let handler = Handler::new(self.prefix, Arc::new(self.commands), Arc::new(self.data));

        let mut client = Client::builder(&credentials.token, self.intents)
            .application_id(ApplicationId::new(credentials.client_id))
            .event_handler(handler)
            .await?;

        let shard_manager = client.shard_manager.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupt received, closing shards");
                shard_manager.shutdown_all().await;
            }
        });

        client.start().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exts;

    fn bot() -> Bot {
        Bot::new(
            PrefixRule::new(vec!["!".into()], false).expect("rule"),
            GatewayIntents::GUILDS.bits(),
            exts::builtin_registry(),
            BotData::default(),
        )
    }

    #[test]
    fn loads_builtin_extensions_in_order() {
        let mut bot = bot();
        let loaded = bot.load_extensions(&[
            ExtensionDescriptor::new(exts::meta::NAME),
            ExtensionDescriptor::new(exts::ping_pong::NAME),
        ]);
        assert_eq!(loaded, 2);
        assert_eq!(bot.loaded_extensions(), [exts::meta::NAME, exts::ping_pong::NAME]);
        assert!(bot.commands().get("ping").is_some());
        assert!(bot.commands().get("help").is_some());
    }

    #[test]
    fn failures_do_not_stop_later_extensions() {
        let mut bot = bot();
        let loaded = bot.load_extensions(&[
            ExtensionDescriptor::new("bot.exts.missing"),
            ExtensionDescriptor::new(exts::ping_pong::NAME),
            ExtensionDescriptor::new(exts::ping_pong::NAME),
        ]);
        assert_eq!(loaded, 1);
        assert_eq!(bot.loaded_extensions(), [exts::ping_pong::NAME]);
    }

    #[test]
    fn duplicate_load_is_reported() {
        let mut bot = bot();
        let descriptor = ExtensionDescriptor::new(exts::ping_pong::NAME);
        bot.load_extension(&descriptor).expect("first load");
        assert!(matches!(bot.load_extension(&descriptor), Err(ExtensionError::AlreadyLoaded(_))));
    }

    #[test]
    fn from_settings_carries_data() {
        let settings = Settings {
            intents: GatewayIntents::GUILDS.bits(),
            prefix: PrefixRule::new(vec![], true).expect("rule"),
            log_level: None,
            extensions: Vec::new(),
            authentication: crate::domain::Authentication { client_id: Some(9), token: None },
            databases: BTreeMap::new(),
        };
        let bot = Bot::from_settings(&settings, ExtensionRegistry::new());
        assert_eq!(bot.intents(), GatewayIntents::GUILDS);
        assert!(bot.prefix().mention());
        assert_eq!(bot.data.client_id, Some(9));
    }
}
