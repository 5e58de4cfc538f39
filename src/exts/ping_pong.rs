//! `ping` command

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::bot::{Command, CommandHandler, Extension, ExtensionConfig, Invocation};

pub const NAME: &str = "bot.exts.ping_pong";

const DEFAULT_REPLY: &str = "pong";

struct PingPong {
    reply: String,
}

pub fn setup(config: &ExtensionConfig) -> Result<Box<dyn Extension>, String> {
    let reply = match config.get("reply") {
        None => DEFAULT_REPLY.to_string(),
        Some(Value::String(reply)) if !reply.trim().is_empty() => reply.clone(),
        Some(other) => return Err(format!("'reply' must be a non-empty string, got {other}")),
    };
    Ok(Box::new(PingPong { reply }))
}

impl Extension for PingPong {
    fn commands(&self) -> Vec<Command> {
        vec![Command::new("ping", "Check that the bot is responding", Reply(self.reply.clone()))]
    }
}

struct Reply(String);

#[async_trait]
impl CommandHandler for Reply {
    async fn call(&self, _invocation: Invocation<'_>) -> Result<Option<String>> {
        Ok(Some(self.0.clone()))
    }
}
