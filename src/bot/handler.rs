//! Gateway event handler: prefix matching and command dispatch

use async_trait::async_trait;
use serenity::all::{Context, EventHandler, Message, Ready};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::command::{CommandTable, Invocation};
use super::prefix::{split_invocation, PrefixRule};
use super::BotData;

/// Discord rejects messages longer than this many characters.
const MAX_MESSAGE_CHARS: usize = 2000;

pub struct Handler {
    prefix: PrefixRule,
    commands: Arc<CommandTable>,
    data: Arc<BotData>,
    /// Zero until known.
    bot_id: AtomicU64,
}

impl Handler {
    pub fn new(prefix: PrefixRule, commands: Arc<CommandTable>, data: Arc<BotData>) -> Self {
        // The application id of a bot equals its user id; ready overwrites it.
        let bot_id = AtomicU64::new(data.client_id.unwrap_or(0));
        Self { prefix, commands, data, bot_id }
    }

    /// Resolve a message into a reply, if it invokes a known command.
    pub async fn dispatch(&self, content: &str, author: &str) -> Option<String> {
        let bot_id = Some(self.bot_id.load(Ordering::Relaxed)).filter(|id| *id != 0);
        let body = self.prefix.strip(content, bot_id)?;
        let (name, args) = split_invocation(body)?;
        let Some(command) = self.commands.get(name) else {
            tracing::debug!("Ignoring unknown command '{}'", name);
            return None;
        };

        let invocation = Invocation { args, author, commands: &self.commands, data: &self.data };
        match command.call(invocation).await {
            Ok(reply) => reply.map(truncate_reply),
            Err(e) => {
                tracing::error!("Command '{}' failed: {:#}", command.name, e);
                None
            }
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        let id = ready.user.id.get();
        let configured = self.bot_id.swap(id, Ordering::Relaxed);
        if configured != 0 && configured != id {
            tracing::warn!("Configured client_id {} does not match the logged in user id {}", configured, id);
        }
        tracing::info!("Logged in as {} ({})", ready.user.name, id);
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(reply) = self.dispatch(&msg.content, &msg.author.name).await else {
            return;
        };
        if let Err(e) = msg.channel_id.say(&ctx.http, reply).await {
            tracing::error!("Failed to send reply in channel {}: {}", msg.channel_id, e);
        }
    }
}

fn truncate_reply(reply: String) -> String {
    match reply.char_indices().nth(MAX_MESSAGE_CHARS) {
        Some((cut, _)) => reply[..cut].to_string(),
        None => reply,
    }
}
