//! `help` command listing what the loaded extensions provide

use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Write;

use crate::bot::{Command, CommandHandler, Extension, ExtensionConfig, Invocation};

pub const NAME: &str = "bot.exts.meta";

struct Meta;

pub fn setup(_config: &ExtensionConfig) -> Result<Box<dyn Extension>, String> {
    Ok(Box::new(Meta))
}

impl Extension for Meta {
    fn commands(&self) -> Vec<Command> {
        vec![Command::new("help", "List commands, or describe one: help <command>", Help).alias("commands")]
    }
}

struct Help;

#[async_trait]
impl CommandHandler for Help {
    async fn call(&self, invocation: Invocation<'_>) -> Result<Option<String>> {
        let wanted = invocation.args.split_whitespace().next();
        if let Some(name) = wanted {
            let reply = match invocation.commands.get(name) {
                Some(cmd) => describe(cmd),
                None => format!("No command named `{name}`."),
            };
            return Ok(Some(reply));
        }

        let mut out = String::from("Available commands:\n");
        for (extension, cmd) in invocation.commands.iter() {
            writeln!(out, "`{}` ({}): {}", cmd.name, extension, cmd.description)?;
        }
        Ok(Some(out.trim_end().to_string()))
    }
}

fn describe(cmd: &Command) -> String {
    let mut out = format!("`{}`: {}", cmd.name, cmd.description);
    if !cmd.aliases.is_empty() {
        out.push_str(&format!("\nAliases: {}", cmd.aliases.join(", ")));
    }
    out
}
