//! Launch command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::utils::{list_or_none, print_outcome};
use crate::bot::Bot;
use crate::config::loader::{
    DEFAULT_BOTCONFIG_PATH, DEFAULT_CONFIG_PATH, DEFAULT_LAUNCHCONFIG_PATH, DEFAULT_LOCALCONFIG_PATH,
};
use crate::config::{
    load_sources, merge_cli_with_config, resolve_authentication, CliOverrides, ExtensionFilter,
    Settings, SourcePaths,
};
use crate::domain::intents::parse_intents_arg;
use crate::domain::LogLevel;
use crate::{exts, logging};

#[derive(Args, Debug)]
pub struct LaunchArgs {
    /// Combined config file providing [botconfig] and/or [launchconfig]. Failure occurs
    /// silently for an invalid or missing file
    #[arg(long = "config", visible_alias = "config-path", value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Optional local file whose tables override the other sources key by key
    #[arg(long = "localconfig", visible_alias = "localconfig-path", value_name = "FILE", default_value = DEFAULT_LOCALCONFIG_PATH)]
    pub localconfig: PathBuf,

    /// Credentials, databases and intents, used when the combined file has no [botconfig]
    #[arg(long = "botconfig", visible_alias = "botconfig-path", value_name = "FILE", default_value = DEFAULT_BOTCONFIG_PATH)]
    pub botconfig: PathBuf,

    /// Prefix, logging and extension list, used when the combined file has no [launchconfig]
    #[arg(long = "launchconfig", visible_alias = "launchconfig-path", value_name = "FILE", default_value = DEFAULT_LAUNCHCONFIG_PATH)]
    pub launchconfig: PathBuf,

    /// Gateway intents bitmask as a base 2, 8, 10 or 16 integer literal (e.g. 0b101, 0x3ff).
    /// Defaults to the non-privileged intents; the message content intent (1 << 15) is not set
    #[arg(long, value_name = "BITS", value_parser = parse_intents_arg)]
    pub intents: Option<u64>,

    /// Command prefix to use; repeat for several. Defaults to '!'
    #[arg(long = "command-prefix", visible_alias = "prefix", value_name = "PREFIX")]
    pub command_prefix: Vec<String>,

    /// Accept a mention of the bot as a command prefix
    #[arg(long = "mention-as-command-prefix", visible_alias = "mention-as-prefix")]
    pub mention_as_command_prefix: bool,

    /// Qualified name of an extension to skip at startup (repeatable)
    #[arg(long = "ignore-extension", visible_alias = "ignore-ext", value_name = "NAME")]
    pub ignore_extension: Vec<String>,

    /// Skip every extension at startup
    #[arg(long = "ignore-all-extensions", visible_alias = "ignore-all-exts")]
    pub ignore_all_extensions: bool,

    /// Skip the built-in default extensions at startup
    #[arg(long = "ignore-default-extensions", visible_alias = "ignore-default-exts")]
    pub ignore_default_extensions: bool,

    /// Skip the extensions listed in launchconfig at startup
    #[arg(long = "ignore-extra-extensions", visible_alias = "ignore-extra-exts")]
    pub ignore_extra_extensions: bool,

    /// Log level for the bot's logging. Logging is disabled when neither this flag nor
    /// launchconfig sets one
    #[arg(long = "log-level", visible_alias = "bot-log-level", value_name = "LEVEL", value_enum, ignore_case = true)]
    pub log_level: Option<LogLevel>,

    /// Resolve configuration and load extensions, print the result, and exit without connecting
    #[arg(long)]
    pub dry_run: bool,
}

impl LaunchArgs {
    fn source_paths(&self) -> SourcePaths {
        SourcePaths {
            config: Some(self.config.clone()),
            localconfig: Some(self.localconfig.clone()),
            botconfig: Some(self.botconfig.clone()),
            launchconfig: Some(self.launchconfig.clone()),
        }
    }

    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            intents: self.intents,
            command_prefix: if self.command_prefix.is_empty() {
                None
            } else {
                Some(self.command_prefix.clone())
            },
            mention_as_command_prefix: if self.mention_as_command_prefix { Some(true) } else { None },
            log_level: self.log_level,
            extensions: ExtensionFilter {
                ignore_all: self.ignore_all_extensions,
                ignore_default: self.ignore_default_extensions,
                ignore_extra: self.ignore_extra_extensions,
                ignore: self.ignore_extension.clone(),
            },
        }
    }
}

pub fn run(args: LaunchArgs) -> Result<()> {
    let settings = resolve_settings(&args)?;
    logging::init(settings.log_level);
    let credentials = settings.credentials()?;

    let mut bot = Bot::from_settings(&settings, exts::builtin_registry());
    let loaded = bot.load_extensions(&settings.extensions);
    println!("Loaded {} of {} extension(s)", loaded, settings.extensions.len());

    if args.dry_run {
        println!("Resolved settings:");
        println!("{}", serde_json::to_string_pretty(&settings.summary())?);
        println!("Loaded extensions: {}", list_or_none(bot.loaded_extensions()));
        let commands: Vec<&str> = bot.commands().iter().map(|(_, cmd)| cmd.name.as_str()).collect();
        println!("Commands: {}", list_or_none(&commands));
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    println!("\nStarting bot...");
    let outcome = runtime.block_on(bot.start(&credentials));
    println!("Closing bot...");
    outcome
}

fn resolve_settings(args: &LaunchArgs) -> Result<Settings> {
    println!("Searching for configuration files...");
    let sources = load_sources(&args.source_paths());
    for outcome in &sources.report {
        print_outcome(outcome);
    }

    println!("Reading configuration data...");
    let (mut botconfig, launchconfig) = sources.into_typed()?;
    botconfig.authentication = resolve_authentication(&botconfig.authentication)?;

    let settings =
        merge_cli_with_config(botconfig, launchconfig, args.overrides(), exts::default_extensions())?;
    println!("  Finished reading configuration data");
    Ok(settings)
}
