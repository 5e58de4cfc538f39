//! Applying command-line overrides on top of file configuration

use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::bot::PrefixRule;
use crate::domain::{
    Authentication, BotConfig, Credentials, DatabaseDescriptor, ExtensionDescriptor, LaunchConfig,
    LogLevel,
};
use crate::error::ConfigError;

/// Values explicitly supplied on the command line. `None` / `false` mean
/// "not given" and leave the file value alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub intents: Option<u64>,
    pub command_prefix: Option<Vec<String>>,
    pub mention_as_command_prefix: Option<bool>,
    pub log_level: Option<LogLevel>,
    pub extensions: ExtensionFilter,
}

/// Which extensions to leave out at launch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    pub ignore_all: bool,
    pub ignore_default: bool,
    pub ignore_extra: bool,
    /// Qualified names to drop.
    pub ignore: Vec<String>,
}

impl ExtensionFilter {
    /// Defaults followed by extras, minus whatever the flags exclude. The
    /// surviving descriptors keep their order and configuration.
    pub fn apply(
        &self,
        defaults: Vec<ExtensionDescriptor>,
        extras: Vec<ExtensionDescriptor>,
    ) -> Vec<ExtensionDescriptor> {
        if self.ignore_all {
            return Vec::new();
        }

        let mut selected = Vec::new();
        if !self.ignore_default {
            selected.extend(defaults);
        }
        if !self.ignore_extra {
            selected.extend(extras);
        }

        if !self.ignore.is_empty() {
            selected.retain(|ext| !self.ignore.contains(&ext.qualified_name()));
        }
        selected
    }
}

/// Fully resolved launch settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub intents: u64,
    pub prefix: PrefixRule,
    pub log_level: Option<LogLevel>,
    pub extensions: Vec<ExtensionDescriptor>,
    pub authentication: Authentication,
    pub databases: BTreeMap<String, DatabaseDescriptor>,
}

impl Settings {
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        Credentials::try_from(&self.authentication)
    }

    /// Printable view with the token masked.
    pub fn summary(&self) -> Value {
        let token = self.authentication.token.as_ref().map(|_| "<redacted>");
        json!({
            "authentication": {
                "client_id": self.authentication.client_id,
                "token": token,
            },
            "intents": self.intents,
            "command_prefix": self.prefix.prefixes(),
            "mention_as_command_prefix": self.prefix.mention(),
            "log_level": self.log_level.map(LogLevel::as_str),
            "databases": self.databases.keys().collect::<Vec<_>>(),
            "extensions": self.extensions,
        })
    }
}

/// Merge CLI values into the file configuration.
///
/// Precedence: CLI flag (when given) > file value > built-in default.
pub fn merge_cli_with_config(
    botconfig: BotConfig,
    launchconfig: LaunchConfig,
    cli: CliOverrides,
    default_extensions: Vec<ExtensionDescriptor>,
) -> Result<Settings, ConfigError> {
    let intents = match cli.intents {
        Some(bits) => bits,
        None => botconfig.intents_bits()?,
    };

    let prefixes = match cli.command_prefix.filter(|p| !p.is_empty()) {
        Some(prefixes) => prefixes,
        None => launchconfig.command_prefix.map(|p| p.to_vec()).unwrap_or_default(),
    };
    let mention = cli.mention_as_command_prefix.unwrap_or(launchconfig.mention_as_command_prefix);
    let prefix = PrefixRule::new(prefixes, mention)?;

    let log_level = cli.log_level.or(launchconfig.log_level);

    let extensions = cli.extensions.apply(default_extensions, launchconfig.extensions);

    Ok(Settings {
        intents,
        prefix,
        log_level,
        extensions,
        authentication: botconfig.authentication,
        databases: botconfig.databases,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CommandPrefix, IntentsValue};
    use serde_json::Map;

    fn descriptors(names: &[&str]) -> Vec<ExtensionDescriptor> {
        names.iter().map(|n| ExtensionDescriptor::new(*n)).collect()
    }

    fn names(exts: &[ExtensionDescriptor]) -> Vec<String> {
        exts.iter().map(ExtensionDescriptor::qualified_name).collect()
    }

    fn launch_with(extensions: Vec<ExtensionDescriptor>) -> LaunchConfig {
        LaunchConfig { extensions, ..LaunchConfig::default() }
    }

    #[test]
    fn cli_intents_override_file() {
        let bot = BotConfig { intents: Some(IntentsValue::Bits(0xFF)), ..BotConfig::default() };
        let cli = CliOverrides {
            intents: Some(crate::domain::parse_int_literal("0b101").expect("literal")),
            ..CliOverrides::default()
        };
        let settings =
            merge_cli_with_config(bot, LaunchConfig::default(), cli, Vec::new()).expect("merge");
        assert_eq!(settings.intents, 5);
    }

    #[test]
    fn file_intents_used_without_flag() {
        let bot = BotConfig { intents: Some(IntentsValue::Literal("0x3".into())), ..BotConfig::default() };
        let settings =
            merge_cli_with_config(bot, LaunchConfig::default(), CliOverrides::default(), Vec::new())
                .expect("merge");
        assert_eq!(settings.intents, 3);
    }

    #[test]
    fn ignore_all_wins_over_everything() {
        let filters = [
            ExtensionFilter { ignore_all: true, ..Default::default() },
            ExtensionFilter { ignore_all: true, ignore_default: true, ..Default::default() },
            ExtensionFilter { ignore_all: true, ignore_extra: true, ..Default::default() },
            ExtensionFilter { ignore_all: true, ignore: vec!["a".into()], ..Default::default() },
        ];
        for filter in filters {
            assert!(filter.apply(descriptors(&["a", "b"]), descriptors(&["c"])).is_empty());
        }
    }

    #[test]
    fn default_and_extra_subsets() {
        let defaults = descriptors(&["d1", "d2"]);
        let extras = descriptors(&["e1"]);

        let all = ExtensionFilter::default().apply(defaults.clone(), extras.clone());
        assert_eq!(names(&all), ["d1", "d2", "e1"]);

        let no_defaults = ExtensionFilter { ignore_default: true, ..Default::default() };
        assert_eq!(names(&no_defaults.apply(defaults.clone(), extras.clone())), ["e1"]);

        let no_extras = ExtensionFilter { ignore_extra: true, ..Default::default() };
        assert_eq!(names(&no_extras.apply(defaults, extras)), ["d1", "d2"]);
    }

    #[test]
    fn ignore_extension_removes_exactly_one() {
        let filter = ExtensionFilter { ignore: vec!["foo.bar".into()], ..Default::default() };
        for extras in [
            descriptors(&["foo.bar", "foo.baz", "foo"]),
            descriptors(&["foo", "foo.baz", "foo.bar"]),
            descriptors(&["foo.baz", "foo.bar", "foo"]),
        ] {
            let mut expected = names(&extras);
            expected.retain(|n| n != "foo.bar");
            assert_eq!(names(&filter.apply(Vec::new(), extras)), expected);
        }
    }

    #[test]
    fn ignore_matches_qualified_name_of_relative_descriptor() {
        let extras = vec![ExtensionDescriptor::new(".exts.x").with_package("bot")];
        let filter = ExtensionFilter { ignore: vec!["bot.exts.x".into()], ..Default::default() };
        assert!(filter.apply(Vec::new(), extras).is_empty());
    }

    #[test]
    fn extension_config_survives_filtering() {
        let mut config = Map::new();
        config.insert("a".into(), json!(1));
        let kept = ExtensionDescriptor::new("bot.exts.x").with_package("bot").with_config(config.clone());
        let extras = vec![ExtensionDescriptor::new("bot.exts.other"), kept.clone()];

        let cli = CliOverrides {
            extensions: ExtensionFilter { ignore: vec!["bot.exts.other".into()], ..Default::default() },
            ..CliOverrides::default()
        };
        let settings =
            merge_cli_with_config(BotConfig::default(), launch_with(extras), cli, Vec::new())
                .expect("merge");
        assert_eq!(settings.extensions, vec![kept]);
        assert_eq!(settings.extensions[0].config.as_ref(), Some(&config));
    }

    #[test]
    fn log_level_absent_means_disabled() {
        let settings = merge_cli_with_config(
            BotConfig::default(),
            LaunchConfig::default(),
            CliOverrides::default(),
            Vec::new(),
        )
        .expect("merge");
        assert!(settings.log_level.is_none());

        let cli = CliOverrides { log_level: Some(LogLevel::Debug), ..CliOverrides::default() };
        let settings =
            merge_cli_with_config(BotConfig::default(), LaunchConfig::default(), cli, Vec::new())
                .expect("merge");
        assert_eq!(settings.log_level, Some(LogLevel::Debug));
    }

    #[test]
    fn cli_log_level_beats_file() {
        let launch = LaunchConfig { log_level: Some(LogLevel::Error), ..LaunchConfig::default() };
        let cli = CliOverrides { log_level: Some(LogLevel::Info), ..CliOverrides::default() };
        let settings = merge_cli_with_config(BotConfig::default(), launch, cli, Vec::new()).expect("merge");
        assert_eq!(settings.log_level, Some(LogLevel::Info));
    }

    #[test]
    fn prefix_and_mention_overrides() {
        let launch = LaunchConfig {
            command_prefix: Some(CommandPrefix::One("!".into())),
            ..LaunchConfig::default()
        };
        let cli = CliOverrides {
            command_prefix: Some(vec!["?".into(), "$".into()]),
            mention_as_command_prefix: Some(true),
            ..CliOverrides::default()
        };
        let settings = merge_cli_with_config(BotConfig::default(), launch, cli, Vec::new()).expect("merge");
        assert_eq!(settings.prefix.prefixes(), ["?", "$"]);
        assert!(settings.prefix.mention());
    }

    #[test]
    fn null_prefix_requires_mention() {
        let launch = LaunchConfig { command_prefix: None, ..LaunchConfig::default() };
        let err = merge_cli_with_config(
            BotConfig::default(),
            launch.clone(),
            CliOverrides::default(),
            Vec::new(),
        )
        .expect_err("no prefix");
        assert!(matches!(err, ConfigError::NoPrefix));

        let cli = CliOverrides { mention_as_command_prefix: Some(true), ..CliOverrides::default() };
        let settings = merge_cli_with_config(BotConfig::default(), launch, cli, Vec::new()).expect("merge");
        assert!(settings.prefix.prefixes().is_empty());
    }

    #[test]
    fn summary_masks_token() {
        let bot = BotConfig {
            authentication: Authentication { client_id: Some(1), token: Some("very-secret".into()) },
            ..BotConfig::default()
        };
        let settings =
            merge_cli_with_config(bot, LaunchConfig::default(), CliOverrides::default(), Vec::new())
                .expect("merge");
        let summary = settings.summary().to_string();
        assert!(!summary.contains("very-secret"));
        assert!(summary.contains("<redacted>"));
    }
}
