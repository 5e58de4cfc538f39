//! Command prefix matching

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::ConfigError;

static MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<@!?(\d+)>\s*").expect("valid regex"));

/// Which message starts count as a command invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrefixRule {
    prefixes: Vec<String>,
    mention: bool,
}

impl PrefixRule {
    /// At least one literal prefix or the mention prefix is required.
    pub fn new(prefixes: Vec<String>, mention: bool) -> Result<Self, ConfigError> {
        if prefixes.is_empty() && !mention {
            return Err(ConfigError::NoPrefix);
        }
        Ok(Self { prefixes, mention })
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn mention(&self) -> bool {
        self.mention
    }

    /// Return the message body after the matched prefix.
    ///
    /// A mention of `bot_id` is tried first, then literal prefixes in
    /// declared order. Without a known bot id the mention form never matches.
    pub fn strip<'a>(&self, content: &'a str, bot_id: Option<u64>) -> Option<&'a str> {
        if self.mention {
            if let Some(rest) = bot_id.and_then(|id| strip_mention(content, id)) {
                return Some(rest);
            }
        }
        self.prefixes.iter().find_map(|prefix| content.strip_prefix(prefix.as_str()))
    }
}

fn strip_mention(content: &str, bot_id: u64) -> Option<&str> {
    let caps = MENTION.captures(content)?;
    let mentioned: u64 = caps.get(1)?.as_str().parse().ok()?;
    if mentioned != bot_id {
        return None;
    }
    let whole = caps.get(0)?;
    Some(&content[whole.end()..])
}

/// Split an invocation body into command name and the remaining arguments.
pub fn split_invocation(body: &str) -> Option<(&str, &str)> {
    let body = body.trim_start();
    if body.is_empty() {
        return None;
    }
    match body.split_once(char::is_whitespace) {
        Some((name, args)) => Some((name, args.trim())),
        None => Some((body, "")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT: u64 = 1234;

    #[test]
    fn requires_prefix_or_mention() {
        assert!(matches!(PrefixRule::new(vec![], false), Err(ConfigError::NoPrefix)));
        assert!(PrefixRule::new(vec![], true).is_ok());
    }

    #[test]
    fn literal_prefixes_in_declared_order() {
        let rule = PrefixRule::new(vec!["!".into(), "!!".into()], false).expect("rule");
        assert_eq!(rule.strip("!!ping", Some(BOT)), Some("!ping"));
        assert_eq!(rule.strip("?ping", Some(BOT)), None);
    }

    #[test]
    fn mention_prefix_matches_only_this_bot() {
        let rule = PrefixRule::new(vec!["!".into()], true).expect("rule");
        assert_eq!(rule.strip("<@1234> ping", Some(BOT)), Some("ping"));
        assert_eq!(rule.strip("<@!1234>ping", Some(BOT)), Some("ping"));
        assert_eq!(rule.strip("<@999> ping", Some(BOT)), None);
        assert_eq!(rule.strip("<@1234> ping", None), None);
        assert_eq!(rule.strip("!ping", Some(BOT)), Some("ping"));
    }

    #[test]
    fn mention_is_ignored_when_disabled() {
        let rule = PrefixRule::new(vec!["!".into()], false).expect("rule");
        assert_eq!(rule.strip("<@1234> ping", Some(BOT)), None);
    }

    #[test]
    fn splits_name_and_arguments() {
        assert_eq!(split_invocation("ping"), Some(("ping", "")));
        assert_eq!(split_invocation(" echo  hello world "), Some(("echo", "hello world")));
        assert_eq!(split_invocation("   "), None);
    }
}
