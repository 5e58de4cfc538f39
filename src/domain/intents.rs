//! Gateway intents bitmask handling

use serde::{Deserialize, Serialize};
use serenity::all::GatewayIntents;

use crate::error::ConfigError;

/// Intents used when neither the botconfig nor the CLI supply a value.
///
/// Matches the library default: everything except the privileged
/// message-content, guild-members and guild-presences bits.
pub fn default_intents() -> u64 {
    GatewayIntents::non_privileged().bits()
}

/// Parse an integer literal in base 2, 8, 10 or 16.
///
/// The base is taken from a `0b`, `0o` or `0x` prefix (case-insensitive);
/// anything else is read as decimal. Surrounding whitespace is ignored.
pub fn parse_int_literal(literal: &str) -> Result<u64, ConfigError> {
    let trimmed = literal.trim();
    let lower = trimmed.to_ascii_lowercase();
    let (digits, radix) = if let Some(rest) = lower.strip_prefix("0b") {
        (rest, 2)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (rest, 8)
    } else if let Some(rest) = lower.strip_prefix("0x") {
        (rest, 16)
    } else {
        (lower.as_str(), 10)
    };

    // from_str_radix accepts a leading '+', a literal with a sign is not an intents value.
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(ConfigError::InvalidIntents(trimmed.to_string()));
    }

    u64::from_str_radix(digits, radix).map_err(|_| ConfigError::InvalidIntents(trimmed.to_string()))
}

/// `--intents` value parser.
pub fn parse_intents_arg(value: &str) -> Result<u64, String> {
    parse_int_literal(value).map_err(|e| e.to_string())
}

/// Intents as written in a config file: a plain integer or a literal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntentsValue {
    Bits(u64),
    Literal(String),
}

impl IntentsValue {
    pub fn bits(&self) -> Result<u64, ConfigError> {
        match self {
            IntentsValue::Bits(bits) => Ok(*bits),
            IntentsValue::Literal(literal) => parse_int_literal(literal),
        }
    }
}

/// Convert a raw bitmask into gateway intents, dropping bits the library
/// does not know about.
pub fn to_gateway_intents(bits: u64) -> GatewayIntents {
    let intents = GatewayIntents::from_bits_truncate(bits);
    if intents.bits() != bits {
        tracing::warn!(
            "Dropping unknown gateway intent bits: requested {:#b}, applied {:#b}",
            bits,
            intents.bits()
        );
    }
    intents
}
