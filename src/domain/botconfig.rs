//! `botconfig`: credentials, databases and intents

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::intents::{default_intents, IntentsValue};
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub authentication: Authentication,

    #[serde(default)]
    pub databases: BTreeMap<String, DatabaseDescriptor>,

    #[serde(default)]
    pub intents: Option<IntentsValue>,
}

impl BotConfig {
    /// Resolved intents bitmask, falling back to the library default.
    pub fn intents_bits(&self) -> Result<u64, ConfigError> {
        match &self.intents {
            Some(value) => value.bits(),
            None => Ok(default_intents()),
        }
    }
}

/// Gateway credentials. Either key may be absent here and supplied through
/// `AUTH_CLIENT_ID` / `AUTH_TOKEN` instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authentication {
    #[serde(default, deserialize_with = "de_snowflake", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Validated credentials handed to the gateway client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: u64,
    pub token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl TryFrom<&Authentication> for Credentials {
    type Error = ConfigError;

    fn try_from(auth: &Authentication) -> Result<Self, Self::Error> {
        let client_id = auth
            .client_id
            .filter(|id| *id != 0)
            .ok_or(ConfigError::MissingCredential("client_id"))?;
        let token = auth
            .token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingCredential("token"))?;
        Ok(Self { client_id, token: token.to_string() })
    }
}

/// Connection descriptor for one named database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseDescriptor {
    pub engine: String,

    #[serde(default)]
    pub library: Option<String>,

    #[serde(alias = "url")]
    pub uri: String,

    #[serde(default, alias = "connect_args")]
    pub connection_args: Map<String, Value>,
}

/// Discord ids arrive as integers or as numeric strings.
fn de_snowflake<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Snowflake {
        Int(u64),
        Str(String),
    }

    match Option::<Snowflake>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Snowflake::Int(id)) => Ok(Some(id)),
        Some(Snowflake::Str(raw)) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("'{raw}' is not a valid snowflake id"))),
    }
}
