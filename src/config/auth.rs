//! Credential resolution: file values first, `AUTH_*` environment second

use figment::providers::{Env, Serialized};
use figment::Figment;
use std::collections::BTreeMap;

use crate::domain::Authentication;
use crate::error::ConfigError;

pub const AUTH_ENV_PREFIX: &str = "AUTH_";

/// Fill keys missing from `file` with `AUTH_<KEY>` environment variables.
///
/// Keys present in the file always win; the environment only supplies
/// what the file leaves out. Environment values are taken verbatim as
/// strings, so a token that looks like a number or a list is kept as is.
pub fn resolve_authentication(file: &Authentication) -> Result<Authentication, ConfigError> {
    let env: BTreeMap<String, String> = Env::prefixed(AUTH_ENV_PREFIX)
        .iter()
        .map(|(key, value)| (key.as_str().to_ascii_lowercase(), value))
        .collect();

    let resolved = Figment::from(Serialized::defaults(file))
        .join(Serialized::defaults(env))
        .extract()?;
    Ok(resolved)
}
