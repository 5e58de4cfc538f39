//! Config file resolution
//!
//! Reads the combined, local, bot and launch config files and extracts the
//! `botconfig` / `launchconfig` tables as untyped JSON maps. Resolution never
//! fails: every problem is recorded in the returned report and the affected
//! mapping keeps its defaults.

use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::{BotConfig, LaunchConfig};
use crate::error::{ConfigError, SourceError};

pub const DEFAULT_CONFIG_PATH: &str = "./config.toml";
pub const DEFAULT_LOCALCONFIG_PATH: &str = "./localconfig.toml";
pub const DEFAULT_BOTCONFIG_PATH: &str = "./botconfig.toml";
pub const DEFAULT_LAUNCHCONFIG_PATH: &str = "./launchconfig.toml";

const BOTCONFIG: &str = "botconfig";
const LAUNCHCONFIG: &str = "launchconfig";
const WRAPPER: &str = "config";

/// Candidate files. `None` (or an empty path) disables a source.
#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub config: Option<PathBuf>,
    pub localconfig: Option<PathBuf>,
    pub botconfig: Option<PathBuf>,
    pub launchconfig: Option<PathBuf>,
}

impl SourcePaths {
    /// All four candidates inside `dir`, using the default file names.
    pub fn in_dir(dir: &Path) -> Self {
        let join = |default: &str| Some(dir.join(Path::new(default).file_name().unwrap_or_default()));
        Self {
            config: join(DEFAULT_CONFIG_PATH),
            localconfig: join(DEFAULT_LOCALCONFIG_PATH),
            botconfig: join(DEFAULT_BOTCONFIG_PATH),
            launchconfig: join(DEFAULT_LAUNCHCONFIG_PATH),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Config,
    LocalConfig,
    BotConfig,
    LaunchConfig,
}

impl SourceKind {
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Config => "config",
            SourceKind::LocalConfig => "localconfig",
            SourceKind::BotConfig => "botconfig",
            SourceKind::LaunchConfig => "launchconfig",
        }
    }
}

#[derive(Debug)]
pub enum SourceStatus {
    /// Read successfully; lists the tables taken from the file.
    Loaded(Vec<&'static str>),
    NotFound,
    /// Not read because the combined file already supplied this table.
    Shadowed,
    Skipped(SourceError),
}

#[derive(Debug)]
pub struct SourceOutcome {
    pub kind: SourceKind,
    pub path: PathBuf,
    pub status: SourceStatus,
}

/// A table pulled out of one or more files.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSection {
    pub value: Map<String, Value>,
    pub origin: String,
}

impl RawSection {
    fn new(value: Map<String, Value>, path: &Path) -> Self {
        Self { value, origin: path.display().to_string() }
    }

    /// Shallow update: top-level keys of `other` replace ours.
    fn overlay(&mut self, other: Map<String, Value>, path: &Path) {
        self.value.extend(other);
        self.origin = format!("{} + {}", self.origin, path.display());
    }
}

#[derive(Debug, Default)]
pub struct RawSources {
    pub botconfig: Option<RawSection>,
    pub launchconfig: Option<RawSection>,
    pub report: Vec<SourceOutcome>,
}

impl RawSources {
    /// Deserialize both tables into their typed form, filling defaults for
    /// whatever no file provided.
    pub fn into_typed(self) -> Result<(BotConfig, LaunchConfig), ConfigError> {
        let botconfig = match self.botconfig {
            Some(section) => typed(BOTCONFIG, section)?,
            None => BotConfig::default(),
        };
        let launchconfig = match self.launchconfig {
            Some(section) => typed(LAUNCHCONFIG, section)?,
            None => LaunchConfig::default(),
        };
        Ok((botconfig, launchconfig))
    }
}

fn typed<T: serde::de::DeserializeOwned>(
    section: &'static str,
    raw: RawSection,
) -> Result<T, ConfigError> {
    serde_json::from_value(Value::Object(raw.value)).map_err(|source| ConfigError::Malformed {
        section,
        origin: raw.origin,
        source,
    })
}

/// Resolve every configured source.
///
/// The combined file is read first; a table it supplies is not looked up in
/// the dedicated file. The local file is applied last as a shallow override.
pub fn load_sources(paths: &SourcePaths) -> RawSources {
    let mut sources = RawSources::default();

    if let Some(path) = enabled(&paths.config) {
        let status = match read_document(path) {
            Ok(None) => SourceStatus::NotFound,
            Ok(Some(doc)) => {
                let root = unwrap_section(doc, WRAPPER);
                let (bot, launch) = (table(&root, BOTCONFIG), table(&root, LAUNCHCONFIG));
                if bot.is_none() && launch.is_none() {
                    SourceStatus::Skipped(SourceError::MissingSection {
                        path: path.to_path_buf(),
                        section: "botconfig or launchconfig",
                    })
                } else {
                    let mut taken = Vec::new();
                    if let Some(bot) = bot {
                        sources.botconfig = Some(RawSection::new(bot, path));
                        taken.push(BOTCONFIG);
                    }
                    if let Some(launch) = launch {
                        sources.launchconfig = Some(RawSection::new(launch, path));
                        taken.push(LAUNCHCONFIG);
                    }
                    SourceStatus::Loaded(taken)
                }
            }
            Err(e) => SourceStatus::Skipped(e),
        };
        sources.report.push(SourceOutcome {
            kind: SourceKind::Config,
            path: path.to_path_buf(),
            status,
        });
    }

    if let Some(path) = enabled(&paths.botconfig) {
        let status = if sources.botconfig.is_some() {
            SourceStatus::Shadowed
        } else {
            load_dedicated(path, BOTCONFIG, &mut sources.botconfig)
        };
        sources.report.push(SourceOutcome {
            kind: SourceKind::BotConfig,
            path: path.to_path_buf(),
            status,
        });
    }

    if let Some(path) = enabled(&paths.launchconfig) {
        let status = if sources.launchconfig.is_some() {
            SourceStatus::Shadowed
        } else {
            load_dedicated(path, LAUNCHCONFIG, &mut sources.launchconfig)
        };
        sources.report.push(SourceOutcome {
            kind: SourceKind::LaunchConfig,
            path: path.to_path_buf(),
            status,
        });
    }

    if let Some(path) = enabled(&paths.localconfig) {
        let status = match read_document(path) {
            Ok(None) => SourceStatus::NotFound,
            Ok(Some(doc)) => {
                let root = unwrap_section(doc, WRAPPER);
                let mut taken = Vec::new();
                for (name, slot) in
                    [(BOTCONFIG, &mut sources.botconfig), (LAUNCHCONFIG, &mut sources.launchconfig)]
                {
                    let Some(local) = table(&root, name) else {
                        continue;
                    };
                    match slot {
                        Some(existing) => existing.overlay(local, path),
                        None => *slot = Some(RawSection::new(local, path)),
                    }
                    taken.push(name);
                }
                if taken.is_empty() {
                    SourceStatus::Skipped(SourceError::MissingSection {
                        path: path.to_path_buf(),
                        section: "botconfig or launchconfig",
                    })
                } else {
                    SourceStatus::Loaded(taken)
                }
            }
            Err(e) => SourceStatus::Skipped(e),
        };
        sources.report.push(SourceOutcome {
            kind: SourceKind::LocalConfig,
            path: path.to_path_buf(),
            status,
        });
    }

    sources
}

fn enabled(path: &Option<PathBuf>) -> Option<&Path> {
    path.as_deref().filter(|p| !p.as_os_str().is_empty())
}

/// A dedicated file is either the table itself or wraps it under its own name.
fn load_dedicated(
    path: &Path,
    section: &'static str,
    slot: &mut Option<RawSection>,
) -> SourceStatus {
    match read_document(path) {
        Ok(None) => SourceStatus::NotFound,
        Ok(Some(doc)) => match unwrap_section(doc, section) {
            Value::Object(map) => {
                *slot = Some(RawSection::new(map, path));
                SourceStatus::Loaded(vec![section])
            }
            _ => SourceStatus::Skipped(SourceError::MissingSection {
                path: path.to_path_buf(),
                section,
            }),
        },
        Err(e) => SourceStatus::Skipped(e),
    }
}

fn unwrap_section(raw: Value, key: &str) -> Value {
    match raw {
        Value::Object(mut map) if matches!(map.get(key), Some(Value::Object(_))) => {
            map.remove(key).unwrap_or_default()
        }
        other => other,
    }
}

fn table(root: &Value, key: &str) -> Option<Map<String, Value>> {
    root.get(key).and_then(Value::as_object).cloned()
}

/// Read a TOML or YAML document. A missing file is `Ok(None)`.
fn read_document(path: &Path) -> Result<Option<Value>, SourceError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(SourceError::Io { path: path.to_path_buf(), source }),
    };

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    match ext.as_str() {
        "toml" => toml::from_str(&content)
            .map(Some)
            .map_err(|source| SourceError::Toml { path: path.to_path_buf(), source }),
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .map(Some)
            .map_err(|source| SourceError::Yaml { path: path.to_path_buf(), source }),
        other => Err(SourceError::UnsupportedFormat {
            path: path.to_path_buf(),
            ext: other.to_string(),
        }),
    }
}
