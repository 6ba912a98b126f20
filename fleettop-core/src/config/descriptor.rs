//! Configuration file loading
//!
//! The configuration file is JSON: either a bare array of host descriptors
//! (the historical flat format) or an object with a `hosts` array and an
//! ordered `overrides` list feeding the [`HostDirectory`].

use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::config::directory::{HostDirectory, HostRecord};
use crate::error::{ConfigError, ConfigResult};

/// The external input unit describing one host to monitor.
///
/// `name`, `remote`, `username`, and `password` are required; a file that
/// omits any of them fails to parse and aborts startup before any
/// connection attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHostDescriptor {
    /// Display name, also the key used for directory lookups
    pub name: String,
    /// Remote address (host name or IP)
    pub remote: String,
    /// Login user
    pub username: String,
    /// Login password
    pub password: String,
    /// TCP port; accepts a JSON number or a numeric string
    #[serde(default, deserialize_with = "deserialize_port")]
    pub port: Option<u16>,
}

/// One pattern-keyed override entry, kept in file order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideEntry {
    /// Literal host name or glob pattern this record applies to
    pub host: String,
    /// The overridable record fields
    #[serde(flatten)]
    pub record: HostRecord,
}

/// Parsed fleet configuration: descriptors plus the override directory
#[derive(Debug, Clone)]
pub struct FleetConfig {
    /// Host descriptors in file order
    pub hosts: Vec<RawHostDescriptor>,
    /// Directory override entries in file order
    pub overrides: Vec<OverrideEntry>,
}

/// On-disk shape of the configuration file
#[derive(Deserialize)]
#[serde(untagged)]
enum ConfigFile {
    /// The historical flat format: a bare array of descriptors
    Flat(Vec<RawHostDescriptor>),
    /// Extended format with an override directory
    Full {
        hosts: Vec<RawHostDescriptor>,
        #[serde(default)]
        overrides: Vec<OverrideEntry>,
    },
}

impl FleetConfig {
    /// Loads and parses the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Read`] when the file cannot be read,
    /// [`ConfigError::Parse`] for malformed JSON or missing required
    /// fields, [`ConfigError::NoHosts`] when the host list is empty.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content, &path.display().to_string())
    }

    /// Parses configuration content; `origin` names the source in errors.
    ///
    /// # Errors
    ///
    /// See [`FleetConfig::load`].
    pub fn from_json(content: &str, origin: &str) -> ConfigResult<Self> {
        let parsed: ConfigFile =
            serde_json::from_str(content).map_err(|source| ConfigError::Parse {
                path: origin.to_string(),
                source,
            })?;
        let (hosts, overrides) = match parsed {
            ConfigFile::Flat(hosts) => (hosts, Vec::new()),
            ConfigFile::Full { hosts, overrides } => (hosts, overrides),
        };
        if hosts.is_empty() {
            return Err(ConfigError::NoHosts);
        }
        Ok(Self { hosts, overrides })
    }

    /// Builds the host directory from the override entries, in file order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] for malformed glob keys.
    pub fn directory(&self) -> ConfigResult<HostDirectory> {
        let mut directory = HostDirectory::new();
        for entry in &self.overrides {
            directory.insert(&entry.host, entry.record.clone())?;
        }
        Ok(directory)
    }
}

/// Accepts `2222`, `"2222"`, or null for the descriptor port field
fn deserialize_port<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortField {
        Number(u16),
        Text(String),
    }

    struct Unexpected<'a>(&'a str);
    impl fmt::Display for Unexpected<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "invalid port value '{}'", self.0)
        }
    }

    match Option::<PortField>::deserialize(deserializer)? {
        None => Ok(None),
        Some(PortField::Number(n)) => Ok(Some(n)),
        Some(PortField::Text(s)) => s
            .trim()
            .parse::<u16>()
            .map(Some)
            .map_err(|_| de::Error::custom(Unexpected(&s))),
    }
}
