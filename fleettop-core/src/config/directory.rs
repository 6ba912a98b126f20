//! Host directory: exact, pattern, and default configuration records
//!
//! The directory is read-only after load and is passed by value into
//! [`crate::config::ConfigResolver`]; nothing in the crate holds it as
//! shared process-wide state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::pattern::HostPattern;
use crate::error::ConfigResult;

/// The wildcard key selecting the directory's default record
pub const DEFAULT_KEY: &str = "*";

/// A raw, overridable per-host configuration record.
///
/// An empty string or a zero port means "inherit". A record never carries
/// resolved inheritance itself; merging happens per lookup in the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    /// Address to connect to; empty means inherit
    #[serde(default)]
    pub hostname: String,
    /// TCP port; zero means inherit
    #[serde(default)]
    pub port: u16,
    /// Login user; empty means inherit
    #[serde(default)]
    pub user: String,
    /// Path to a private-key file; empty means inherit
    #[serde(default)]
    pub identity_file: String,
}

/// One ordered pattern entry
#[derive(Debug, Clone)]
struct PatternEntry {
    pattern: HostPattern,
    record: HostRecord,
}

/// Stores per-host configuration records keyed by literal host name or
/// glob pattern, plus one wildcard default record.
///
/// Pattern entries keep their insertion (configuration-file) order, so the
/// scan in the resolver is deterministic: the first matching pattern wins.
/// Duplicate keys follow last-write-wins for the record value; a replaced
/// pattern entry keeps its original scan position.
#[derive(Debug, Clone, Default)]
pub struct HostDirectory {
    exact: HashMap<String, HostRecord>,
    patterns: Vec<PatternEntry>,
    default: Option<HostRecord>,
}

impl HostDirectory {
    /// Creates an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record under a literal name or glob pattern key.
    ///
    /// The key `"*"` sets the default record.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ConfigError::InvalidPattern`] when a glob
    /// key fails to compile.
    pub fn insert(&mut self, key: &str, record: HostRecord) -> ConfigResult<()> {
        if key == DEFAULT_KEY {
            self.default = Some(record);
            return Ok(());
        }
        if HostPattern::is_glob(key) {
            if let Some(entry) = self.patterns.iter_mut().find(|e| e.pattern.as_str() == key) {
                entry.record = record;
            } else {
                self.patterns.push(PatternEntry {
                    pattern: HostPattern::compile(key)?,
                    record,
                });
            }
        } else {
            self.exact.insert(key.to_string(), record);
        }
        Ok(())
    }

    /// The default record, if a `"*"` entry was loaded
    #[must_use]
    pub fn default_record(&self) -> Option<&HostRecord> {
        self.default.as_ref()
    }

    /// Looks up a record whose key is exactly `name`
    #[must_use]
    pub fn exact(&self, name: &str) -> Option<&HostRecord> {
        self.exact.get(name)
    }

    /// Scans pattern entries in file order; first match wins
    #[must_use]
    pub fn first_pattern_match(&self, name: &str) -> Option<&HostRecord> {
        self.patterns
            .iter()
            .find(|e| e.pattern.matches(name))
            .map(|e| &e.record)
    }

    /// Number of entries, counting the default record
    #[must_use]
    pub fn len(&self) -> usize {
        self.exact.len() + self.patterns.len() + usize::from(self.default.is_some())
    }

    /// Returns true when the directory holds no entries at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
