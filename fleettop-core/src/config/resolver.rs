//! Effective-configuration resolution
//!
//! Merges per-host directory records with the default record, field by
//! field, and unifies directory overrides with raw descriptors into a
//! single [`ConnectionSpec`] per host before any connection is opened.

use crate::config::descriptor::RawHostDescriptor;
use crate::config::directory::{HostDirectory, HostRecord};

/// The fully resolved tuple used to open a connection.
///
/// Produced per lookup and never stored; absent data degrades to empty
/// strings and zero rather than errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveConfig {
    /// Address to connect to; falls back to the lookup name itself
    pub host: String,
    /// TCP port; zero when nothing in the directory specifies one
    pub port: u16,
    /// Login user; empty when unspecified
    pub user: String,
    /// Path to a private-key file; empty when unspecified
    pub identity_file: String,
}

/// Everything the session pool needs to open one connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSpec {
    /// Display name for rendering and logging
    pub name: String,
    /// Address to connect to
    pub host: String,
    /// TCP port; zero selects the SSH default
    pub port: u16,
    /// Login user
    pub user: String,
    /// Password credential, if any
    pub password: Option<String>,
    /// Private-key file for public-key authentication, if any
    pub identity_file: Option<String>,
}

/// Resolves host names against a [`HostDirectory`].
///
/// The directory is owned by the resolver and read-only for its lifetime.
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    directory: HostDirectory,
}

impl ConfigResolver {
    /// Creates a resolver over the given directory
    #[must_use]
    pub fn new(directory: HostDirectory) -> Self {
        Self { directory }
    }

    /// Produces the effective configuration for a host name.
    ///
    /// Precedence: an exact-key entry beats any pattern entry; pattern
    /// entries are scanned in configuration-file order and the first match
    /// wins. The selected record is merged with the default record field
    /// by field (specific over default over zero value); the host field
    /// additionally falls back to the lookup name itself.
    ///
    /// Resolution never fails — a name with no matching entry yields the
    /// default record's fields.
    #[must_use]
    pub fn resolve(&self, name: &str) -> EffectiveConfig {
        let merged = self.merged_record(name);
        EffectiveConfig {
            host: if merged.hostname.is_empty() {
                name.to_string()
            } else {
                merged.hostname
            },
            port: merged.port,
            user: merged.user,
            identity_file: merged.identity_file,
        }
    }

    /// The unified resolution pass: one [`ConnectionSpec`] per descriptor.
    ///
    /// Directory values override descriptor fields only where explicitly
    /// set (non-empty / non-zero); otherwise the descriptor's `remote`,
    /// `username`, and `port` apply. The password always comes from the
    /// descriptor; an identity file can only come from the directory.
    #[must_use]
    pub fn resolve_descriptor(&self, descriptor: &RawHostDescriptor) -> ConnectionSpec {
        let merged = self.merged_record(&descriptor.name);
        ConnectionSpec {
            name: descriptor.name.clone(),
            host: if merged.hostname.is_empty() {
                descriptor.remote.clone()
            } else {
                merged.hostname
            },
            port: if merged.port > 0 {
                merged.port
            } else {
                descriptor.port.unwrap_or(0)
            },
            user: if merged.user.is_empty() {
                descriptor.username.clone()
            } else {
                merged.user
            },
            password: Some(descriptor.password.clone()),
            identity_file: if merged.identity_file.is_empty() {
                None
            } else {
                Some(merged.identity_file)
            },
        }
    }

    /// Selects the best-matching record and merges it with the default
    fn merged_record(&self, name: &str) -> HostRecord {
        let default = self.directory.default_record().cloned().unwrap_or_default();
        let specific = self
            .directory
            .exact(name)
            .or_else(|| self.directory.first_pattern_match(name));
        match specific {
            Some(record) => merge(record, &default),
            None => default,
        }
    }
}

/// Field-level fallback merge: specific value if set, else the default's
fn merge(specific: &HostRecord, default: &HostRecord) -> HostRecord {
    HostRecord {
        hostname: pick(&specific.hostname, &default.hostname),
        port: if specific.port > 0 {
            specific.port
        } else {
            default.port
        },
        user: pick(&specific.user, &default.user),
        identity_file: pick(&specific.identity_file, &default.identity_file),
    }
}

fn pick(specific: &str, default: &str) -> String {
    if specific.is_empty() {
        default.to_string()
    } else {
        specific.to_string()
    }
}
