//! Error types for the fleettop core library
//!
//! Errors are split by domain: [`ConfigError`] covers everything up to and
//! including host resolution, [`SessionError`] covers SSH transport and
//! remote command execution. Metrics parsing has its own error type in
//! [`crate::monitoring`].

use std::io;
use thiserror::Error;

/// Errors raised while loading fleet configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read configuration file '{path}': {source}")]
    Read {
        /// Path of the configuration file
        path: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid JSON or misses required fields
    #[error("Failed to parse configuration file '{path}': {source}")]
    Parse {
        /// Path of the configuration file
        path: String,
        /// Underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// The configuration file contains no host descriptors
    #[error("Configuration contains no hosts to monitor")]
    NoHosts,

    /// A directory key is not a valid glob pattern
    #[error("Invalid host pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern key
        pattern: String,
        /// Why the pattern could not be compiled
        reason: String,
    },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while establishing or using an SSH session
#[derive(Debug, Error)]
pub enum SessionError {
    /// The connection spec carried no address to connect to
    #[error("Host '{0}' resolved to an empty address")]
    EmptyAddress(String),

    /// The address could not be resolved to any socket address
    #[error("Failed to resolve address '{0}'")]
    AddressResolution(String),

    /// The TCP connection failed or timed out
    #[error("Failed to connect to {host}:{port}: {source}")]
    Connect {
        /// Remote host name or address
        host: String,
        /// Remote TCP port
        port: u16,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The SSH protocol handshake failed
    #[error("SSH handshake with {host} failed: {source}")]
    Handshake {
        /// Remote host name or address
        host: String,
        /// Underlying libssh2 error
        #[source]
        source: ssh2::Error,
    },

    /// Host key verification against `known_hosts` failed
    #[error("Host key verification for {host} failed: {reason}")]
    HostKey {
        /// Remote host name or address
        host: String,
        /// Why verification failed
        reason: String,
    },

    /// The configured authentication methods were rejected
    #[error("Authentication for {user}@{host} failed: {reason}")]
    Authentication {
        /// Remote host name or address
        host: String,
        /// User name used for authentication
        user: String,
        /// Why authentication failed
        reason: String,
    },

    /// A fresh exec channel could not be opened
    #[error("Failed to open exec channel: {0}")]
    Channel(#[source] ssh2::Error),

    /// The remote command exited with a non-zero status
    #[error("Remote command exited with status {status}")]
    CommandFailed {
        /// The remote exit status
        status: i32,
    },

    /// Reading command output failed (includes session-timeout expiry)
    #[error("Remote command I/O failed: {0}")]
    CommandIo(#[from] io::Error),

    /// A blocking session task could not be joined
    #[error("Session worker task failed: {0}")]
    TaskJoin(String),

    /// Any other libssh2-level failure
    #[error("SSH error: {0}")]
    Ssh(#[from] ssh2::Error),
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
