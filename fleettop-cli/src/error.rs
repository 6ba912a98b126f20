//! CLI error types and exit codes.

use fleettop_core::error::ConfigError;

/// Exit codes for the monitor process
pub mod exit_codes {
    /// Clean exit: normal shutdown, missing config file, or an empty
    /// host list
    pub const SUCCESS: i32 = 0;
    /// Startup failure: unreadable or invalid configuration
    pub const STARTUP_FAILURE: i32 = 1;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Terminal output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Maps the error to the process exit code
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Io(_) => exit_codes::STARTUP_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_exit_code() {
        let err = CliError::Config(ConfigError::NoHosts);
        assert_eq!(err.exit_code(), exit_codes::STARTUP_FAILURE);
    }
}
