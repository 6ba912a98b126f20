//! `FleetTop` Core Library
//!
//! This crate provides the core functionality for the `FleetTop` fleet
//! monitor: fleet configuration with glob-based overrides, SSH session
//! management, metrics collection and parsing, and the periodic polling
//! scheduler.
//!
//! # Crate Structure
//!
//! - [`config`] - Fleet file loading, host directory, and resolution
//! - [`session`] - SSH sessions and the fleet session pool
//! - [`monitoring`] - Metrics model, remote-output parser, collector
//! - [`scheduler`] - Periodic sweep loop and shutdown handling
//! - [`error`] - Error types shared across the crate

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod monitoring;
pub mod scheduler;
pub mod session;

pub use config::{ConfigResolver, ConnectionSpec, FleetConfig, HostDirectory};
pub use error::{ConfigError, ConfigResult, SessionError, SessionResult};
pub use monitoring::{MetricsSnapshot, SshCollector};
pub use scheduler::{
    Collector, MonitorTarget, PollScheduler, Renderer, SchedulerState, ShutdownHandle,
    DEFAULT_POLL_INTERVAL_SECS,
};
pub use session::{ServerHandle, SessionOptions, SessionPool};
