//! SSH session management for the fleet
//!
//! [`SshSession`] is the blocking per-host transport primitive;
//! [`SessionPool`] opens one session per resolved connection spec and
//! hands the scheduler a set of [`ServerHandle`]s.

mod pool;
mod ssh;

pub use pool::{
    ServerHandle, SessionOptions, SessionPool, DEFAULT_COMMAND_TIMEOUT_SECS,
    DEFAULT_CONNECT_TIMEOUT_SECS,
};
pub use ssh::{SshSession, DEFAULT_SSH_PORT};
