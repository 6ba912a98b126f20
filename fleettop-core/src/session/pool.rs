//! Fleet session pool
//!
//! Opens one SSH session per connection spec. Each attempt is independent:
//! a descriptor that fails to connect is logged and dropped, never fatal
//! to the run. The pool is the sole owner of the live-handle set.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::ConnectionSpec;
use crate::error::{SessionError, SessionResult};
use crate::scheduler::MonitorTarget;
use crate::session::ssh::SshSession;

/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default per-command deadline in seconds
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;

/// Default bound on concurrent connection attempts
const DEFAULT_MAX_PARALLEL_CONNECTS: usize = 8;

/// Options governing session establishment and command execution
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Deadline for the TCP connect of each descriptor
    pub connect_timeout: Duration,
    /// Deadline for any blocking operation on an established session.
    ///
    /// Bounds every remote command, so a hung host cannot stall a sweep
    /// indefinitely.
    pub command_timeout: Duration,
    /// When true, server keys are checked against `~/.ssh/known_hosts`
    /// and unknown or mismatched keys fail the connection.
    ///
    /// Off by default: the monitor historically trusts hosts on first
    /// use. This is a documented security trade-off; enable it where the
    /// fleet's keys are pre-seeded.
    pub verify_host_key: bool,
    /// Bound on concurrent connection attempts during [`SessionPool::open`]
    pub max_parallel_connects: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            command_timeout: Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS),
            verify_host_key: false,
            max_parallel_connects: DEFAULT_MAX_PARALLEL_CONNECTS,
        }
    }
}

impl SessionOptions {
    /// Creates options with the defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the connect timeout
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the per-command deadline
    #[must_use]
    pub const fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Enables or disables host-key verification
    #[must_use]
    pub const fn with_verify_host_key(mut self, verify: bool) -> Self {
        self.verify_host_key = verify;
        self
    }

    /// Sets the bound on concurrent connection attempts
    #[must_use]
    pub const fn with_max_parallel_connects(mut self, max: usize) -> Self {
        self.max_parallel_connects = max;
        self
    }
}

/// Pairs a display name with a live SSH session.
///
/// The mutex serializes command execution, so callers can never issue
/// overlapping commands on one session.
#[derive(Clone)]
pub struct ServerHandle {
    name: String,
    session: Arc<Mutex<SshSession>>,
}

impl fmt::Debug for ServerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ServerHandle {
    fn new(name: String, session: SshSession) -> Self {
        Self {
            name,
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// The display name of the host behind this handle
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs a command on the remote host, returning captured stdout.
    ///
    /// The blocking libssh2 work runs on the runtime's blocking pool.
    ///
    /// # Errors
    ///
    /// Propagates [`SessionError`] from the underlying session; a failed
    /// command leaves the session usable for subsequent calls.
    pub async fn run(&self, command: &str) -> SessionResult<String> {
        let session = Arc::clone(&self.session);
        let command = command.to_owned();
        tokio::task::spawn_blocking(move || {
            let session = session.lock().unwrap_or_else(PoisonError::into_inner);
            session.run(&command)
        })
        .await
        .map_err(|err| SessionError::TaskJoin(err.to_string()))?
    }
}

impl MonitorTarget for ServerHandle {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Opens SSH sessions for a fleet of connection specs
#[derive(Debug, Clone, Default)]
pub struct SessionPool {
    options: SessionOptions,
}

impl SessionPool {
    /// Creates a pool with the given options
    #[must_use]
    pub fn new(options: SessionOptions) -> Self {
        Self { options }
    }

    /// The options this pool connects with
    #[must_use]
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Attempts one connection per spec, dropping unreachable hosts.
    ///
    /// Attempts run with bounded parallelism; the returned handles
    /// preserve the input order of the specs that connected. An empty
    /// result is valid — the scheduler then performs no-op sweeps. A spec
    /// with an empty host address is skipped without a connection
    /// attempt.
    pub async fn open(&self, specs: Vec<ConnectionSpec>) -> Vec<ServerHandle> {
        let total = specs.len();
        let semaphore = Arc::new(Semaphore::new(self.options.max_parallel_connects.max(1)));
        let mut tasks = JoinSet::new();

        for (index, spec) in specs.into_iter().enumerate() {
            if spec.host.is_empty() {
                warn!(name = %spec.name, "descriptor resolved to an empty address, skipping");
                continue;
            }
            let options = self.options.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let result = tokio::task::spawn_blocking(move || {
                    let session = SshSession::connect(&spec, &options);
                    (spec, session)
                })
                .await;
                (index, result)
            });
        }

        let mut slots: Vec<Option<ServerHandle>> = (0..total).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let Ok((index, result)) = joined else {
                continue;
            };
            match result {
                Ok((spec, Ok(session))) => {
                    debug!(name = %spec.name, host = %spec.host, "fleet session opened");
                    slots[index] = Some(ServerHandle::new(spec.name, session));
                }
                Ok((spec, Err(err))) => {
                    warn!(
                        name = %spec.name,
                        host = %spec.host,
                        error = %err,
                        "connection failed, dropping host from fleet"
                    );
                }
                Err(err) => {
                    warn!(error = %err, "connection task failed");
                }
            }
        }

        slots.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = SessionOptions::default();
        assert_eq!(options.connect_timeout, Duration::from_secs(5));
        assert_eq!(options.command_timeout, Duration::from_secs(30));
        assert!(!options.verify_host_key);
        assert_eq!(options.max_parallel_connects, 8);
    }

    #[test]
    fn test_option_builders() {
        let options = SessionOptions::new()
            .with_connect_timeout(Duration::from_secs(1))
            .with_command_timeout(Duration::from_secs(3))
            .with_verify_host_key(true)
            .with_max_parallel_connects(2);
        assert_eq!(options.connect_timeout, Duration::from_secs(1));
        assert_eq!(options.command_timeout, Duration::from_secs(3));
        assert!(options.verify_host_key);
        assert_eq!(options.max_parallel_connects, 2);
    }

    #[tokio::test]
    async fn test_open_skips_empty_addresses_and_unreachable_hosts() {
        let pool = SessionPool::new(
            SessionOptions::new().with_connect_timeout(Duration::from_millis(200)),
        );
        let specs = vec![
            ConnectionSpec {
                name: "empty".to_string(),
                host: String::new(),
                port: 0,
                user: "x".to_string(),
                password: Some("pw".to_string()),
                identity_file: None,
            },
            ConnectionSpec {
                name: "refused".to_string(),
                // Port 1 on loopback is assumed closed; connect fails fast
                host: "127.0.0.1".to_string(),
                port: 1,
                user: "x".to_string(),
                password: Some("pw".to_string()),
                identity_file: None,
            },
        ];
        let handles = pool.open(specs).await;
        assert!(handles.is_empty());
    }

    #[tokio::test]
    async fn test_open_empty_input() {
        let pool = SessionPool::new(SessionOptions::default());
        let handles = pool.open(Vec::new()).await;
        assert!(handles.is_empty());
    }
}
