//! Blocking SSH session primitive built on libssh2
//!
//! One [`SshSession`] wraps one authenticated connection. Commands run on
//! a fresh exec channel per call; the channel is closed on completion or
//! error and the parent session stays usable either way. All blocking
//! operations on an established session are bounded by the configured
//! command timeout (applied as the libssh2 session timeout).

use std::fmt;
use std::io::{self, Read};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use ssh2::{CheckResult, KnownHostFileKind, Session};
use tracing::debug;

use crate::config::ConnectionSpec;
use crate::error::{SessionError, SessionResult};
use crate::session::pool::SessionOptions;

/// Default SSH port when a connection spec omits one
pub const DEFAULT_SSH_PORT: u16 = 22;

/// A live, authenticated SSH session to one remote host
pub struct SshSession {
    session: Session,
}

impl fmt::Debug for SshSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SshSession").finish_non_exhaustive()
    }
}

impl SshSession {
    /// Opens and authenticates a session per the connection spec.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] for any failure along the way: address
    /// resolution, TCP connect (bounded by `connect_timeout`), handshake,
    /// host-key verification when enabled, or authentication.
    pub fn connect(spec: &ConnectionSpec, options: &SessionOptions) -> SessionResult<Self> {
        let port = if spec.port == 0 {
            DEFAULT_SSH_PORT
        } else {
            spec.port
        };
        let tcp = dial(&spec.host, port, options.connect_timeout)?;

        let mut session = Session::new()?;
        session.set_tcp_stream(tcp);
        session.set_timeout(timeout_ms(options.command_timeout));
        session
            .handshake()
            .map_err(|source| SessionError::Handshake {
                host: spec.host.clone(),
                source,
            })?;

        if options.verify_host_key {
            verify_host_key(&session, &spec.host, port)?;
        }

        authenticate(&session, spec)?;
        if !session.authenticated() {
            return Err(SessionError::Authentication {
                host: spec.host.clone(),
                user: spec.user.clone(),
                reason: "server rejected all authentication attempts".to_string(),
            });
        }

        debug!(host = %spec.host, port, user = %spec.user, "SSH session established");
        Ok(Self { session })
    }

    /// Runs a command on a fresh exec channel, capturing standard output.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Channel`] when the channel cannot be
    /// opened, [`SessionError::CommandIo`] for read failures (including
    /// timeout expiry), and [`SessionError::CommandFailed`] for a
    /// non-zero exit status. The session itself remains usable for
    /// subsequent commands after any of these.
    pub fn run(&self, command: &str) -> SessionResult<String> {
        let mut channel = self
            .session
            .channel_session()
            .map_err(SessionError::Channel)?;
        channel.exec(command).map_err(SessionError::Channel)?;

        let mut stdout = String::new();
        let read_result = channel.read_to_string(&mut stdout);
        // Close regardless of the read outcome; errors here are secondary
        let _ = channel.wait_close();
        read_result?;

        let status = channel.exit_status()?;
        if status != 0 {
            return Err(SessionError::CommandFailed { status });
        }
        Ok(stdout)
    }
}

/// Resolves the address and connects with a timeout, trying each
/// candidate socket address in turn
fn dial(host: &str, port: u16, timeout: Duration) -> SessionResult<TcpStream> {
    if host.is_empty() {
        return Err(SessionError::EmptyAddress(host.to_string()));
    }
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|_| SessionError::AddressResolution(host.to_string()))?
        .collect();

    let mut last_err: Option<io::Error> = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(err) => last_err = Some(err),
        }
    }
    Err(SessionError::Connect {
        host: host.to_string(),
        port,
        source: last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::AddrNotAvailable, "no addresses resolved")
        }),
    })
}

/// Tries identity-file authentication first when configured, then the
/// password credential
fn authenticate(session: &Session, spec: &ConnectionSpec) -> SessionResult<()> {
    if let Some(identity) = &spec.identity_file {
        match session.userauth_pubkey_file(&spec.user, None, Path::new(identity), None) {
            Ok(()) => return Ok(()),
            Err(err) => {
                debug!(
                    host = %spec.host,
                    identity = %identity,
                    error = %err,
                    "identity-file authentication failed, trying password"
                );
            }
        }
    }
    if let Some(password) = &spec.password {
        return session
            .userauth_password(&spec.user, password)
            .map_err(|err| SessionError::Authentication {
                host: spec.host.clone(),
                user: spec.user.clone(),
                reason: err.to_string(),
            });
    }
    Err(SessionError::Authentication {
        host: spec.host.clone(),
        user: spec.user.clone(),
        reason: "no credentials configured".to_string(),
    })
}

/// Checks the server key against `~/.ssh/known_hosts`.
///
/// Only called when [`SessionOptions::verify_host_key`] is enabled; the
/// default is the historical trust-on-first-use behavior.
fn verify_host_key(session: &Session, host: &str, port: u16) -> SessionResult<()> {
    let host_key_err = |reason: String| SessionError::HostKey {
        host: host.to_string(),
        reason,
    };

    let mut known = session.known_hosts()?;
    let path = dirs::home_dir()
        .map(|home| home.join(".ssh").join("known_hosts"))
        .ok_or_else(|| host_key_err("cannot locate home directory".to_string()))?;
    known
        .read_file(&path, KnownHostFileKind::OpenSSH)
        .map_err(|err| host_key_err(format!("cannot read {}: {err}", path.display())))?;

    let (key, _key_type) = session
        .host_key()
        .ok_or_else(|| host_key_err("server sent no host key".to_string()))?;

    match known.check_port(host, port, key) {
        CheckResult::Match => Ok(()),
        CheckResult::NotFound => Err(host_key_err("host key not found in known_hosts".to_string())),
        CheckResult::Mismatch => Err(host_key_err(
            "host key does not match the known_hosts entry".to_string(),
        )),
        CheckResult::Failure => Err(host_key_err("host key check failed".to_string())),
    }
}

/// Converts a duration to libssh2's millisecond timeout (0 disables it)
fn timeout_ms(timeout: Duration) -> u32 {
    u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX)
}
