//! `FleetTop` - console fleet monitor over SSH
//!
//! Loads a fleet configuration, opens one SSH session per reachable host,
//! and renders system-health reports on a fixed interval until a signal
//! arrives.

mod cli;
mod display;
mod error;

use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fleettop_core::config::{ConfigResolver, FleetConfig};
use fleettop_core::error::ConfigError;
use fleettop_core::monitoring::SshCollector;
use fleettop_core::scheduler::{PollScheduler, ShutdownHandle};
use fleettop_core::session::{SessionOptions, SessionPool};

use cli::Cli;
use display::ConsoleRenderer;
use error::{exit_codes, CliError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(err.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Some(config_path) = cli.config else {
        println!("No fleet configuration given; use -i/--config to name one.");
        return Ok(());
    };
    if !config_path.exists() {
        println!("Configuration file {} not found.", config_path.display());
        return Ok(());
    }

    let config = match FleetConfig::load(&config_path) {
        Ok(config) => config,
        Err(ConfigError::NoHosts) => {
            // An empty fleet is not a failure; there is just nothing to do
            println!("No hosts configured in {}.", config_path.display());
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let resolver = ConfigResolver::new(config.directory()?);
    let specs: Vec<_> = config
        .hosts
        .iter()
        .map(|descriptor| resolver.resolve_descriptor(descriptor))
        .collect();

    let options = SessionOptions::new().with_verify_host_key(cli.check_host_keys);
    let pool = SessionPool::new(options);
    let handles = pool.open(specs).await;
    if handles.is_empty() {
        warn!("no hosts could be reached; running with an empty fleet");
    }
    info!(fleet = handles.len(), "starting monitor loop");

    let (scheduler, shutdown) =
        PollScheduler::new(handles, SshCollector::new(), ConsoleRenderer::new());
    let scheduler = match cli.interval {
        Some(secs) => scheduler.with_interval(Duration::from_secs(secs.max(1))),
        None => scheduler,
    };

    spawn_signal_listener(shutdown);
    scheduler.run().await;

    // Leave the cursor on a fresh line after the last report
    println!();
    Ok(())
}

/// Forwards SIGINT, SIGTERM, and SIGQUIT to the scheduler as a shutdown
/// request
fn spawn_signal_listener(shutdown: ShutdownHandle) {
    tokio::spawn(async move {
        use tokio::signal::unix::{signal, SignalKind};
        let mut interrupt = match signal(SignalKind::interrupt()) {
            Ok(stream) => stream,
            Err(err) => {
                warn!(error = %err, "cannot listen for SIGINT");
                return;
            }
        };
        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(stream) => stream,
            Err(err) => {
                warn!(error = %err, "cannot listen for SIGTERM");
                return;
            }
        };
        let mut quit = match signal(SignalKind::quit()) {
            Ok(stream) => stream,
            Err(err) => {
                warn!(error = %err, "cannot listen for SIGQUIT");
                return;
            }
        };

        tokio::select! {
            _ = interrupt.recv() => info!("received SIGINT"),
            _ = terminate.recv() => info!("received SIGTERM"),
            _ = quit.recv() => info!("received SIGQUIT"),
        }
        shutdown.shutdown().await;
    });
}

/// Initializes tracing to stderr; stdout is reserved for the reports
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
