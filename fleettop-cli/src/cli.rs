//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::Parser;

/// `FleetTop` command-line interface for monitoring a fleet of hosts
#[derive(Debug, Parser)]
#[command(name = "fleettop")]
#[command(author, version, about = "Console fleet monitor over SSH")]
pub struct Cli {
    /// Path to the fleet configuration file (JSON)
    #[arg(short = 'i', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verify server keys against ~/.ssh/known_hosts
    #[arg(long)]
    pub check_host_keys: bool,

    /// Seconds between metric sweeps
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
