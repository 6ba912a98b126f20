//! Metrics collection over established SSH sessions
//!
//! [`SshCollector`] runs the combined metrics command on a host, parses
//! the output, and converts raw CPU counters into percentages against
//! the previous sample for that host. Any failure degrades to an
//! unavailable snapshot instead of propagating.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;

use crate::monitoring::metrics::{CpuPercentages, CpuSnapshot, MetricsSnapshot};
use crate::monitoring::parser::{MetricsParser, METRICS_COMMAND};
use crate::scheduler::Collector;
use crate::session::ServerHandle;

/// Tracks the previous CPU sample per host for delta computation
#[derive(Debug, Default)]
pub struct CpuTracker {
    previous: HashMap<String, CpuSnapshot>,
}

impl CpuTracker {
    /// Creates an empty tracker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes usage percentages for a new sample and stores it.
    ///
    /// The first sample for a host has no baseline and yields zeros; real
    /// percentages appear from the second sweep onward.
    pub fn percentages(&mut self, name: &str, sample: CpuSnapshot) -> CpuPercentages {
        let pct = self
            .previous
            .get(name)
            .map(|prev| sample.percentages_since(prev))
            .unwrap_or_default();
        self.previous.insert(name.to_string(), sample);
        pct
    }
}

/// Collects metrics from hosts via their SSH sessions
#[derive(Debug, Default)]
pub struct SshCollector {
    tracker: CpuTracker,
}

impl SshCollector {
    /// Creates a collector with no CPU history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Collector<ServerHandle> for SshCollector {
    async fn collect(&mut self, target: &ServerHandle) -> MetricsSnapshot {
        let output = match target.run(METRICS_COMMAND).await {
            Ok(output) => output,
            Err(err) => {
                warn!(name = %target.name(), error = %err, "metrics command failed");
                return MetricsSnapshot::unavailable(err.to_string());
            }
        };

        let parsed = match MetricsParser::parse(&output) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(name = %target.name(), error = %err, "metrics output unparseable");
                return MetricsSnapshot::unavailable(err.to_string());
            }
        };

        let cpu = self.tracker.percentages(target.name(), parsed.cpu);
        MetricsSnapshot {
            hostname: parsed.hostname,
            uptime_secs: parsed.uptime_secs,
            load: parsed.load,
            cpu,
            memory: parsed.memory,
            filesystems: parsed.filesystems,
            interfaces: parsed.interfaces,
            collected_at: Utc::now(),
            error: None,
        }
    }
}
