//! Remote host metrics: data model, parser, and SSH-backed collector
//!
//! The collection pipeline is: run [`METRICS_COMMAND`] over SSH, parse
//! the marker-delimited output with [`MetricsParser`], then let
//! [`SshCollector`] fold raw CPU counters into percentages and emit a
//! [`MetricsSnapshot`].

mod collector;
mod metrics;
mod parser;

pub use collector::{CpuTracker, SshCollector};
pub use metrics::{
    CpuPercentages, CpuSnapshot, FilesystemMetrics, InterfaceMetrics, LoadAverage, MemoryMetrics,
    MetricsSnapshot,
};
pub use parser::{MetricsParser, MonitoringError, MonitoringResult, ParsedMetrics, METRICS_COMMAND};
