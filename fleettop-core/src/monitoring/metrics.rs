//! Data models for remote host metrics
//!
//! All types are display-free and serializable for potential future use
//! (e.g. metrics export). Absent data degrades to zero/empty fields.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One full metrics record for a host at a point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// Host name as the remote kernel reports it
    pub hostname: String,
    /// Uptime in seconds
    pub uptime_secs: u64,
    /// Load averages and process counts
    pub load: LoadAverage,
    /// CPU usage percentages since the previous sample
    pub cpu: CpuPercentages,
    /// Memory and swap usage
    pub memory: MemoryMetrics,
    /// Mounted filesystems (pseudo filesystems excluded)
    pub filesystems: Vec<FilesystemMetrics>,
    /// Network interfaces (loopback excluded)
    pub interfaces: Vec<InterfaceMetrics>,
    /// When this snapshot was collected
    pub collected_at: DateTime<Utc>,
    /// Set when collection failed; the rest of the snapshot is then empty
    pub error: Option<String>,
}

impl MetricsSnapshot {
    /// A degraded snapshot carrying only the failure reason.
    ///
    /// Collector failures are represented this way instead of being
    /// propagated, so one failing host never aborts a sweep.
    #[must_use]
    pub fn unavailable(reason: String) -> Self {
        Self {
            collected_at: Utc::now(),
            error: Some(reason),
            ..Self::default()
        }
    }
}

/// Load average values from `/proc/loadavg`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LoadAverage {
    /// 1-minute load average
    pub one: f32,
    /// 5-minute load average
    pub five: f32,
    /// 15-minute load average
    pub fifteen: f32,
    /// Number of currently runnable processes
    pub running_procs: u32,
    /// Total number of processes
    pub total_procs: u32,
}

/// Raw CPU counters from `/proc/stat` for delta calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CpuSnapshot {
    /// Total user time (jiffies)
    pub user: u64,
    /// Total nice time (jiffies)
    pub nice: u64,
    /// Total system time (jiffies)
    pub system: u64,
    /// Total idle time (jiffies)
    pub idle: u64,
    /// Total iowait time (jiffies)
    pub iowait: u64,
    /// Total irq time (jiffies)
    pub irq: u64,
    /// Total softirq time (jiffies)
    pub softirq: u64,
    /// Total steal time (jiffies)
    pub steal: u64,
    /// Total guest time (jiffies)
    pub guest: u64,
}

impl CpuSnapshot {
    /// Total jiffies across all states
    #[must_use]
    pub fn total(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
            + self.guest
    }

    /// Per-state usage percentages between two samples.
    ///
    /// Returns zeros when no time elapsed between the samples.
    #[must_use]
    pub fn percentages_since(&self, prev: &Self) -> CpuPercentages {
        let total_delta = self.total().saturating_sub(prev.total());
        if total_delta == 0 {
            return CpuPercentages::default();
        }
        let pct =
            |curr: u64, prev: u64| (curr.saturating_sub(prev) as f32 / total_delta as f32) * 100.0;
        CpuPercentages {
            user: pct(self.user, prev.user),
            nice: pct(self.nice, prev.nice),
            system: pct(self.system, prev.system),
            idle: pct(self.idle, prev.idle),
            iowait: pct(self.iowait, prev.iowait),
            irq: pct(self.irq, prev.irq),
            softirq: pct(self.softirq, prev.softirq),
            guest: pct(self.guest, prev.guest),
        }
    }
}

/// CPU usage percentages since the previous sample (0.0–100.0 each)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CpuPercentages {
    /// Time in user mode
    pub user: f32,
    /// Time in user mode at low priority
    pub nice: f32,
    /// Time in kernel mode
    pub system: f32,
    /// Idle time
    pub idle: f32,
    /// Time waiting for I/O
    pub iowait: f32,
    /// Time servicing hardware interrupts
    pub irq: f32,
    /// Time servicing software interrupts
    pub softirq: f32,
    /// Time running guest VMs
    pub guest: f32,
}

/// Memory usage in kibibytes, as `/proc/meminfo` reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MemoryMetrics {
    /// Total physical memory (KiB)
    pub total_kib: u64,
    /// Free memory (KiB)
    pub free_kib: u64,
    /// Buffer cache (KiB)
    pub buffers_kib: u64,
    /// Page cache (KiB)
    pub cached_kib: u64,
    /// Total swap space (KiB)
    pub swap_total_kib: u64,
    /// Free swap space (KiB)
    pub swap_free_kib: u64,
}

impl MemoryMetrics {
    /// Used memory: total minus free, buffers, and cached
    #[must_use]
    pub fn used_kib(&self) -> u64 {
        self.total_kib
            .saturating_sub(self.free_kib)
            .saturating_sub(self.buffers_kib)
            .saturating_sub(self.cached_kib)
    }

    /// Used swap space
    #[must_use]
    pub fn swap_used_kib(&self) -> u64 {
        self.swap_total_kib.saturating_sub(self.swap_free_kib)
    }
}

/// Usage of one mounted filesystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilesystemMetrics {
    /// Mount point path
    pub mount_point: String,
    /// Used space (KiB)
    pub used_kib: u64,
    /// Free space (KiB)
    pub free_kib: u64,
}

/// Cumulative traffic counters for one network interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceMetrics {
    /// Interface name (e.g. "eth0")
    pub name: String,
    /// Total received bytes
    pub rx_bytes: u64,
    /// Total transmitted bytes
    pub tx_bytes: u64,
}
