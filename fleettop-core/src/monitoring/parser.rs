//! Parser for remote host metrics output
//!
//! Parses the combined output of the monitoring shell command that reads
//! `/proc/sys/kernel/hostname`, `/proc/uptime`, `/proc/loadavg`,
//! `/proc/stat`, `/proc/meminfo`, `/proc/net/dev`, and `df -Pk`.

use crate::monitoring::metrics::{
    CpuSnapshot, FilesystemMetrics, InterfaceMetrics, LoadAverage, MemoryMetrics,
};

/// Errors that can occur during metrics parsing
#[derive(Debug, thiserror::Error)]
pub enum MonitoringError {
    /// The remote output could not be parsed
    #[error("Failed to parse monitoring output: {0}")]
    ParseError(String),
}

/// Result type for monitoring operations
pub type MonitoringResult<T> = Result<T, MonitoringError>;

/// Shell command that collects all metrics in a single invocation.
///
/// The output is delimited by marker lines so the parser can split
/// sections reliably even if individual commands produce unexpected
/// output.
pub const METRICS_COMMAND: &str = concat!(
    "echo '---FLEETTOP_HOSTNAME---';",
    "cat /proc/sys/kernel/hostname;",
    "echo '---FLEETTOP_UPTIME---';",
    "cat /proc/uptime;",
    "echo '---FLEETTOP_LOADAVG---';",
    "cat /proc/loadavg;",
    "echo '---FLEETTOP_PROC_STAT---';",
    "head -1 /proc/stat;",
    "echo '---FLEETTOP_MEMINFO---';",
    "grep -E '^(MemTotal|MemFree|Buffers|Cached|SwapTotal|SwapFree):' /proc/meminfo;",
    "echo '---FLEETTOP_NET_DEV---';",
    "tail -n +3 /proc/net/dev;",
    "echo '---FLEETTOP_DF---';",
    "df -Pk -x tmpfs -x devtmpfs -x squashfs -x overlay 2>/dev/null | tail -n +2;",
    "echo '---FLEETTOP_END---'",
);

/// Parsed raw output from a single metrics collection
#[derive(Debug, Clone)]
pub struct ParsedMetrics {
    /// Remote host name
    pub hostname: String,
    /// Uptime in seconds
    pub uptime_secs: u64,
    /// Load averages and process counts
    pub load: LoadAverage,
    /// CPU counters (for delta calculation)
    pub cpu: CpuSnapshot,
    /// Memory metrics (absolute, no delta needed)
    pub memory: MemoryMetrics,
    /// Per-filesystem usage
    pub filesystems: Vec<FilesystemMetrics>,
    /// Per-interface traffic counters
    pub interfaces: Vec<InterfaceMetrics>,
}

/// Stateless parser for remote metrics output
pub struct MetricsParser;

impl MetricsParser {
    /// Parses the combined output of [`METRICS_COMMAND`].
    ///
    /// CPU and memory sections are required; the remaining sections
    /// degrade to empty/zero values when missing or malformed.
    ///
    /// # Errors
    ///
    /// Returns [`MonitoringError::ParseError`] when a required section is
    /// missing or unparseable.
    pub fn parse(output: &str) -> MonitoringResult<ParsedMetrics> {
        let cpu = Self::parse_proc_stat(output)?;
        let memory = Self::parse_meminfo(output)?;
        let hostname = Self::section(output, "---FLEETTOP_HOSTNAME---", "---FLEETTOP_UPTIME---")
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        let uptime_secs = Self::parse_uptime(output).unwrap_or(0);
        let load = Self::parse_loadavg(output).unwrap_or_default();
        let interfaces = Self::parse_net_dev(output).unwrap_or_default();
        let filesystems = Self::parse_df(output).unwrap_or_default();

        Ok(ParsedMetrics {
            hostname,
            uptime_secs,
            load,
            cpu,
            memory,
            filesystems,
            interfaces,
        })
    }

    /// Extracts text between two marker lines
    fn section<'a>(output: &'a str, start: &str, end: &str) -> Option<&'a str> {
        let start_idx = output.find(start).map(|i| i + start.len())?;
        let end_idx = output[start_idx..].find(end).map(|i| start_idx + i)?;
        Some(output[start_idx..end_idx].trim())
    }

    /// Parses the first value of `/proc/uptime` (seconds, fractional)
    fn parse_uptime(output: &str) -> Option<u64> {
        let section = Self::section(output, "---FLEETTOP_UPTIME---", "---FLEETTOP_LOADAVG---")?;
        section
            .split_whitespace()
            .next()
            .and_then(|v| v.parse::<f64>().ok())
            .map(|v| v as u64)
    }

    /// Parses `/proc/loadavg` for load averages and process counts.
    ///
    /// Format: `0.52 0.34 0.28 2/1234 56789`
    fn parse_loadavg(output: &str) -> MonitoringResult<LoadAverage> {
        let section = Self::section(output, "---FLEETTOP_LOADAVG---", "---FLEETTOP_PROC_STAT---")
            .ok_or_else(|| MonitoringError::ParseError("Missing /proc/loadavg section".into()))?;

        let line = section.lines().next().unwrap_or("");
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(MonitoringError::ParseError(
                "Too few fields in /proc/loadavg".into(),
            ));
        }

        let (running_procs, total_procs) = parts[3]
            .split_once('/')
            .map(|(r, t)| (r.parse().unwrap_or(0), t.parse().unwrap_or(0)))
            .unwrap_or((0, 0));

        Ok(LoadAverage {
            one: parts[0].parse().unwrap_or(0.0),
            five: parts[1].parse().unwrap_or(0.0),
            fifteen: parts[2].parse().unwrap_or(0.0),
            running_procs,
            total_procs,
        })
    }

    /// Parses the first line of `/proc/stat` into a [`CpuSnapshot`].
    ///
    /// Format: `cpu  user nice system idle iowait irq softirq steal guest ...`
    fn parse_proc_stat(output: &str) -> MonitoringResult<CpuSnapshot> {
        let section = Self::section(output, "---FLEETTOP_PROC_STAT---", "---FLEETTOP_MEMINFO---")
            .ok_or_else(|| MonitoringError::ParseError("Missing /proc/stat section".into()))?;

        let line = section
            .lines()
            .find(|l| l.starts_with("cpu "))
            .ok_or_else(|| {
                MonitoringError::ParseError("No aggregate cpu line in /proc/stat".into())
            })?;

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 9 {
            return Err(MonitoringError::ParseError(
                "Too few fields in /proc/stat cpu line".into(),
            ));
        }

        let p = |i: usize| -> u64 { parts.get(i).and_then(|v| v.parse().ok()).unwrap_or(0) };

        Ok(CpuSnapshot {
            user: p(1),
            nice: p(2),
            system: p(3),
            idle: p(4),
            iowait: p(5),
            irq: p(6),
            softirq: p(7),
            steal: p(8),
            guest: p(9),
        })
    }

    /// Parses the selected `/proc/meminfo` fields
    fn parse_meminfo(output: &str) -> MonitoringResult<MemoryMetrics> {
        let section = Self::section(output, "---FLEETTOP_MEMINFO---", "---FLEETTOP_NET_DEV---")
            .ok_or_else(|| MonitoringError::ParseError("Missing /proc/meminfo section".into()))?;

        let mut memory = MemoryMetrics::default();
        for line in section.lines() {
            if let Some(rest) = line.strip_prefix("MemTotal:") {
                memory.total_kib = Self::parse_kib_value(rest);
            } else if let Some(rest) = line.strip_prefix("MemFree:") {
                memory.free_kib = Self::parse_kib_value(rest);
            } else if let Some(rest) = line.strip_prefix("Buffers:") {
                memory.buffers_kib = Self::parse_kib_value(rest);
            } else if let Some(rest) = line.strip_prefix("Cached:") {
                memory.cached_kib = Self::parse_kib_value(rest);
            } else if let Some(rest) = line.strip_prefix("SwapTotal:") {
                memory.swap_total_kib = Self::parse_kib_value(rest);
            } else if let Some(rest) = line.strip_prefix("SwapFree:") {
                memory.swap_free_kib = Self::parse_kib_value(rest);
            }
        }

        if memory.total_kib == 0 {
            return Err(MonitoringError::ParseError(
                "MemTotal not found in /proc/meminfo".into(),
            ));
        }
        Ok(memory)
    }

    /// Parses a value like `  16384000 kB` into KiB
    fn parse_kib_value(s: &str) -> u64 {
        s.split_whitespace()
            .next()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Parses `/proc/net/dev` into per-interface counters, skipping
    /// the loopback interface
    fn parse_net_dev(output: &str) -> MonitoringResult<Vec<InterfaceMetrics>> {
        let section = Self::section(output, "---FLEETTOP_NET_DEV---", "---FLEETTOP_DF---")
            .ok_or_else(|| MonitoringError::ParseError("Missing /proc/net/dev section".into()))?;

        let mut interfaces = Vec::new();
        for line in section.lines() {
            let line = line.trim();
            // Format: iface: rx_bytes rx_packets ... tx_bytes tx_packets ...
            if let Some((iface, stats)) = line.split_once(':') {
                let iface = iface.trim();
                if iface == "lo" {
                    continue;
                }
                let parts: Vec<&str> = stats.split_whitespace().collect();
                if parts.len() >= 9 {
                    interfaces.push(InterfaceMetrics {
                        name: iface.to_string(),
                        rx_bytes: parts[0].parse().unwrap_or(0),
                        tx_bytes: parts[8].parse().unwrap_or(0),
                    });
                }
            }
        }
        Ok(interfaces)
    }

    /// Parses `df -Pk` output lines (header already stripped remotely).
    ///
    /// Format: `Filesystem  1024-blocks  Used  Available  Capacity  Mounted`
    fn parse_df(output: &str) -> MonitoringResult<Vec<FilesystemMetrics>> {
        let section = Self::section(output, "---FLEETTOP_DF---", "---FLEETTOP_END---")
            .ok_or_else(|| MonitoringError::ParseError("Missing df section".into()))?;

        let mut filesystems = Vec::new();
        for line in section.lines() {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 6 {
                continue;
            }
            filesystems.push(FilesystemMetrics {
                mount_point: parts[5].to_string(),
                used_kib: parts[2].parse().unwrap_or(0),
                free_kib: parts[3].parse().unwrap_or(0),
            });
        }
        Ok(filesystems)
    }
}
