//! Console report rendering
//!
//! One report per host per sweep: the screen is cleared, then the host's
//! metrics are printed as an indented multi-section block with values in
//! bold. Rendering failures are logged and swallowed so a broken pipe or
//! odd terminal never kills the monitor loop.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use tracing::warn;

use fleettop_core::monitoring::MetricsSnapshot;
use fleettop_core::scheduler::Renderer;

/// Renders metric snapshots as full-screen console reports
#[derive(Debug, Default)]
pub struct ConsoleRenderer;

impl ConsoleRenderer {
    /// Creates a renderer writing to standard output
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn write_report(name: &str, snapshot: &MetricsSnapshot) -> io::Result<()> {
        let mut out = io::stdout();
        out.queue(Clear(ClearType::All))?;
        out.queue(MoveTo(0, 0))?;

        writeln!(out, "{name}")?;
        if let Some(reason) = &snapshot.error {
            writeln!(out, "    metrics unavailable: {reason}")?;
            out.flush()?;
            return Ok(());
        }

        writeln!(
            out,
            "{} up {}\n",
            snapshot.hostname.as_str().bold(),
            fmt_uptime(snapshot.uptime_secs).bold()
        )?;

        writeln!(out, "Load:")?;
        writeln!(
            out,
            "    {}",
            format!(
                "{:.2} {:.2} {:.2}",
                snapshot.load.one, snapshot.load.five, snapshot.load.fifteen
            )
            .bold()
        )?;

        let cpu = &snapshot.cpu;
        writeln!(out, "\nCPU:")?;
        writeln!(
            out,
            "    {}% user, {}% sys, {}% nice, {}% idle, {}% iowait, {}% hardirq, {}% softirq, {}% guest",
            format!("{:.2}", cpu.user).bold(),
            format!("{:.2}", cpu.system).bold(),
            format!("{:.2}", cpu.nice).bold(),
            format!("{:.2}", cpu.idle).bold(),
            format!("{:.2}", cpu.iowait).bold(),
            format!("{:.2}", cpu.irq).bold(),
            format!("{:.2}", cpu.softirq).bold(),
            format!("{:.2}", cpu.guest).bold(),
        )?;

        writeln!(out, "\nProcesses:")?;
        writeln!(
            out,
            "    {} running of {} total",
            snapshot.load.running_procs.to_string().bold(),
            snapshot.load.total_procs.to_string().bold(),
        )?;

        let mem = &snapshot.memory;
        writeln!(out, "\nMemory:")?;
        writeln!(out, "    free    = {}", fmt_kib(mem.free_kib).bold())?;
        writeln!(out, "    used    = {}", fmt_kib(mem.used_kib()).bold())?;
        writeln!(out, "    buffers = {}", fmt_kib(mem.buffers_kib).bold())?;
        writeln!(out, "    cached  = {}", fmt_kib(mem.cached_kib).bold())?;
        writeln!(
            out,
            "    swap    = {} free of {}",
            fmt_kib(mem.swap_free_kib).bold(),
            fmt_kib(mem.swap_total_kib).bold(),
        )?;

        if !snapshot.filesystems.is_empty() {
            writeln!(out, "\nFilesystems:")?;
            for fs in &snapshot.filesystems {
                writeln!(
                    out,
                    "    {:>8}: {} free of {}",
                    fs.mount_point.as_str().bold(),
                    fmt_kib(fs.free_kib).bold(),
                    fmt_kib(fs.used_kib + fs.free_kib).bold(),
                )?;
            }
        }

        if !snapshot.interfaces.is_empty() {
            writeln!(out, "\nNetwork Interfaces:")?;
            for intf in &snapshot.interfaces {
                writeln!(out, "    {}", intf.name.as_str().bold())?;
                writeln!(
                    out,
                    "      rx = {}, tx = {}",
                    fmt_bytes(intf.rx_bytes).bold(),
                    fmt_bytes(intf.tx_bytes).bold(),
                )?;
            }
        }

        writeln!(out)?;
        out.flush()
    }
}

impl Renderer for ConsoleRenderer {
    fn render(&mut self, name: &str, snapshot: &MetricsSnapshot) {
        if let Err(err) = Self::write_report(name, snapshot) {
            warn!(name = %name, error = %err, "console render failed");
        }
    }
}

/// Formats a KiB quantity with 1024-based unit suffixes
fn fmt_kib(kib: u64) -> String {
    fmt_bytes(kib.saturating_mul(1024))
}

/// Formats a byte count with 1024-based unit suffixes
fn fmt_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "K", "M", "G", "T", "P"];
    if bytes < 1024 {
        return format!("{bytes}B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2}{}", UNITS[unit])
}

/// Formats an uptime as `[Nd ]h:mm:ss`
fn fmt_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;
    if days > 0 {
        format!("{days}d {hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours}:{minutes:02}:{seconds:02}")
    }
}
