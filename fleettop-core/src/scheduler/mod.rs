//! Periodic polling scheduler
//!
//! [`PollScheduler`] drives the monitor's main loop: an immediate first
//! sweep, then one sweep per tick of a fixed interval, until a shutdown
//! signal arrives. Within a sweep the targets are visited sequentially
//! in their fixed order, so output lines always appear in the same host
//! order.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::monitoring::MetricsSnapshot;

/// Default interval between sweeps in seconds
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// A host that can be monitored by the scheduler
pub trait MonitorTarget: Send + Sync {
    /// Stable display name of the target
    fn name(&self) -> &str;
}

/// Produces one metrics snapshot per target visit.
///
/// Implementations must not fail a sweep: collection errors are folded
/// into [`MetricsSnapshot::unavailable`].
#[async_trait]
pub trait Collector<T: MonitorTarget>: Send {
    /// Collects a snapshot from one target
    async fn collect(&mut self, target: &T) -> MetricsSnapshot;
}

/// Consumes snapshots as they are collected
pub trait Renderer: Send {
    /// Renders one snapshot for the named target
    fn render(&mut self, name: &str, snapshot: &MetricsSnapshot);
}

/// Lifecycle state of the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    /// Created but not yet running
    #[default]
    Idle,
    /// Executing sweeps
    Running,
    /// Shutdown requested; finishing the current sweep
    Draining,
    /// Terminated cleanly
    Stopped,
}

/// Handle for requesting scheduler shutdown from another task
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: mpsc::Sender<()>,
}

impl ShutdownHandle {
    /// Asks the scheduler to stop after its current sweep.
    ///
    /// Idempotent; repeated calls and calls after the scheduler has
    /// already stopped are no-ops.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(()).await;
    }
}

/// Drives periodic sweeps over a fixed set of targets
pub struct PollScheduler<T, C, R>
where
    T: MonitorTarget,
    C: Collector<T>,
    R: Renderer,
{
    targets: Vec<T>,
    collector: C,
    renderer: R,
    interval: Duration,
    state: SchedulerState,
    shutdown_rx: mpsc::Receiver<()>,
}

impl<T, C, R> PollScheduler<T, C, R>
where
    T: MonitorTarget,
    C: Collector<T>,
    R: Renderer,
{
    /// Creates a scheduler and the handle that can stop it
    #[must_use]
    pub fn new(targets: Vec<T>, collector: C, renderer: R) -> (Self, ShutdownHandle) {
        let (tx, shutdown_rx) = mpsc::channel(1);
        let scheduler = Self {
            targets,
            collector,
            renderer,
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            state: SchedulerState::Idle,
            shutdown_rx,
        };
        (scheduler, ShutdownHandle { tx })
    }

    /// Sets the interval between sweeps
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> SchedulerState {
        self.state
    }

    /// Runs sweeps until shutdown is requested.
    ///
    /// The first sweep starts immediately. A sweep that outlasts the
    /// interval is never overlapped by the next one; the next tick is
    /// simply delayed. An empty target set is valid and produces no-op
    /// sweeps.
    pub async fn run(mut self) -> SchedulerState {
        self.state = SchedulerState::Running;
        info!(
            targets = self.targets.len(),
            interval_secs = self.interval.as_secs(),
            "poll scheduler started"
        );

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown_rx.recv() => {
                    self.state = SchedulerState::Draining;
                    debug!("shutdown requested, draining");
                    break;
                }
                _ = ticker.tick() => {
                    self.sweep().await;
                }
            }
        }

        self.state = SchedulerState::Stopped;
        info!("poll scheduler stopped");
        self.state
    }

    /// Visits every target once, in order, collecting and rendering
    async fn sweep(&mut self) {
        for target in &self.targets {
            let snapshot = self.collector.collect(target).await;
            self.renderer.render(target.name(), &snapshot);
        }
    }
}
