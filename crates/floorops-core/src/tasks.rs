use crate::clock::ClockTicker;
use crate::config::DashboardConfig;
use crate::fetch::SnapshotFetcher;
use crate::health::HealthMonitor;
use crate::model::{ConnectionState, Snapshot};
use crate::runtime::RuntimeState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub const EVENT_QUEUE_CAPACITY: usize = 64;

/// Writes the background tasks hand to the presentation loop. Render state
/// is only ever touched on the receiving side.
#[derive(Clone, Debug, PartialEq)]
pub enum DashboardEvent {
    Connection(ConnectionState),
    Snapshot(Snapshot),
    Clock(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleOutcome {
    pub connection: ConnectionState,
    pub snapshot_published: bool,
}

pub struct BackgroundTasks {
    pub poll: JoinHandle<()>,
    pub clock: JoinHandle<()>,
}

impl BackgroundTasks {
    /// Waits up to `grace` for both loops to wind down, then aborts the rest.
    pub async fn join(self, grace: Duration) {
        for (name, handle) in [("poll", self.poll), ("clock", self.clock)] {
            let abort = handle.abort_handle();
            match tokio::time::timeout(grace, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(event = "task_join_error", task = name, error = %err),
                Err(_) => {
                    warn!(event = "task_join_timeout", task = name);
                    abort.abort();
                }
            }
        }
    }
}

pub fn spawn_background(
    runtime: Arc<RuntimeState>,
    config: &DashboardConfig,
    client: reqwest::Client,
    tx: mpsc::Sender<DashboardEvent>,
) -> BackgroundTasks {
    let monitor = HealthMonitor::new(client.clone(), config);
    let fetcher = SnapshotFetcher::new(client, config);
    let poll = tokio::spawn(run_poll_loop(
        runtime.clone(),
        monitor,
        fetcher,
        config.probe_interval,
        tx.clone(),
    ));
    let clock = tokio::spawn(run_clock_loop(
        runtime,
        ClockTicker::new(),
        config.clock_tick,
        tx,
    ));
    BackgroundTasks { poll, clock }
}

pub async fn run_poll_loop(
    runtime: Arc<RuntimeState>,
    monitor: HealthMonitor,
    fetcher: SnapshotFetcher,
    interval: Duration,
    tx: mpsc::Sender<DashboardEvent>,
) {
    let mut shutdown = runtime.subscribe_shutdown();
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(
        event = "poll_loop_start",
        url = %monitor.url(),
        interval_ms = interval.as_millis() as u64
    );

    while runtime.is_running() {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                if !runtime.is_running() {
                    break;
                }
                poll_once(&runtime, &monitor, &fetcher, &tx).await;
            }
        }
    }
    info!(event = "poll_loop_stop");
}

/// One probe-then-fetch cycle. The fetch is skipped when this cycle's probe
/// reported offline.
pub async fn poll_once(
    runtime: &RuntimeState,
    monitor: &HealthMonitor,
    fetcher: &SnapshotFetcher,
    tx: &mpsc::Sender<DashboardEvent>,
) -> CycleOutcome {
    let connection = monitor.probe().await;
    let previous = runtime.set_connection(connection);
    if previous != connection {
        match connection {
            ConnectionState::Online => info!(event = "connection_online", url = %monitor.url()),
            ConnectionState::Offline => warn!(event = "connection_offline", url = %monitor.url()),
        }
    }
    deliver(tx, DashboardEvent::Connection(connection));

    let snapshot_published = match fetcher.fetch(connection).await {
        Some(snapshot) => deliver(tx, DashboardEvent::Snapshot(snapshot)),
        None => false,
    };
    CycleOutcome {
        connection,
        snapshot_published,
    }
}

pub async fn run_clock_loop(
    runtime: Arc<RuntimeState>,
    ticker: ClockTicker,
    interval: Duration,
    tx: mpsc::Sender<DashboardEvent>,
) {
    let mut shutdown = runtime.subscribe_shutdown();
    let mut interval = tokio::time::interval(interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while runtime.is_running() {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = interval.tick() => {
                if !runtime.is_running() {
                    break;
                }
                match ticker.tick() {
                    Ok(text) => {
                        deliver(&tx, DashboardEvent::Clock(text));
                    }
                    Err(err) => debug!(event = "clock_tick_skipped", error = %err),
                }
            }
        }
    }
    debug!(event = "clock_loop_stop");
}

/// Hands an event to the presentation loop without waiting on it. A full
/// queue drops the event (the next cycle sends fresh state); a closed one
/// means the render target is gone.
fn deliver(tx: &mpsc::Sender<DashboardEvent>, event: DashboardEvent) -> bool {
    match tx.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            debug!(event = "dashboard_event_dropped", reason = "queue_full");
            false
        }
        Err(TrySendError::Closed(_)) => {
            debug!(event = "dashboard_event_dropped", reason = "render_target_unavailable");
            false
        }
    }
}
