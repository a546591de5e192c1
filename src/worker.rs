// Polling driver: fetch a dual snapshot each tick, run each source through its
// tracker, publish the resulting update. One task owns the trackers, so updates
// to a given tracker are strictly sequential.

use crate::dashboard::build_source_report;
use crate::models::{DashboardUpdate, DualMetricsResponse, Source, SourceSnapshot};
use crate::provider::SnapshotProvider;
use crate::rate_tracker::SourceTrackers;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::{RwLock, broadcast};
use tokio::time::{Duration, Instant, interval};
use tracing::Instrument;

/// Rate limit for "no receivers" log (avoid logging every tick when no one is on /ws/rates)
const NO_RECEIVERS_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Most recent update, served by GET /api/rates.
pub type LatestUpdate = Arc<RwLock<Option<DashboardUpdate>>>;

/// Provider, trackers, channels, and shutdown for the worker.
pub struct WorkerDeps {
    pub provider: Arc<SnapshotProvider>,
    pub trackers: SourceTrackers,
    pub tx: broadcast::Sender<DashboardUpdate>,
    pub latest: LatestUpdate,
    pub ws_connections: Arc<AtomicUsize>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

pub struct WorkerConfig {
    pub poll_interval_ms: u64,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

/// Run every source present in `response` through its tracker.
/// Sources absent from the response leave their tracker untouched.
pub fn process_response(
    trackers: &mut SourceTrackers,
    response: &DualMetricsResponse,
    now: std::time::Instant,
    timestamp: u64,
) -> DashboardUpdate {
    let mut update = DashboardUpdate {
        timestamp,
        host: None,
        guest: None,
    };
    for source in Source::ALL {
        let Some(payload) = response.payload(source) else {
            continue;
        };
        let snapshot = SourceSnapshot::from_payload(payload);
        let dropped = payload.network.len() - snapshot.interfaces.len();
        if dropped > 0 {
            tracing::debug!(%source, dropped, "dropped interface entries without a name");
        }
        if snapshot.is_empty() {
            tracing::debug!(%source, "payload carried no usable interfaces");
        }
        let rates = trackers.get_mut(source).update(&snapshot, now);
        let report = build_source_report(source, payload, &snapshot, rates);
        match source {
            Source::Host => update.host = Some(report),
            Source::Guest => update.guest = Some(report),
        }
    }
    update
}

fn unix_millis() -> u64 {
    let millis = chrono::Utc::now().timestamp_millis();
    u64::try_from(millis).unwrap_or_else(|e| {
        tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
        0
    })
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        provider,
        mut trackers,
        tx,
        latest,
        ws_connections,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        poll_interval_ms,
        stats_log_interval_secs,
    } = config;

    let stats_log_interval = Duration::from_secs(stats_log_interval_secs);
    let max_sample_gap_secs = trackers.get(Source::Host).max_interval().as_secs_f64();
    let worker_span = tracing::span!(
        tracing::Level::DEBUG,
        "worker",
        poll_interval_ms,
        max_sample_gap_secs,
        provider = provider.name()
    );

    tokio::spawn(async move {
        let mut tick = interval(Duration::from_millis(poll_interval_ms));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(stats_log_interval);
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut ticks_ok: u64 = 0;
        let mut ticks_skipped: u64 = 0;
        let mut last_no_receivers_log: Option<Instant> = None;

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let response = match provider.fetch().await {
                        Ok(r) => r,
                        Err(e) => {
                            tracing::warn!(
                                error = %e,
                                operation = "fetch_snapshot",
                                "snapshot fetch failed; skipping tick"
                            );
                            ticks_skipped += 1;
                            continue;
                        }
                    };

                    let update = process_response(
                        &mut trackers,
                        &response,
                        std::time::Instant::now(),
                        unix_millis(),
                    );
                    ticks_ok += 1;

                    *latest.write().await = Some(update.clone());

                    if tx.send(update).is_err() {
                        let should_log = last_no_receivers_log
                            .is_none_or(|t| t.elapsed() >= NO_RECEIVERS_LOG_INTERVAL);
                        if should_log {
                            tracing::debug!(
                                operation = "broadcast_update",
                                "No active WebSocket clients; broadcast channel has no receivers"
                            );
                            last_no_receivers_log = Some(Instant::now());
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        ws_clients = ws_connections.load(std::sync::atomic::Ordering::Relaxed),
                        ticks_ok,
                        ticks_skipped,
                        "app stats"
                    );
                }
            }
        }
    }
    .instrument(worker_span))
}
