// Worker integration test: spawn the driver against the local host, tick, shutdown

use dualmon::metrics_client::MetricsClient;
use dualmon::models::DashboardUpdate;
use dualmon::provider::SnapshotProvider;
use dualmon::rate_tracker::SourceTrackers;
use dualmon::sysinfo_repo::SysinfoRepo;
use dualmon::worker::{LatestUpdate, WorkerConfig, WorkerDeps, spawn};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::time::Duration;
use tokio::sync::{RwLock, broadcast};

fn deps(
    provider: SnapshotProvider,
) -> (
    WorkerDeps,
    broadcast::Receiver<DashboardUpdate>,
    LatestUpdate,
    tokio::sync::oneshot::Sender<()>,
) {
    let (tx, rx) = broadcast::channel(16);
    let latest: LatestUpdate = Arc::new(RwLock::new(None));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let deps = WorkerDeps {
        provider: Arc::new(provider),
        trackers: SourceTrackers::default(),
        tx,
        latest: latest.clone(),
        ws_connections: Arc::new(AtomicUsize::new(0)),
        shutdown_rx,
    };
    (deps, rx, latest, shutdown_tx)
}

#[tokio::test]
async fn worker_local_provider_publishes_host_updates() {
    let (deps, mut rx, latest, shutdown_tx) = deps(SnapshotProvider::Local(SysinfoRepo::new()));
    let config = WorkerConfig {
        poll_interval_ms: 25,
        stats_log_interval_secs: 3600,
    };

    let handle = spawn(deps, config);
    let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("update within timeout")
        .expect("channel open");
    let host = first.host.expect("local provider reports the host");
    assert!(host.rates.is_zero(), "first tick is a baseline");
    assert!(first.guest.is_none());

    let _ = shutdown_tx.send(());
    handle.await.unwrap();

    let stored = latest.read().await.clone();
    assert!(stored.is_some());
}

#[tokio::test]
async fn worker_skips_ticks_when_collector_unreachable() {
    // Nothing listens on port 9 (discard); every fetch fails and the tick is skipped.
    let client = MetricsClient::new(
        "http://127.0.0.1:9/api/metrics/dual",
        Duration::from_millis(200),
    )
    .unwrap();
    let (deps, mut rx, latest, shutdown_tx) = deps(SnapshotProvider::Remote(client));
    let config = WorkerConfig {
        poll_interval_ms: 25,
        stats_log_interval_secs: 3600,
    };

    let handle = spawn(deps, config);
    tokio::time::sleep(Duration::from_millis(300)).await;
    let _ = shutdown_tx.send(());
    handle.await.unwrap();

    assert!(rx.try_recv().is_err());
    assert!(latest.read().await.is_none());
}
