// Shared test helpers

#![allow(dead_code)]

use dualmon::models::*;
use serde_json::json;

pub fn snapshot(ifaces: &[(&str, u64, u64)]) -> SourceSnapshot {
    SourceSnapshot::new(
        ifaces
            .iter()
            .map(|(name, rx, tx)| InterfaceSample::new(*name, *rx, *tx))
            .collect(),
    )
}

/// Source payload shaped like the collector's JSON.
pub fn payload(ifaces: &[(&str, u64, u64)], uptime_seconds: u64) -> SourcePayload {
    let network: Vec<_> = ifaces
        .iter()
        .map(|(name, rx, tx)| json!({ "iface": name, "rx_bytes": rx, "tx_bytes": tx }))
        .collect();
    serde_json::from_value(json!({
        "network": network,
        "system": { "hostname": "box", "os": "Linux", "uptime_seconds": uptime_seconds },
        "cpu": { "usage_percent": 12.5 },
    }))
    .expect("payload json")
}

pub fn dual(host: Option<SourcePayload>, guest: Option<SourcePayload>) -> DualMetricsResponse {
    DualMetricsResponse {
        success: true,
        native: host,
        legacy: guest,
    }
}
