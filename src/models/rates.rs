// Rate engine output

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-interface throughput in bytes/sec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceRate {
    pub rx: f64,
    pub tx: f64,
}

/// Aggregate and per-interface throughput for one tick, all in bytes/sec.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateResult {
    pub global_rx_rate: f64,
    pub global_tx_rate: f64,
    /// Only interfaces present in both the previous and current snapshot.
    pub interface_rates: BTreeMap<String, InterfaceRate>,
}

impl RateResult {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.global_rx_rate == 0.0 && self.global_tx_rate == 0.0 && self.interface_rates.is_empty()
    }
}
