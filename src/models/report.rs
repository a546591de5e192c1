// Published dashboard view

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{RateResult, Source};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceReport {
    pub name: String,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_rate: f64,
    pub tx_rate: f64,
    /// e.g. "12.5KB/s"
    pub rx_display: String,
    pub tx_display: String,
}

/// Rates plus display strings for one source at one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReport {
    pub source: Source,
    pub rates: RateResult,
    pub rx_display: String,
    pub tx_display: String,
    /// Active interfaces only, busiest first.
    pub interfaces: Vec<InterfaceReport>,
    pub hostname: Option<String>,
    pub uptime_display: String,
    /// Fields the rate engine does not read (cpu, memory, disk, gpu, ...), verbatim.
    #[serde(default)]
    pub passthrough: Map<String, Value>,
}

/// One polling tick as pushed to /ws/rates and served by /api/rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardUpdate {
    /// Unix millis.
    pub timestamp: u64,
    pub host: Option<SourceReport>,
    pub guest: Option<SourceReport>,
}

impl DashboardUpdate {
    pub fn report(&self, source: Source) -> Option<&SourceReport> {
        match source {
            Source::Host => self.host.as_ref(),
            Source::Guest => self.guest.as_ref(),
        }
    }
}
