// Rate engine input: normalized interface counters

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{RawInterfaceSample, SourcePayload};

/// One interface's cumulative counters at one sample instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceSample {
    pub name: String,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

impl InterfaceSample {
    pub fn new(name: impl Into<String>, rx_bytes: u64, tx_bytes: u64) -> Self {
        Self {
            name: name.into(),
            rx_bytes,
            tx_bytes,
        }
    }

    /// Normalize a wire entry. Entries whose name is missing, blank or not a string are dropped.
    pub fn from_raw(raw: &RawInterfaceSample) -> Option<Self> {
        let name = raw
            .iface
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())?;
        Some(Self {
            name: name.to_string(),
            rx_bytes: counter_or_zero(raw.rx_bytes.as_ref()),
            tx_bytes: counter_or_zero(raw.tx_bytes.as_ref()),
        })
    }
}

/// All interfaces of one source at one sample instant. Names are assumed unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSnapshot {
    pub interfaces: Vec<InterfaceSample>,
}

impl SourceSnapshot {
    pub fn new(interfaces: Vec<InterfaceSample>) -> Self {
        Self { interfaces }
    }

    pub fn from_payload(payload: &SourcePayload) -> Self {
        let interfaces = payload
            .network
            .iter()
            .filter_map(InterfaceSample::from_raw)
            .collect();
        Self { interfaces }
    }

    pub fn total_rx(&self) -> u64 {
        self.interfaces
            .iter()
            .fold(0u64, |acc, i| acc.saturating_add(i.rx_bytes))
    }

    pub fn total_tx(&self) -> u64 {
        self.interfaces
            .iter()
            .fold(0u64, |acc, i| acc.saturating_add(i.tx_bytes))
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }
}

/// Coerce a wire counter to u64: absent, null, non-numeric, negative and
/// non-finite values become 0; fractional values are truncated.
pub(crate) fn counter_or_zero(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f > 0.0)
                .map(|f| f as u64)
                .unwrap_or(0)
        }),
        _ => 0,
    }
}
