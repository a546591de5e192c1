// Collector wire payloads (loosely typed JSON from /api/metrics/dual)
//
// Decoding never fails on a malformed field: bad values degrade to empty/absent so
// a broken host payload cannot take the guest reading down with it.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::Source;

/// Response of the collector's dual endpoint. `native` is the host, `legacy` the guest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DualMetricsResponse {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient_payload")]
    pub native: Option<SourcePayload>,
    #[serde(default, deserialize_with = "lenient_payload")]
    pub legacy: Option<SourcePayload>,
}

impl DualMetricsResponse {
    pub fn payload(&self, source: Source) -> Option<&SourcePayload> {
        match source {
            Source::Host => self.native.as_ref(),
            Source::Guest => self.legacy.as_ref(),
        }
    }
}

/// One source's metrics. Only `network` is decoded; system, cpu, memory, disk,
/// gpu and the rest are carried in `extra` and republished untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcePayload {
    #[serde(default, deserialize_with = "lenient_network")]
    pub network: Vec<RawInterfaceSample>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SourcePayload {
    /// The `system` block, if present and an object.
    pub fn system(&self) -> Option<&Map<String, Value>> {
        self.extra.get("system").and_then(Value::as_object)
    }

    pub fn hostname(&self) -> Option<&str> {
        self.system()?.get("hostname")?.as_str()
    }

    pub fn uptime_seconds(&self) -> Option<&Value> {
        self.system()?.get("uptime_seconds")
    }
}

/// Interface counters as sent on the wire; any field may be absent or malformed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawInterfaceSample {
    #[serde(default)]
    pub iface: Option<Value>,
    #[serde(default)]
    pub rx_bytes: Option<Value>,
    #[serde(default)]
    pub tx_bytes: Option<Value>,
}

fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(Value::deserialize(d)?.as_bool().unwrap_or(false))
}

fn lenient_payload<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SourcePayload>, D::Error> {
    match Value::deserialize(d)? {
        value @ Value::Object(_) => Ok(serde_json::from_value(value).ok()),
        _ => Ok(None),
    }
}

/// Accepts a list of entries or `{ "interfaces": [...] }`; anything else is empty.
fn lenient_network<'de, D>(d: D) -> Result<Vec<RawInterfaceSample>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Value::deserialize(d)? {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("interfaces") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    Ok(entries
        .into_iter()
        .map(|entry| serde_json::from_value(entry).unwrap_or_default())
        .collect())
}
