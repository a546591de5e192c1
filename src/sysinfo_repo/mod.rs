// Local host sampling via sysinfo

use crate::error::FetchError;
use crate::models::{RawInterfaceSample, SourcePayload};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use sysinfo::{Networks, System};
use tracing::instrument;

pub struct SysinfoRepo {
    networks: Arc<std::sync::Mutex<Networks>>,
}

impl Default for SysinfoRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoRepo {
    pub fn new() -> Self {
        let networks = Networks::new_with_refreshed_list();
        Self {
            networks: Arc::new(std::sync::Mutex::new(networks)),
        }
    }

    /// Cumulative interface counters and identity of the machine this process runs on.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_host_payload"))]
    pub async fn get_host_payload(&self) -> Result<SourcePayload, FetchError> {
        let networks = self.networks.clone();
        tokio::task::spawn_blocking(move || {
            let mut networks_guard = networks.lock().map_err(|e| FetchError::Sampling {
                reason: format!("sysinfo networks lock poisoned: {}", e),
            })?;
            networks_guard.refresh(true);
            let mut list: Vec<_> = networks_guard.list().iter().collect();
            list.sort_by(|a, b| a.0.cmp(b.0));
            let network = list
                .into_iter()
                .map(|(name, data)| RawInterfaceSample {
                    iface: Some(Value::from(name.as_str())),
                    rx_bytes: Some(Value::from(data.total_received())),
                    tx_bytes: Some(Value::from(data.total_transmitted())),
                })
                .collect();

            let mut extra = Map::new();
            extra.insert(
                "system".into(),
                json!({
                    "hostname": System::host_name(),
                    "os": System::long_os_version(),
                    "kernel": System::kernel_version(),
                    "uptime_seconds": System::uptime(),
                    "cpu_count": System::physical_core_count(),
                }),
            );

            Ok(SourcePayload { network, extra })
        })
        .await
        .map_err(|e| FetchError::Sampling {
            reason: format!("sysinfo task join: {}", e),
        })?
    }
}
