// Where each tick's snapshot comes from

use crate::error::FetchError;
use crate::metrics_client::MetricsClient;
use crate::models::DualMetricsResponse;
use crate::sysinfo_repo::SysinfoRepo;

pub enum SnapshotProvider {
    /// Upstream collector serving both host and guest.
    Remote(MetricsClient),
    /// This machine only; reported as the host, guest stays absent.
    Local(SysinfoRepo),
}

impl SnapshotProvider {
    pub fn name(&self) -> &'static str {
        match self {
            SnapshotProvider::Remote(_) => "remote",
            SnapshotProvider::Local(_) => "local",
        }
    }

    pub async fn fetch(&self) -> Result<DualMetricsResponse, FetchError> {
        match self {
            SnapshotProvider::Remote(client) => client.fetch_dual().await,
            SnapshotProvider::Local(repo) => {
                let host = repo.get_host_payload().await?;
                Ok(DualMetricsResponse {
                    success: true,
                    native: Some(host),
                    legacy: None,
                })
            }
        }
    }
}
