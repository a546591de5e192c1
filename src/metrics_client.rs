// HTTP client for the collector's dual (host + guest) metrics endpoint

use crate::error::FetchError;
use crate::models::DualMetricsResponse;
use crate::version::USER_AGENT;
use reqwest::Client;
use std::time::Duration;
use tracing::instrument;

pub struct MetricsClient {
    client: Client,
    url: String,
}

impl MetricsClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| anyhow::anyhow!("building collector client: {}", e))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    #[instrument(skip(self), fields(client = "collector", operation = "fetch_dual", url = %self.url))]
    pub async fn fetch_dual(&self) -> Result<DualMetricsResponse, FetchError> {
        let resp = self.client.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        let body: DualMetricsResponse = resp.json().await?;
        if !body.success {
            return Err(FetchError::Unsuccessful);
        }
        tracing::debug!(
            host = body.native.is_some(),
            guest = body.legacy.is_some(),
            host_interfaces = body.native.as_ref().map_or(0, |p| p.network.len()),
            guest_interfaces = body.legacy.as_ref().map_or(0, |p| p.network.len()),
            "fetched dual metrics"
        );
        Ok(body)
    }
}
