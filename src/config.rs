use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub source: SourceConfig,
    pub monitoring: MonitoringConfig,
    pub publishing: PublishingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Sample this machine's interfaces directly (host only).
    Local,
    /// Poll an upstream collector for host + guest.
    Remote,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub mode: SourceMode,
    /// Collector dual endpoint, e.g. http://127.0.0.1:5000/api/metrics/dual. Required in remote mode.
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Sample gaps at or above this yield zero rates. Revisit when poll_interval_ms changes.
    #[serde(default = "default_max_sample_gap_secs")]
    pub max_sample_gap_secs: u64,
    /// How often to log app stats (ws clients, ticks ok/skipped) at INFO level.
    pub stats_log_interval_secs: u64,
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_max_sample_gap_secs() -> u64 {
    20
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingConfig {
    /// Max number of updates kept in the broadcast channel for /ws/rates (slow clients may lag).
    pub broadcast_capacity: usize,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            self.source.mode != SourceMode::Remote || !self.source.url.trim().is_empty(),
            "source.url must be non-empty when source.mode = \"remote\""
        );
        anyhow::ensure!(
            self.source.timeout_ms > 0,
            "source.timeout_ms must be > 0, got {}",
            self.source.timeout_ms
        );
        anyhow::ensure!(
            self.monitoring.poll_interval_ms > 0,
            "monitoring.poll_interval_ms must be > 0, got {}",
            self.monitoring.poll_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.max_sample_gap_secs.saturating_mul(1000) > self.monitoring.poll_interval_ms,
            "monitoring.max_sample_gap_secs must exceed the poll interval, got {}s for {}ms",
            self.monitoring.max_sample_gap_secs,
            self.monitoring.poll_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.publishing.broadcast_capacity > 0,
            "publishing.broadcast_capacity must be > 0, got {}",
            self.publishing.broadcast_capacity
        );
        Ok(())
    }
}
