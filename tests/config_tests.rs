// Config loading and validation tests

use dualmon::config::{AppConfig, SourceMode};

const VALID_CONFIG: &str = r#"
[server]
port = 8088
host = "0.0.0.0"

[source]
mode = "remote"
url = "http://127.0.0.1:5000/api/metrics/dual"
timeout_ms = 3000

[monitoring]
poll_interval_ms = 2000
max_sample_gap_secs = 20
stats_log_interval_secs = 60

[publishing]
broadcast_capacity = 32
"#;

const MINIMAL_LOCAL_CONFIG: &str = r#"
[server]
port = 8088
host = "127.0.0.1"

[source]
mode = "local"

[monitoring]
stats_log_interval_secs = 60

[publishing]
broadcast_capacity = 8
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 8088);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.source.mode, SourceMode::Remote);
    assert_eq!(config.source.url, "http://127.0.0.1:5000/api/metrics/dual");
    assert_eq!(config.source.timeout_ms, 3000);
    assert_eq!(config.monitoring.poll_interval_ms, 2000);
    assert_eq!(config.publishing.broadcast_capacity, 32);
}

#[test]
fn test_config_defaults_when_omitted() {
    let config = AppConfig::load_from_str(MINIMAL_LOCAL_CONFIG).expect("valid");
    assert_eq!(config.source.mode, SourceMode::Local);
    assert!(config.source.url.is_empty());
    assert_eq!(config.source.timeout_ms, 5000);
    assert_eq!(config.monitoring.poll_interval_ms, 2000);
    assert_eq!(config.monitoring.max_sample_gap_secs, 20);
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 8088", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_remote_without_url() {
    let bad = VALID_CONFIG.replace("url = \"http://127.0.0.1:5000/api/metrics/dual\"", "url = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("source.url"));
}

#[test]
fn test_config_validation_rejects_unknown_mode() {
    let bad = VALID_CONFIG.replace("mode = \"remote\"", "mode = \"carrier-pigeon\"");
    assert!(AppConfig::load_from_str(&bad).is_err());
}

#[test]
fn test_config_validation_rejects_timeout_zero() {
    let bad = VALID_CONFIG.replace("timeout_ms = 3000", "timeout_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("timeout_ms"));
}

#[test]
fn test_config_validation_rejects_poll_interval_zero() {
    let bad = VALID_CONFIG.replace("poll_interval_ms = 2000", "poll_interval_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("poll_interval_ms"));
}

#[test]
fn test_config_validation_rejects_gap_not_above_poll_interval() {
    let bad = VALID_CONFIG.replace("max_sample_gap_secs = 20", "max_sample_gap_secs = 2");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("max_sample_gap_secs"));
}

#[test]
fn test_config_validation_rejects_stats_log_interval_zero() {
    let bad = VALID_CONFIG.replace(
        "stats_log_interval_secs = 60",
        "stats_log_interval_secs = 0",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("stats_log_interval_secs"));
}

#[test]
fn test_config_validation_rejects_broadcast_capacity_zero() {
    let bad = VALID_CONFIG.replace("broadcast_capacity = 32", "broadcast_capacity = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("broadcast_capacity"));
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.server.port, 8088);
    assert_eq!(config.source.mode, SourceMode::Remote);
}
