// Library for tests to access modules

pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod metrics_client;
pub mod models;
pub mod provider;
pub mod rate_tracker;
pub mod routes;
pub mod sysinfo_repo;
pub mod version;
pub mod worker;
