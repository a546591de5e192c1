// Domain models: boundary payloads, engine input/output, published view

mod network;
mod payload;
mod rates;
mod report;
mod source;

pub use network::{InterfaceSample, SourceSnapshot};
pub(crate) use network::counter_or_zero;
pub use payload::{DualMetricsResponse, RawInterfaceSample, SourcePayload};
pub use rates::{InterfaceRate, RateResult};
pub use report::{DashboardUpdate, InterfaceReport, SourceReport};
pub use source::Source;
