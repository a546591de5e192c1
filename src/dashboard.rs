// Per-source view model built from a payload and its derived rates

use crate::format::{format_bytes, format_rate, format_uptime};
use crate::models::{
    InterfaceRate, InterfaceReport, RateResult, Source, SourcePayload, SourceReport,
    SourceSnapshot, counter_or_zero,
};

pub fn build_source_report(
    source: Source,
    payload: &SourcePayload,
    snapshot: &SourceSnapshot,
    rates: RateResult,
) -> SourceReport {
    let mut active: Vec<_> = snapshot
        .interfaces
        .iter()
        .filter(|i| i.rx_bytes.saturating_add(i.tx_bytes) > 0)
        .collect();
    active.sort_by(|a, b| {
        let ta = a.rx_bytes.saturating_add(a.tx_bytes);
        let tb = b.rx_bytes.saturating_add(b.tx_bytes);
        tb.cmp(&ta)
    });

    let interfaces = active
        .into_iter()
        .map(|i| {
            let rate = rates
                .interface_rates
                .get(&i.name)
                .copied()
                .unwrap_or_default();
            interface_report(&i.name, i.rx_bytes, i.tx_bytes, rate)
        })
        .collect();

    let uptime_secs = counter_or_zero(payload.uptime_seconds());

    SourceReport {
        source,
        rx_display: format_rate(rates.global_rx_rate),
        tx_display: format_rate(rates.global_tx_rate),
        rates,
        interfaces,
        hostname: payload.hostname().map(str::to_string),
        uptime_display: format_uptime(uptime_secs),
        passthrough: payload.extra.clone(),
    }
}

fn interface_report(
    name: &str,
    rx_bytes: u64,
    tx_bytes: u64,
    rate: InterfaceRate,
) -> InterfaceReport {
    InterfaceReport {
        name: name.to_string(),
        rx_bytes,
        tx_bytes,
        rx_rate: rate.rx,
        tx_rate: rate.tx,
        rx_display: format!("{}/s", format_bytes(rate.rx)),
        tx_display: format!("{}/s", format_bytes(rate.tx)),
    }
}
