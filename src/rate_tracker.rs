// Rate derivation from cumulative interface counters.
//
// One tracker per source. Each update compares the new snapshot with the stored
// baseline and overwrites the baseline afterwards, whatever the outcome.

use crate::models::{InterfaceRate, InterfaceSample, RateResult, Source, SourceSnapshot};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Intervals at or above this are treated as a dropped poll. Calibrated for a ~2 s cadence.
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(20);

/// How one update was resolved; logged at debug level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Baseline,
    StallHold,
    Accepted,
    RejectedInterval,
}

impl UpdateOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateOutcome::Baseline => "baseline",
            UpdateOutcome::StallHold => "stall_hold",
            UpdateOutcome::Accepted => "accepted",
            UpdateOutcome::RejectedInterval => "rejected_interval",
        }
    }
}

/// Baseline and last reported rates. Only mutated by [`RateTracker::update`].
#[derive(Debug, Clone, Default)]
pub struct TrackerState {
    last_sample_time: Option<Instant>,
    last_snapshot: HashMap<String, InterfaceSample>,
    last_total_rx: u64,
    last_total_tx: u64,
    last_global_rx_rate: f64,
    last_global_tx_rate: f64,
    last_interface_rates: BTreeMap<String, InterfaceRate>,
}

impl TrackerState {
    pub fn is_baselined(&self) -> bool {
        self.last_sample_time.is_some()
    }

    pub fn last_sample_time(&self) -> Option<Instant> {
        self.last_sample_time
    }

    pub fn last_totals(&self) -> (u64, u64) {
        (self.last_total_rx, self.last_total_tx)
    }

    pub fn last_sample(&self, name: &str) -> Option<&InterfaceSample> {
        self.last_snapshot.get(name)
    }

    pub fn last_rates(&self) -> RateResult {
        RateResult {
            global_rx_rate: self.last_global_rx_rate,
            global_tx_rate: self.last_global_tx_rate,
            interface_rates: self.last_interface_rates.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RateTracker {
    max_interval: Duration,
    state: TrackerState,
}

impl Default for RateTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RateTracker {
    pub fn new() -> Self {
        Self::with_max_interval(DEFAULT_MAX_INTERVAL)
    }

    pub fn with_max_interval(max_interval: Duration) -> Self {
        Self {
            max_interval,
            state: TrackerState::default(),
        }
    }

    pub fn max_interval(&self) -> Duration {
        self.max_interval
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Derive bytes/sec rates from `snapshot` taken at `now`, then make it the new baseline.
    ///
    /// - No baseline yet: all rates are zero.
    /// - Global totals unchanged since the baseline: the previous rates are returned as-is.
    /// - Otherwise the interval must satisfy `0 < dt < max_interval`; outside it every
    ///   rate is zero for this tick. Counter decreases clamp to zero. Interfaces missing
    ///   from either snapshot get no entry.
    pub fn update(&mut self, snapshot: &SourceSnapshot, now: Instant) -> RateResult {
        self.update_with_outcome(snapshot, now).0
    }

    pub fn update_with_outcome(
        &mut self,
        snapshot: &SourceSnapshot,
        now: Instant,
    ) -> (RateResult, UpdateOutcome) {
        let total_rx = snapshot.total_rx();
        let total_tx = snapshot.total_tx();

        let (result, outcome, dt_secs) = match self.state.last_sample_time {
            None => (RateResult::zero(), UpdateOutcome::Baseline, 0.0),
            Some(_)
                if total_rx == self.state.last_total_rx && total_tx == self.state.last_total_tx =>
            {
                (self.state.last_rates(), UpdateOutcome::StallHold, 0.0)
            }
            Some(last) => {
                let dt = now.saturating_duration_since(last);
                let dt_secs = dt.as_secs_f64();
                if dt_secs > 0.0 && dt < self.max_interval {
                    let rates = self.compute(snapshot, total_rx, total_tx, dt_secs);
                    (rates, UpdateOutcome::Accepted, dt_secs)
                } else {
                    (RateResult::zero(), UpdateOutcome::RejectedInterval, dt_secs)
                }
            }
        };

        tracing::debug!(
            operation = "rate_update",
            outcome = outcome.as_str(),
            interfaces = snapshot.interfaces.len(),
            total_rx,
            total_tx,
            dt_secs,
            global_rx_rate = result.global_rx_rate,
            global_tx_rate = result.global_tx_rate,
            "rates derived"
        );

        let last_snapshot: HashMap<String, InterfaceSample> = snapshot
            .interfaces
            .iter()
            .map(|i| (i.name.clone(), i.clone()))
            .collect();
        // A stall hold may carry rates for interfaces that just disappeared; keep only current ones.
        let last_interface_rates = result
            .interface_rates
            .iter()
            .filter(|(name, _)| last_snapshot.contains_key(*name))
            .map(|(name, rate)| (name.clone(), *rate))
            .collect();
        self.state = TrackerState {
            last_sample_time: Some(now),
            last_snapshot,
            last_total_rx: total_rx,
            last_total_tx: total_tx,
            last_global_rx_rate: result.global_rx_rate,
            last_global_tx_rate: result.global_tx_rate,
            last_interface_rates,
        };

        (result, outcome)
    }

    fn compute(
        &self,
        snapshot: &SourceSnapshot,
        total_rx: u64,
        total_tx: u64,
        dt_secs: f64,
    ) -> RateResult {
        let rate = |new: u64, old: u64| new.saturating_sub(old) as f64 / dt_secs;

        let interface_rates = snapshot
            .interfaces
            .iter()
            .filter_map(|iface| {
                let old = self.state.last_snapshot.get(&iface.name)?;
                Some((
                    iface.name.clone(),
                    InterfaceRate {
                        rx: rate(iface.rx_bytes, old.rx_bytes),
                        tx: rate(iface.tx_bytes, old.tx_bytes),
                    },
                ))
            })
            .collect();

        RateResult {
            global_rx_rate: rate(total_rx, self.state.last_total_rx),
            global_tx_rate: rate(total_tx, self.state.last_total_tx),
            interface_rates,
        }
    }
}

/// Tracker that may be updated from several tasks; updates are serialized.
#[derive(Debug, Default)]
pub struct SharedRateTracker {
    inner: Mutex<RateTracker>,
}

impl SharedRateTracker {
    pub fn new(tracker: RateTracker) -> Self {
        Self {
            inner: Mutex::new(tracker),
        }
    }

    pub fn update(&self, snapshot: &SourceSnapshot, now: Instant) -> RateResult {
        // A panic mid-update leaves the previous state intact, so a poisoned lock is safe to reuse.
        let mut tracker = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        tracker.update(snapshot, now)
    }

    pub fn last_rates(&self) -> RateResult {
        let tracker = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        tracker.state().last_rates()
    }

    /// Copy of the state as of the most recently completed update.
    pub fn state(&self) -> TrackerState {
        let tracker = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        tracker.state().clone()
    }
}

/// One independent tracker per monitored source.
#[derive(Debug, Clone)]
pub struct SourceTrackers {
    pub host: RateTracker,
    pub guest: RateTracker,
}

impl Default for SourceTrackers {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_INTERVAL)
    }
}

impl SourceTrackers {
    pub fn new(max_interval: Duration) -> Self {
        Self {
            host: RateTracker::with_max_interval(max_interval),
            guest: RateTracker::with_max_interval(max_interval),
        }
    }

    pub fn get_mut(&mut self, source: Source) -> &mut RateTracker {
        match source {
            Source::Host => &mut self.host,
            Source::Guest => &mut self.guest,
        }
    }

    pub fn get(&self, source: Source) -> &RateTracker {
        match source {
            Source::Host => &self.host,
            Source::Guest => &self.guest,
        }
    }
}
