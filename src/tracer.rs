//! Event ingestion and control surface
//!
//! [`PerfTracer`] owns the [`Registry`] behind a single mutex together with the
//! enabled flag and the dropped-event counter. Every public operation takes
//! the lock at most once and holds it only for the registry update, so a
//! snapshot always reflects the whole table at one instant.
//!
//! Instrumentation hooks call [`PerfTracer::begin`] on entry and hand the
//! returned [`CallToken`] back to [`PerfTracer::end`] on exit:
//!
//! ```
//! use perf_tracer::{PerfTracer, TracerConfig};
//!
//! let tracer = PerfTracer::new(&TracerConfig::default());
//! let token = tracer.begin("parse_request");
//! // ... instrumented work ...
//! tracer.end(token);
//!
//! let rows = tracer.snapshot_report();
//! assert_eq!(rows[0].identifier, "parse_request");
//! assert_eq!(rows[0].count, 1);
//! ```
//!
//! None of the operations here can fail or panic the caller: a disabled
//! tracer, a spent event budget and a clock that runs backwards all degrade to
//! dropped events or clamped durations.

use crate::call_site::CallSiteKey;
use crate::clock::{Clock, MonotonicClock, Timestamp};
use crate::config::TracerConfig;
use crate::registry::Registry;
use crate::report::{Report, ReportRow};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

/// In-flight measurement returned by `begin` and consumed by `end`
///
/// Deliberately neither `Clone` nor `Copy`: passing it to `end` moves it, so
/// a token can contribute at most one event. Dropping a token without calling
/// `end` records nothing.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a call token records nothing unless passed to `end`"]
pub struct CallToken {
    key: CallSiteKey,
    start: Timestamp,
}

impl CallToken {
    pub fn key(&self) -> &CallSiteKey {
        &self.key
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }
}

/// What happened to an event handed to `end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOutcome {
    /// Duration applied to the call site's entry
    Recorded,
    /// Tracing was disabled when the event completed
    Disabled,
    /// The event budget was spent; the event was dropped
    BudgetExhausted,
}

/// Point-in-time view of the tracer's counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracerStatus {
    pub enabled: bool,
    pub events_recorded: u64,
    pub events_remaining: u64,
    pub max_events: u64,
    pub dropped_events: u64,
    pub distinct_call_sites: usize,
}

#[derive(Debug)]
struct TracerState {
    registry: Registry,
    enabled: bool,
    /// Events dropped for budget exhaustion since the last clear
    dropped_events: u64,
}

/// Concurrent call-site performance aggregator
#[derive(Debug)]
pub struct PerfTracer {
    state: Mutex<TracerState>,
    clock: Box<dyn Clock>,
}

impl PerfTracer {
    /// Create a tracer timed by a [`MonotonicClock`]
    pub fn new(config: &TracerConfig) -> Self {
        Self::with_clock(config, MonotonicClock::new())
    }

    /// Create a tracer with an explicit clock source
    pub fn with_clock(config: &TracerConfig, clock: impl Clock) -> Self {
        Self {
            state: Mutex::new(TracerState {
                registry: Registry::new(config.max_events, config.bucket_bits),
                enabled: config.start_enabled,
                dropped_events: 0,
            }),
            clock: Box::new(clock),
        }
    }

    /// A panic while holding the lock leaves the table in a consistent state
    /// (every mutation is a handful of integer updates), so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, TracerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start measuring a call to `identifier`, timestamped by the tracer's clock
    pub fn begin(&self, identifier: &str) -> CallToken {
        self.begin_at(CallSiteKey::new(identifier), self.clock.now())
    }

    /// Start measuring with an explicit key and start time
    ///
    /// Pure construction: never touches the registry or the lock.
    pub fn begin_at(&self, key: CallSiteKey, now: Timestamp) -> CallToken {
        CallToken { key, start: now }
    }

    /// Finish a measurement, timestamped by the tracer's clock
    pub fn end(&self, token: CallToken) -> EndOutcome {
        let now = self.clock.now();
        self.end_at(token, now)
    }

    /// Finish a measurement at an explicit time
    ///
    /// The enabled flag is checked here, not at `begin`: a token taken while
    /// enabled but ended while disabled is dropped. A `now` earlier than the
    /// token's start records a zero duration.
    pub fn end_at(&self, token: CallToken, now: Timestamp) -> EndOutcome {
        if now < token.start {
            tracing::debug!(
                call_site = %token.key,
                start_ns = token.start.as_nanos(),
                end_ns = now.as_nanos(),
                "clock went backwards, clamping duration to zero"
            );
        }
        let duration_ns = now.saturating_nanos_since(token.start);
        self.record(token.key, duration_ns)
    }

    /// Record an already-measured duration for `key`
    pub fn record(&self, key: CallSiteKey, duration_ns: u64) -> EndOutcome {
        let mut state = self.lock();

        if !state.enabled {
            return EndOutcome::Disabled;
        }

        if state.registry.record(key, duration_ns) {
            return EndOutcome::Recorded;
        }

        state.dropped_events += 1;
        if state.dropped_events == 1 {
            tracing::debug!(
                max_events = state.registry.max_events(),
                "event budget exhausted, dropping events until cleared"
            );
        }
        EndOutcome::BudgetExhausted
    }

    /// Run `f` as one measured call of `identifier`
    pub fn measure<F, R>(&self, identifier: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let token = self.begin(identifier);
        let result = f();
        self.end(token);
        result
    }

    /// Turn recording on or off for subsequent `end` calls
    pub fn set_enabled(&self, enabled: bool) {
        let mut state = self.lock();
        let was_enabled = std::mem::replace(&mut state.enabled, enabled);
        drop(state);

        if was_enabled != enabled {
            if enabled {
                tracing::info!("performance tracing enabled");
            } else {
                tracing::info!("performance tracing disabled");
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    /// Discard all statistics, refill the event budget and reset the
    /// dropped-event counter
    pub fn clear(&self) {
        let mut state = self.lock();
        state.registry.clear();
        state.dropped_events = 0;
        drop(state);

        tracing::info!("performance statistics cleared");
    }

    /// Events that can still be recorded before tracing goes silent
    pub fn events_remaining(&self) -> u64 {
        self.lock().registry.events_remaining()
    }

    /// Events dropped because the budget was spent, since the last clear
    pub fn dropped_events(&self) -> u64 {
        self.lock().dropped_events
    }

    pub fn status(&self) -> TracerStatus {
        let state = self.lock();
        TracerStatus {
            enabled: state.enabled,
            events_recorded: state.registry.events_recorded(),
            events_remaining: state.registry.events_remaining(),
            max_events: state.registry.max_events(),
            dropped_events: state.dropped_events,
            distinct_call_sites: state.registry.len(),
        }
    }

    /// Per-call-site rows, sorted by identifier
    pub fn snapshot_report(&self) -> Vec<ReportRow> {
        let entries = self.lock().registry.snapshot();
        entries.iter().map(ReportRow::from).collect()
    }

    /// Rows plus tracer status, all taken under one lock acquisition
    pub fn report(&self) -> Report {
        let state = self.lock();
        let entries = state.registry.snapshot();
        let (enabled, events_recorded, events_remaining, dropped_events) = (
            state.enabled,
            state.registry.events_recorded(),
            state.registry.events_remaining(),
            state.dropped_events,
        );
        drop(state);

        Report {
            enabled,
            events_recorded,
            events_remaining,
            dropped_events,
            rows: entries.iter().map(ReportRow::from).collect(),
        }
    }
}

impl Default for PerfTracer {
    fn default() -> Self {
        Self::new(&TracerConfig::default())
    }
}

static GLOBAL_TRACER: OnceLock<PerfTracer> = OnceLock::new();

/// Process-wide tracer, created with the default configuration on first use
pub fn global() -> &'static PerfTracer {
    GLOBAL_TRACER.get_or_init(PerfTracer::default)
}
