//! perf-tracer - concurrent call-site performance aggregator
//!
//! Instrumentation hooks hand the tracer `(call site, duration)` events through
//! [`PerfTracer::begin`] / [`PerfTracer::end`]; the tracer keeps a bounded table
//! of per-call-site count, total, minimum and maximum durations that a control
//! surface can enable, disable and clear, and a report surface can snapshot.

pub mod call_site;
pub mod cli;
pub mod clock;
pub mod config;
pub mod control;
pub mod csv_output;
pub mod json_output;
pub mod registry;
pub mod replay;
pub mod report;
pub mod stat_entry;
pub mod tracer;

pub use call_site::{CallSiteKey, MAX_CALL_SITE_LEN};
pub use clock::{Clock, ManualClock, MonotonicClock, Timestamp};
pub use config::TracerConfig;
pub use report::{Report, ReportRow};
pub use tracer::{global, CallToken, EndOutcome, PerfTracer, TracerStatus};
