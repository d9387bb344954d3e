//! JSON output format for call-site reports

use crate::report::{Report, ReportRow};
use serde::{Deserialize, Serialize};

/// Tracer counters at report time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonSummary {
    pub enabled: bool,
    pub events_recorded: u64,
    pub events_remaining: u64,
    pub dropped_events: u64,
    /// Number of call sites included in `call_sites`
    pub call_site_count: usize,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    pub summary: JsonSummary,
    pub call_sites: Vec<ReportRow>,
}

impl JsonOutput {
    pub fn from_report(report: &Report) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "perf-tracer-json-v1".to_string(),
            summary: JsonSummary {
                enabled: report.enabled,
                events_recorded: report.events_recorded,
                events_remaining: report.events_remaining,
                dropped_events: report.dropped_events,
                call_site_count: report.rows.len(),
            },
            call_sites: report.rows.clone(),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
