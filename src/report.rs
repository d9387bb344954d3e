//! Snapshot report and fixed-width text rendering
//!
//! A [`Report`] is a point-in-time copy of the registry plus the tracer's
//! counters. Renderers never touch the live registry.

use crate::stat_entry::StatEntry;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Minimum width of the identifier column
const IDENTIFIER_WIDTH: usize = 20;

/// One call site's statistics as presented to renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub identifier: String,
    pub count: u64,
    pub total_ns: u64,
    /// `total_ns / count`, or 0 when there is no data
    pub average_ns: u64,
    /// 0 when there is no data
    pub min_ns: u64,
    pub max_ns: u64,
}

impl From<&StatEntry> for ReportRow {
    fn from(entry: &StatEntry) -> Self {
        let has_data = entry.count > 0;
        Self {
            identifier: entry.key.to_string(),
            count: entry.count,
            total_ns: entry.total_ns,
            average_ns: entry.average_ns().unwrap_or(0),
            min_ns: if has_data { entry.min_ns } else { 0 },
            max_ns: entry.max_ns,
        }
    }
}

/// Rows plus tracer counters, taken under a single lock acquisition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub enabled: bool,
    pub events_recorded: u64,
    pub events_remaining: u64,
    pub dropped_events: u64,
    /// Sorted by identifier
    pub rows: Vec<ReportRow>,
}

impl Report {
    /// Keep only rows whose identifier matches `pattern`
    ///
    /// Counters are left untouched: they describe the whole registry.
    pub fn retain_matching(&mut self, pattern: &Regex) {
        self.rows.retain(|row| pattern.is_match(&row.identifier));
    }

    /// Render as a fixed-width table with a status header and usage footer
    pub fn to_text(&self) -> String {
        let width = self
            .rows
            .iter()
            .map(|r| r.identifier.chars().count())
            .max()
            .unwrap_or(0)
            .max(IDENTIFIER_WIDTH);

        let status = if self.enabled { "enabled" } else { "disabled" };
        let mut lines = vec![
            "Call-site performance report".to_string(),
            "============================".to_string(),
            String::new(),
            format!("Tracing status:   {}", status),
            format!("Events recorded:  {}", self.events_recorded),
            format!("Events remaining: {}", self.events_remaining),
            format!("Events dropped:   {}", self.dropped_events),
            String::new(),
            format!(
                "{:<width$} {:>10} {:>15} {:>15} {:>15} {:>15}",
                "Call site",
                "Calls",
                "Total(ns)",
                "Avg(ns)",
                "Min(ns)",
                "Max(ns)",
                width = width
            ),
            format!(
                "{} {} {} {} {} {}",
                "-".repeat(width),
                "-".repeat(10),
                "-".repeat(15),
                "-".repeat(15),
                "-".repeat(15),
                "-".repeat(15)
            ),
        ];

        if self.rows.is_empty() {
            lines.push("(no data)".to_string());
        }

        for row in &self.rows {
            lines.push(format!(
                "{:<width$} {:>10} {:>15} {:>15} {:>15} {:>15}",
                row.identifier,
                row.count,
                row.total_ns,
                row.average_ns,
                row.min_ns,
                row.max_ns,
                width = width
            ));
        }

        lines.extend([
            String::new(),
            "Control commands:".to_string(),
            "  1      enable tracing".to_string(),
            "  0      disable tracing".to_string(),
            "  clear  discard statistics and refill the event budget".to_string(),
        ]);

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
