//! CSV output format for call-site reports
//!
//! One row per call site, durations in nanoseconds.

use crate::report::{Report, ReportRow};

const HEADER: &str = "call_site,calls,total_ns,avg_ns,min_ns,max_ns";

/// CSV report formatter
#[derive(Debug)]
pub struct CsvOutput {
    rows: Vec<ReportRow>,
}

impl CsvOutput {
    pub fn from_report(report: &Report) -> Self {
        Self {
            rows: report.rows.clone(),
        }
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_row(row: &ReportRow) -> String {
        format!(
            "{},{},{},{},{},{}",
            Self::escape_field(&row.identifier),
            row.count,
            row.total_ns,
            row.average_ns,
            row.min_ns,
            row.max_ns
        )
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str(HEADER);
        output.push('\n');

        for row in &self.rows {
            output.push_str(&Self::format_row(row));
            output.push('\n');
        }

        output
    }
}
