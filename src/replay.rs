//! Event-script replay
//!
//! Drives a [`PerfTracer`] from a recorded event stream, one command per line:
//!
//! ```text
//! # comment
//! event do_sys_open 1000 1150     # begin at 1000ns, end at 1150ns
//! ctl 0                           # control protocol (1, 0, clear)
//! report                          # emit a report at this point
//! ```
//!
//! Trailing `#` comments and blank lines are ignored.

use crate::call_site::CallSiteKey;
use crate::clock::Timestamp;
use crate::control::{self, ControlError};
use crate::report::Report;
use crate::tracer::{EndOutcome, PerfTracer};
use std::io::BufRead;
use thiserror::Error;

/// Errors raised while replaying a script
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: {source}")]
    Control {
        line: usize,
        #[source]
        source: ControlError,
    },
}

/// One parsed script line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptLine {
    Event {
        key: CallSiteKey,
        start: Timestamp,
        end: Timestamp,
    },
    Control(String),
    Report,
}

impl ScriptLine {
    /// Parse a line; `Ok(None)` for blank lines and comments
    pub fn parse(text: &str) -> Result<Option<Self>, String> {
        let text = match text.find('#') {
            Some(pos) => &text[..pos],
            None => text,
        };
        let mut fields = text.split_whitespace();

        let Some(verb) = fields.next() else {
            return Ok(None);
        };

        let line = match verb {
            "event" => {
                let identifier = fields.next().ok_or("event: missing identifier")?;
                let start = parse_nanos(fields.next(), "start")?;
                let end = parse_nanos(fields.next(), "end")?;
                Self::Event {
                    key: CallSiteKey::new(identifier),
                    start,
                    end,
                }
            }
            "ctl" => {
                let command = fields.next().ok_or("ctl: missing command")?;
                Self::Control(command.to_string())
            }
            "report" => Self::Report,
            other => return Err(format!("unknown directive '{}'", other)),
        };

        if let Some(extra) = fields.next() {
            return Err(format!("{}: unexpected trailing field '{}'", verb, extra));
        }

        Ok(Some(line))
    }
}

fn parse_nanos(field: Option<&str>, name: &str) -> Result<Timestamp, String> {
    let field = field.ok_or_else(|| format!("event: missing {} timestamp", name))?;
    field
        .parse::<u64>()
        .map(Timestamp::from_nanos)
        .map_err(|e| format!("event: invalid {} timestamp '{}': {}", name, field, e))
}

/// Counts of what a replay did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: u64,
    pub recorded: u64,
    pub dropped_disabled: u64,
    pub dropped_budget: u64,
    pub control_commands: u64,
    pub reports: u64,
}

/// Replay every line of `reader` into `tracer`
///
/// `on_report` receives a fresh [`Report`] for each `report` directive.
/// Stops at the first malformed line or rejected control command.
pub fn run<R, F>(tracer: &PerfTracer, reader: R, mut on_report: F) -> Result<ReplaySummary, ReplayError>
where
    R: BufRead,
    F: FnMut(&Report) -> std::io::Result<()>,
{
    let mut summary = ReplaySummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;

        let parsed = ScriptLine::parse(&line).map_err(|message| ReplayError::Parse {
            line: line_no,
            message,
        })?;

        match parsed {
            None => {}
            Some(ScriptLine::Event { key, start, end }) => {
                summary.events += 1;
                let token = tracer.begin_at(key, start);
                match tracer.end_at(token, end) {
                    EndOutcome::Recorded => summary.recorded += 1,
                    EndOutcome::Disabled => summary.dropped_disabled += 1,
                    EndOutcome::BudgetExhausted => summary.dropped_budget += 1,
                }
            }
            Some(ScriptLine::Control(command)) => {
                control::execute(tracer, &command).map_err(|source| ReplayError::Control {
                    line: line_no,
                    source,
                })?;
                summary.control_commands += 1;
            }
            Some(ScriptLine::Report) => {
                summary.reports += 1;
                on_report(&tracer.report())?;
            }
        }
    }

    tracing::debug!(?summary, "replay finished");
    Ok(summary)
}
