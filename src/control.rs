//! Line-oriented control protocol
//!
//! Mirrors the classic write-to-a-virtual-file convention:
//!
//! | input   | effect                                   |
//! |---------|------------------------------------------|
//! | `1`     | enable tracing                           |
//! | `0`     | disable tracing                          |
//! | `clear` | discard statistics, refill event budget  |
//!
//! Commands are matched by prefix, so `"1\n"` and `"clear\n"` (as written by
//! `echo`) are accepted. Inputs of [`MAX_COMMAND_LEN`] bytes or more, and
//! anything unrecognized, are rejected without touching the tracer.

use crate::tracer::PerfTracer;
use thiserror::Error;

/// Inputs this long or longer are rejected outright
pub const MAX_COMMAND_LEN: usize = 16;

/// Errors for rejected control input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("control input too long: {len} bytes (limit {})", MAX_COMMAND_LEN - 1)]
    TooLong { len: usize },

    #[error("invalid control command: {0:?} (expected 1, 0 or clear)")]
    Invalid(String),
}

/// A parsed control command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Enable,
    Disable,
    Clear,
}

impl ControlCommand {
    pub fn parse(input: &str) -> Result<Self, ControlError> {
        if input.len() >= MAX_COMMAND_LEN {
            return Err(ControlError::TooLong { len: input.len() });
        }

        if input.starts_with('1') {
            Ok(Self::Enable)
        } else if input.starts_with('0') {
            Ok(Self::Disable)
        } else if input.starts_with("clear") {
            Ok(Self::Clear)
        } else {
            Err(ControlError::Invalid(input.trim_end().to_string()))
        }
    }

    pub fn apply(self, tracer: &PerfTracer) {
        match self {
            Self::Enable => tracer.set_enabled(true),
            Self::Disable => tracer.set_enabled(false),
            Self::Clear => tracer.clear(),
        }
    }
}

/// Parse `input` and apply it to `tracer`
///
/// Rejected input is logged and returned as an error; the tracer is unchanged.
pub fn execute(tracer: &PerfTracer, input: &str) -> Result<ControlCommand, ControlError> {
    match ControlCommand::parse(input) {
        Ok(command) => {
            command.apply(tracer);
            Ok(command)
        }
        Err(e) => {
            tracing::warn!("rejected control input: {}", e);
            Err(e)
        }
    }
}
