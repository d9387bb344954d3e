//! Tracer configuration
//!
//! Loaded from a `perf-tracer.toml` file, then overridden from the command line.
//!
//! # Example perf-tracer.toml
//!
//! ```toml
//! # Total events recorded before tracing goes silent (until cleared)
//! max_events = 5000
//! # 2^bucket_bits hash buckets
//! bucket_bits = 10
//! start_enabled = true
//! ```

use crate::registry::{DEFAULT_BUCKET_BITS, DEFAULT_MAX_EVENTS, MAX_BUCKET_BITS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors for invalid configuration values
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_events must be greater than 0")]
    ZeroEventBudget,

    #[error("bucket_bits must be between 1 and {max}, got {actual}")]
    BucketBitsOutOfRange { actual: u32, max: u32 },
}

/// Registry sizing and initial tracer state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TracerConfig {
    /// Global event budget
    pub max_events: u64,
    /// Hash table size as a power of two
    pub bucket_bits: u32,
    /// Whether recording starts enabled
    pub start_enabled: bool,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            max_events: DEFAULT_MAX_EVENTS,
            bucket_bits: DEFAULT_BUCKET_BITS,
            start_enabled: true,
        }
    }
}

impl TracerConfig {
    /// Load and validate a configuration from a TOML file
    ///
    /// # Example
    ///
    /// ```no_run
    /// use perf_tracer::TracerConfig;
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = TracerConfig::from_file("perf-tracer.toml")?;
    /// println!("event budget: {}", config.max_events);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Parse and validate a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.max_events == 0 {
            return Err(ConfigError::ZeroEventBudget);
        }
        if self.bucket_bits == 0 || self.bucket_bits > MAX_BUCKET_BITS {
            return Err(ConfigError::BucketBitsOutOfRange {
                actual: self.bucket_bits,
                max: MAX_BUCKET_BITS,
            });
        }
        Ok(())
    }
}
