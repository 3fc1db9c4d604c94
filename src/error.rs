//! Boundary errors
//!
//! The scoring engine itself never fails on sparse or degenerate data. These
//! errors belong to the caller side: loading datasets and validating a
//! scoring configuration before the engine is invoked.

use std::path::PathBuf;
use thiserror::Error;

/// Problems with a scoring configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The timezone is neither a fixed offset nor covered by an explicit override
    #[error("unknown timezone '{0}': use a fixed offset (e.g. -05:00) or set utc_offset_minutes")]
    UnknownTimezone(String),

    /// A UTC offset outside of +/- 24h
    #[error("utc offset of {0} minutes is out of range")]
    OffsetOutOfRange(i32),

    /// Period start falls after its end
    #[error("period starts {start} but ends {end}")]
    InvalidPeriod { start: String, end: String },

    /// A numeric setting the engine cannot work with
    #[error("invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

/// Problems reading a case dataset from disk
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
