//! Core record types for the top-N pipeline.

use serde::{Deserialize, Serialize};

/// Sort key derived from a record's payload.
pub type Key = i64;

/// One input line paired with its numeric sort key.
///
/// The payload is kept verbatim so that output lines are bit-identical to the
/// qualifying input lines; the key is always re-derivable from the payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Record {
    pub key: Key,
    pub line: String,
}

impl Record {
    /// Parse one input line into a record.
    ///
    /// The key is the whitespace-trimmed line read as a base-10 signed 64-bit
    /// integer; overflow is an error, not wraparound. The payload keeps the
    /// untrimmed line.
    pub fn parse(line: &str) -> Result<Self, CoreError> {
        let key = line
            .trim()
            .parse::<Key>()
            .map_err(|source| CoreError::Parse {
                line: line.to_string(),
                source,
            })?;
        Ok(Self {
            key,
            line: line.to_string(),
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("record {line:?} is not a signed integer")]
    Parse {
        line: String,
        #[source]
        source: std::num::ParseIntError,
    },
}
