//! Sources of hazard records.
//!
//! - [`pubchem`]: async PubChem client. Resolves an identifier to a CID and
//!   fetches its "Safety and Hazards" record, falling back to the full record.
//! - [`read_local`]: a saved PubChem JSON document on disk.
//!
//! Every remote failure surfaces as [`LookupError::LookupFailed`]; callers never
//! receive a placeholder record.

pub mod pubchem;

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use thiserror::Error;

/// Error returned by the lookup layer.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lookup failed for '{identifier}': {reason}")]
    LookupFailed {
        identifier: String,
        #[source]
        reason: FetchFailure,
    },
}

impl LookupError {
    pub fn failed(identifier: &str, reason: FetchFailure) -> Self {
        LookupError::LookupFailed {
            identifier: identifier.to_string(),
            reason,
        }
    }
}

/// Why a single lookup step failed.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("no compound found")]
    NotFound,
    #[error("server responded with HTTP {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Malformed(String),
}

/// Read a saved JSON document.
pub fn read_local(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_local() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, r#"{{"Record": {{"RecordNumber": 702}}}}"#).unwrap();
        let value = read_local(f.path()).unwrap();
        assert_eq!(value["Record"]["RecordNumber"], 702);
    }

    #[test]
    fn test_read_local_invalid_json() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "not json").unwrap();
        assert!(read_local(f.path()).is_err());
    }

    #[test]
    fn test_lookup_error_message() {
        let err = LookupError::failed("7732-18-5", FetchFailure::Status(503));
        assert_eq!(
            err.to_string(),
            "lookup failed for '7732-18-5': server responded with HTTP 503"
        );
    }
}
