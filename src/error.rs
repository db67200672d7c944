//! @ai:module:intent Error types for the quality harness
//! @ai:module:layer domain
//! @ai:module:public_api HarnessError, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for loading, building, running and persisting
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("{kind} file not found at {}", path.display())]
    MissingInput { kind: &'static str, path: PathBuf },

    #[error("Build of {tool} failed with status {status}: {stderr}")]
    BuildFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to launch build for {tool}: {source}")]
    BuildSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to spawn {}: {source}", binary.display())]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{matcher} did not finish within {secs}s")]
    Timeout { matcher: String, secs: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_message() {
        let err = HarnessError::MissingInput {
            kind: "corpus",
            path: PathBuf::from("Resources/instruments-export.tsv"),
        };
        assert_eq!(
            err.to_string(),
            "corpus file not found at Resources/instruments-export.tsv"
        );
    }

    #[test]
    fn test_timeout_message() {
        let err = HarnessError::Timeout {
            matcher: "Ifrit".to_string(),
            secs: 600,
        };
        assert_eq!(err.to_string(), "Ifrit did not finish within 600s");
    }
}
