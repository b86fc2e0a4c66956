use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error("invalid size '{0}' (expected e.g. 500KB, 100MB, 2GB)")]
    InvalidSize(String),

    #[error("no saved device scan; run `scan-device` first")]
    NoPriorScan,

    #[error("{0}")]
    Other(String),
}

/// Failure of a single bridge invocation.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("adb binary not found on PATH")]
    BridgeUnavailable,

    #[error("no device attached")]
    DeviceNotFound,

    #[error("device attached but debugging not authorized")]
    Unauthorized,

    #[error("command timed out after {0:?}")]
    Timeout(Duration),

    #[error("command exited with status {status}: {stderr}")]
    NonZeroExit { status: i32, stderr: String },
}

impl BridgeError {
    /// Connectivity-level failures abort the whole operation; everything
    /// else is strategy-local and recoverable by fallback.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BridgeError::BridgeUnavailable
                | BridgeError::DeviceNotFound
                | BridgeError::Unauthorized
        )
    }
}

/// Per-target failure during batch deletion. Reported in the outcome for
/// that target; never aborts the rest of the batch.
#[derive(Error, Debug)]
pub enum DeleteError {
    #[error("no saved device scan to index into; run `scan-device` first")]
    NoPriorScan,

    #[error("index {index} is out of range; last scan has {len} entries")]
    IndexOutOfRange { index: i64, len: usize },

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error("{0}")]
    Local(String),
}
