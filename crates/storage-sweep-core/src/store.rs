//! Single-slot persistence for device scans.
//!
//! On-disk format: one pretty-printed JSON document with `records` (an
//! ordered array of `{path, size_bytes}` objects), `strategy_used`, and
//! an RFC 3339 `timestamp`. Paths round-trip byte-for-byte as JSON
//! strings, including U+FFFD placeholders from undecodable output.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Error;
use crate::model::ScanResult;

/// Single-slot persistence for the most recent device scan. The store
/// exclusively owns the on-disk file; every save overwrites the slot.
pub struct ScanStore {
    path: PathBuf,
}

impl ScanStore {
    /// The well-known slot in the user's home directory.
    pub fn default_location() -> Result<Self, Error> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Other("could not determine home directory".to_string()))?;
        Ok(Self {
            path: home.join(".storage-sweep-scan.json"),
        })
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist atomically: write a sibling temp file, then rename over
    /// the slot.
    pub fn save(&self, result: &ScanResult) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(result)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(
            "saved scan ({} records, {}) to {}",
            result.records.len(),
            result.strategy_used,
            self.path.display(),
        );
        Ok(())
    }

    /// The last saved scan. A missing or unreadable slot is `NoPriorScan`;
    /// a corrupt slot is treated as absence, never a crash.
    pub fn load(&self) -> Result<ScanResult, Error> {
        let text = fs::read_to_string(&self.path).map_err(|_| Error::NoPriorScan)?;
        serde_json::from_str(&text).map_err(|err| {
            warn!(
                "ignoring corrupt scan file {}: {}",
                self.path.display(),
                err
            );
            Error::NoPriorScan
        })
    }
}
