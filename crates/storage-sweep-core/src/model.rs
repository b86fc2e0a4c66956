use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DeleteError;

/// One file discovered by a scan. `path` uniquely identifies the file
/// within a single scan result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub size_bytes: u64,
}

/// Which enumeration strategy produced a device scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    Find,
    Stat,
    LsRecursive,
    PerDirectory,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::Find => "find",
            StrategyKind::Stat => "stat",
            StrategyKind::LsRecursive => "ls-recursive",
            StrategyKind::PerDirectory => "per-directory",
        };
        f.write_str(name)
    }
}

/// Persisted outcome of one device scan. Records are sorted by size
/// descending, path ascending on ties; indices used by the deletion
/// commands are 1-based positions in this ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub records: Vec<FileRecord>,
    pub strategy_used: StrategyKind,
    /// RFC 3339 creation time.
    pub timestamp: String,
}

/// A deletion target as given by the caller: an explicit device path, or a
/// 1-based index into the last saved scan.
#[derive(Debug, Clone)]
pub enum DeleteTarget {
    Index(i64),
    Path(String),
}

impl fmt::Display for DeleteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteTarget::Index(i) => write!(f, "#{}", i),
            DeleteTarget::Path(p) => f.write_str(p),
        }
    }
}

/// Per-target result of one delete attempt. Transient: produced and
/// reported within a single command invocation.
#[derive(Debug)]
pub struct DeletionOutcome {
    /// The target as the caller spelled it (`#7` or a path).
    pub target: String,
    /// Concrete path, when resolution succeeded.
    pub path: Option<String>,
    pub ok: bool,
    pub error: Option<DeleteError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&StrategyKind::LsRecursive).unwrap();
        assert_eq!(json, "\"ls-recursive\"");
        let back: StrategyKind = serde_json::from_str("\"per-directory\"").unwrap();
        assert_eq!(back, StrategyKind::PerDirectory);
    }

    #[test]
    fn delete_target_display() {
        assert_eq!(DeleteTarget::Index(7).to_string(), "#7");
        assert_eq!(
            DeleteTarget::Path("/sdcard/a.mp4".into()).to_string(),
            "/sdcard/a.mp4"
        );
    }
}
