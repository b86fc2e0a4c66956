use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::bridge::{quote, Bridge};
use crate::error::DeleteError;
use crate::model::{DeleteTarget, DeletionOutcome, FileRecord, ScanResult};

/// Delete a batch of device targets, each resolved against the last saved
/// scan when given by index. Targets are processed independently; one
/// failure never aborts the rest. In dry-run mode targets are resolved
/// and reported but no removal command is issued.
pub fn delete_on_device(
    bridge: &dyn Bridge,
    last_scan: Option<&ScanResult>,
    targets: &[DeleteTarget],
    timeout: Duration,
    dry_run: bool,
) -> Vec<DeletionOutcome> {
    targets
        .iter()
        .map(|target| {
            let path = match resolve(target, last_scan) {
                Ok(path) => path,
                Err(err) => {
                    warn!("cannot resolve {}: {}", target, err);
                    return DeletionOutcome {
                        target: target.to_string(),
                        path: None,
                        ok: false,
                        error: Some(err),
                    };
                }
            };

            if dry_run {
                return DeletionOutcome {
                    target: target.to_string(),
                    path: Some(path),
                    ok: true,
                    error: None,
                };
            }

            match bridge.shell(&format!("rm -f {}", quote(&path)), timeout) {
                Ok(_) => {
                    info!("deleted {}", path);
                    DeletionOutcome {
                        target: target.to_string(),
                        path: Some(path),
                        ok: true,
                        error: None,
                    }
                }
                Err(err) => {
                    error!("failed to delete {}: {}", path, err);
                    DeletionOutcome {
                        target: target.to_string(),
                        path: Some(path),
                        ok: false,
                        error: Some(DeleteError::Bridge(err)),
                    }
                }
            }
        })
        .collect()
}

/// Valid indices are 1..=N over the saved scan's record order.
fn resolve(target: &DeleteTarget, last_scan: Option<&ScanResult>) -> Result<String, DeleteError> {
    match target {
        DeleteTarget::Path(path) => Ok(path.clone()),
        DeleteTarget::Index(index) => {
            let scan = last_scan.ok_or(DeleteError::NoPriorScan)?;
            if *index < 1 || *index as usize > scan.records.len() {
                return Err(DeleteError::IndexOutOfRange {
                    index: *index,
                    len: scan.records.len(),
                });
            }
            Ok(scan.records[*index as usize - 1].path.clone())
        }
    }
}

/// Local removal collaborator: move to the OS trash unless `permanent`.
pub fn remove_local(path: &Path, permanent: bool) -> Result<(), String> {
    if permanent {
        fs::remove_file(path).map_err(|err| err.to_string())
    } else {
        trash::delete(path).map_err(|err| err.to_string())
    }
}

/// Delete (or pretend to delete) a batch of local records, reporting one
/// outcome per file.
pub fn clean_local(
    records: &[FileRecord],
    permanent: bool,
    dry_run: bool,
) -> Vec<DeletionOutcome> {
    records
        .iter()
        .map(|record| {
            if dry_run {
                return DeletionOutcome {
                    target: record.path.clone(),
                    path: Some(record.path.clone()),
                    ok: true,
                    error: None,
                };
            }
            match remove_local(Path::new(&record.path), permanent) {
                Ok(()) => {
                    info!("removed {}", record.path);
                    DeletionOutcome {
                        target: record.path.clone(),
                        path: Some(record.path.clone()),
                        ok: true,
                        error: None,
                    }
                }
                Err(err) => {
                    error!("failed to remove {}: {}", record.path, err);
                    DeletionOutcome {
                        target: record.path.clone(),
                        path: Some(record.path.clone()),
                        ok: false,
                        error: Some(DeleteError::Local(err)),
                    }
                }
            }
        })
        .collect()
}
