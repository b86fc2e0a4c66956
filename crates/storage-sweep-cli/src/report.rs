use std::fs;
use std::io;
use std::path::Path;

use colored::*;
use storage_sweep_core::util::format_size;
use storage_sweep_core::{DeletionOutcome, FileRecord, ScanResult};

/// Print a ranked table, optionally with the 1-based indices used by
/// delete-by-index.
pub fn print_records(records: &[FileRecord], indexed: bool) {
    for (i, record) in records.iter().enumerate() {
        let size = format!("{:>10}", format_size(record.size_bytes));
        if indexed {
            println!("[{}] {}    {}", i + 1, size.green(), record.path);
        } else {
            println!("{}    {}", size.green(), record.path);
        }
    }
}

/// Write the full (untrimmed) record set as JSON.
pub fn write_json(path: &Path, records: &[FileRecord]) -> io::Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)
}

/// Show resolved deletion candidates before confirmation, with sizes when
/// the saved scan knows them.
pub fn print_preview(outcomes: &[DeletionOutcome], last_scan: Option<&ScanResult>) {
    for outcome in outcomes {
        match (&outcome.path, &outcome.error) {
            (Some(path), _) => {
                let size = last_scan
                    .and_then(|scan| scan.records.iter().find(|r| &r.path == path))
                    .map(|r| format_size(r.size_bytes))
                    .unwrap_or_else(|| "?".to_string());
                println!("{:>10}    {}", size.green(), path);
            }
            (None, Some(err)) => {
                println!("{} {}: {}", "cannot resolve".yellow(), outcome.target, err);
            }
            (None, None) => {}
        }
    }
}

pub fn print_outcomes(outcomes: &[DeletionOutcome], dry_run: bool) {
    let mut deleted = 0usize;
    let mut failed = 0usize;

    for outcome in outcomes {
        if outcome.ok {
            deleted += 1;
            let path = outcome.path.as_deref().unwrap_or(&outcome.target);
            if dry_run {
                println!("{} {}", "would delete:".yellow(), path);
            } else {
                println!("{} {}", "deleted:".green(), path);
            }
        } else {
            failed += 1;
            let detail = outcome
                .error
                .as_ref()
                .map(|err| err.to_string())
                .unwrap_or_default();
            println!("{} {}: {}", "failed:".red(), outcome.target, detail);
        }
    }

    if !dry_run {
        println!("{} deleted, {} failed", deleted, failed);
    }
}
