use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rayon::prelude::*;
use tracing::warn;

use crate::model::FileRecord;

/// Result of a local walk: matching records ranked largest-first, plus
/// the number of entries skipped for lack of permission.
#[derive(Debug)]
pub struct LocalScan {
    pub records: Vec<FileRecord>,
    pub denied: usize,
}

/// Parallel traversal of local roots collecting regular files at or above
/// `min_size`. Symlinks are never followed; directories whose name appears
/// in `exclude_dirs` are pruned; permission failures are counted, not fatal.
pub fn collect_large_files(
    roots: &[PathBuf],
    min_size: u64,
    extensions: &[String],
    exclude_dirs: &[String],
) -> io::Result<LocalScan> {
    let records: Mutex<Vec<FileRecord>> = Mutex::new(Vec::new());
    let denied = AtomicUsize::new(0);

    roots.par_iter().try_for_each(|root| {
        if root.is_file() {
            consider_file(root, min_size, extensions, &records, &denied);
            return Ok(());
        }
        visit_dirs(root, min_size, extensions, exclude_dirs, &records, &denied)
    })?;

    let mut records = records.into_inner().unwrap_or_default();
    records.sort_by(|a, b| {
        b.size_bytes
            .cmp(&a.size_bytes)
            .then_with(|| a.path.cmp(&b.path))
    });

    Ok(LocalScan {
        records,
        denied: denied.into_inner(),
    })
}

fn visit_dirs(
    dir: &Path,
    min_size: u64,
    extensions: &[String],
    exclude_dirs: &[String],
    records: &Mutex<Vec<FileRecord>>,
    denied: &AtomicUsize,
) -> io::Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            denied.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => {
            return Err(io::Error::new(
                err.kind(),
                format!("reading directory {}: {}", dir.display(), err),
            ))
        }
    };

    entries.par_bridge().try_for_each(|entry_result| {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping entry in {}: {}", dir.display(), err);
                return Ok(());
            }
        };

        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(err) => {
                warn!("skipping {}: {}", entry.path().display(), err);
                return Ok(());
            }
        };

        if file_type.is_symlink() {
            return Ok(());
        }

        let path = entry.path();
        if file_type.is_dir() {
            let name = entry.file_name();
            if exclude_dirs.iter().any(|ex| name == ex.as_str()) {
                return Ok(());
            }
            return visit_dirs(&path, min_size, extensions, exclude_dirs, records, denied);
        }

        if file_type.is_file() {
            consider_file(&path, min_size, extensions, records, denied);
        }
        Ok(())
    })
}

fn consider_file(
    path: &Path,
    min_size: u64,
    extensions: &[String],
    records: &Mutex<Vec<FileRecord>>,
    denied: &AtomicUsize,
) {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(err) => {
            if err.kind() == io::ErrorKind::PermissionDenied {
                denied.fetch_add(1, Ordering::Relaxed);
            }
            return;
        }
    };

    let size = metadata.len();
    if size < min_size {
        return;
    }

    let display = path.to_string_lossy().into_owned();
    if !extensions.is_empty() {
        let lower = display.to_ascii_lowercase();
        if !extensions
            .iter()
            .any(|ext| lower.ends_with(&ext.to_ascii_lowercase()))
        {
            return;
        }
    }

    records.lock().unwrap().push(FileRecord {
        path: display,
        size_bytes: size,
    });
}
