use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::bridge::{quote, Bridge};
use crate::error::{BridgeError, Error};
use crate::model::{FileRecord, ScanResult, StrategyKind};
use crate::parse::{ls, ParsedListing};
use crate::progress::ProgressReporter;

/// Batch strategies in fallback priority order; the per-directory walk is
/// the last resort after all of these.
const BATCH_CHAIN: [StrategyKind; 3] = [
    StrategyKind::Find,
    StrategyKind::Stat,
    StrategyKind::LsRecursive,
];

/// Worker bound for the per-directory fallback. Listings are independent,
/// but the device bridge does not benefit from wide fan-out.
const PER_DIR_WORKERS: usize = 4;

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub root: String,
    pub min_size_bytes: u64,
    /// Case-insensitive filename suffixes; empty means no filter.
    pub extensions: Vec<String>,
    pub timeout: Duration,
    /// Depth bound for the per-directory fallback, guarding against
    /// filesystem loops via symlinked directories.
    pub max_depth: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            root: "/sdcard".to_string(),
            min_size_bytes: 0,
            extensions: Vec::new(),
            timeout: Duration::from_secs(120),
            max_depth: 8,
        }
    }
}

/// A completed device scan plus the diagnostics the report layer surfaces.
#[derive(Debug)]
pub struct DeviceScan {
    pub result: ScanResult,
    pub skipped_lines: usize,
    pub denied_entries: usize,
    pub duration: Duration,
}

/// Drives the enumeration strategies against one attached device.
pub struct ScanEngine<'a> {
    bridge: &'a dyn Bridge,
    options: ScanOptions,
}

impl<'a> ScanEngine<'a> {
    pub fn new(bridge: &'a dyn Bridge, options: ScanOptions) -> Self {
        Self { bridge, options }
    }

    /// Try each strategy in priority order and stop at the first that
    /// yields records. Exhausting every strategy with nothing found is an
    /// empty result, not an error; only connectivity failures abort.
    pub fn scan(&self, reporter: &dyn ProgressReporter) -> Result<DeviceScan, Error> {
        let start = Instant::now();
        reporter.on_scan_start();

        let mut skipped = 0usize;
        let mut denied = 0usize;

        for kind in BATCH_CHAIN {
            let Some(command) = kind.command(&self.options.root) else {
                continue;
            };
            reporter.on_strategy_start(kind);

            match self.bridge.shell(&command, self.options.timeout) {
                Ok(output) => {
                    let listing = kind.parse(&output, &self.options.root);
                    skipped += listing.skipped;
                    denied += listing.denied;
                    if listing.records.is_empty() {
                        debug!("{} strategy found nothing, falling back", kind);
                        reporter.on_strategy_end(kind, 0);
                        continue;
                    }
                    reporter.on_strategy_end(kind, listing.records.len());
                    return Ok(self.finish(kind, listing.records, skipped, denied, start, reporter));
                }
                Err(err) if err.is_fatal() => return Err(err.into()),
                Err(err) => {
                    warn!("{} strategy failed: {}", kind, err);
                    reporter.on_strategy_end(kind, 0);
                }
            }
        }

        // Last resort: walk the tree one directory listing at a time.
        reporter.on_strategy_start(StrategyKind::PerDirectory);
        let listing = self.per_directory()?;
        skipped += listing.skipped;
        denied += listing.denied;
        reporter.on_strategy_end(StrategyKind::PerDirectory, listing.records.len());

        Ok(self.finish(
            StrategyKind::PerDirectory,
            listing.records,
            skipped,
            denied,
            start,
            reporter,
        ))
    }

    fn finish(
        &self,
        strategy: StrategyKind,
        records: Vec<FileRecord>,
        skipped: usize,
        denied: usize,
        start: Instant,
        reporter: &dyn ProgressReporter,
    ) -> DeviceScan {
        let records = rank(records, &self.options);
        let duration = start.elapsed();
        info!(
            "device scan via {}: {} records, {} lines skipped, {} denied, {:.2}s",
            strategy,
            records.len(),
            skipped,
            denied,
            duration.as_secs_f64(),
        );
        reporter.on_scan_complete(records.len(), duration.as_secs_f64());

        DeviceScan {
            result: ScanResult {
                records,
                strategy_used: strategy,
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
            skipped_lines: skipped,
            denied_entries: denied,
            duration,
        }
    }

    /// Breadth-first per-directory enumeration, bounded by `max_depth`.
    /// Listings within a level run on a small worker pool; the shared
    /// accumulator is the mutual-exclusion boundary.
    fn per_directory(&self) -> Result<ParsedListing, Error> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(PER_DIR_WORKERS)
            .build()
            .map_err(|err| Error::Other(err.to_string()))?;

        let files: Mutex<Vec<FileRecord>> = Mutex::new(Vec::new());
        let skipped = AtomicUsize::new(0);
        let denied = AtomicUsize::new(0);
        let fatal: Mutex<Option<BridgeError>> = Mutex::new(None);

        let mut frontier = vec![self.options.root.trim_end_matches('/').to_string()];
        let mut depth = 0;

        while !frontier.is_empty() && depth < self.options.max_depth {
            if fatal.lock().unwrap().is_some() {
                break;
            }
            let next: Vec<String> = pool.install(|| {
                frontier
                    .par_iter()
                    .flat_map(|dir| self.list_one(dir, &files, &skipped, &denied, &fatal))
                    .collect()
            });
            frontier = next;
            depth += 1;
        }

        if let Some(err) = fatal.into_inner().unwrap_or(None) {
            return Err(err.into());
        }

        Ok(ParsedListing {
            records: files.into_inner().unwrap_or_default(),
            skipped: skipped.into_inner(),
            denied: denied.into_inner(),
        })
    }

    fn list_one(
        &self,
        dir: &str,
        files: &Mutex<Vec<FileRecord>>,
        skipped: &AtomicUsize,
        denied: &AtomicUsize,
        fatal: &Mutex<Option<BridgeError>>,
    ) -> Vec<String> {
        let command = format!("ls -l {}", quote(dir));
        match self.bridge.shell(&command, self.options.timeout) {
            Ok(output) => {
                let listing = ls::parse_dir_listing(&output, dir);
                skipped.fetch_add(listing.skipped, Ordering::Relaxed);
                denied.fetch_add(listing.denied, Ordering::Relaxed);
                files.lock().unwrap().extend(listing.files);
                listing.subdirs
            }
            Err(err) if err.is_fatal() => {
                fatal.lock().unwrap().get_or_insert(err);
                Vec::new()
            }
            Err(err) => {
                warn!("listing {} failed: {}", dir, err);
                Vec::new()
            }
        }
    }
}

/// Size of one explicit device path: `stat -c %s` first, then a parse of
/// `ls -l` output for shells without stat.
pub fn stat_size(bridge: &dyn Bridge, path: &str, timeout: Duration) -> Option<u64> {
    match bridge.shell(&format!("stat -c %s {}", quote(path)), timeout) {
        Ok(output) => {
            if let Ok(size) = output.trim().parse::<u64>() {
                return Some(size);
            }
        }
        Err(err) if err.is_fatal() => return None,
        Err(_) => {}
    }

    let parent = path.rsplit_once('/').map(|(p, _)| p).unwrap_or("/");
    match bridge.shell(&format!("ls -l {}", quote(path)), timeout) {
        Ok(output) => ls::parse_dir_listing(&output, parent)
            .files
            .first()
            .map(|record| record.size_bytes),
        Err(err) => {
            warn!("could not stat {}: {}", path, err);
            None
        }
    }
}

/// Deduplicate by path (first discovery wins), drop records below the
/// threshold or outside the extension filter, then sort by size
/// descending with path ascending as the deterministic tie-break.
fn rank(records: Vec<FileRecord>, options: &ScanOptions) -> Vec<FileRecord> {
    let mut seen = HashSet::new();
    let mut kept: Vec<FileRecord> = records
        .into_iter()
        .filter(|r| seen.insert(r.path.clone()))
        .filter(|r| r.size_bytes >= options.min_size_bytes)
        .filter(|r| matches_extensions(&r.path, &options.extensions))
        .collect();
    kept.sort_by(|a, b| {
        b.size_bytes
            .cmp(&a.size_bytes)
            .then_with(|| a.path.cmp(&b.path))
    });
    kept
}

fn matches_extensions(path: &str, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    let lower = path.to_ascii_lowercase();
    extensions
        .iter()
        .any(|ext| lower.ends_with(&ext.to_ascii_lowercase()))
}
