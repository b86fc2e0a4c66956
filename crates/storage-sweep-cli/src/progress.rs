use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use storage_sweep_core::{ProgressReporter, StrategyKind};

/// CLI progress reporter: one spinner across the scan, its message
/// tracking the strategy currently being tried.
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn finish_bar(&self) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.set_message("Listing files on device (this may take a while)...");
        pb.enable_steady_tick(Duration::from_millis(80));
        *self.bar.lock().unwrap() = Some(pb);
    }

    fn on_strategy_start(&self, strategy: StrategyKind) {
        let guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.as_ref() {
            pb.set_message(format!("Trying {} enumeration...", strategy));
        }
    }

    fn on_strategy_end(&self, strategy: StrategyKind, records: usize) {
        if records == 0 {
            let guard = self.bar.lock().unwrap();
            if let Some(pb) = guard.as_ref() {
                pb.set_message(format!("{} found nothing, falling back...", strategy));
            }
        }
    }

    fn on_scan_complete(&self, records: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Device scan complete: {} files in {:.2}s",
            records, duration_secs
        );
    }
}
