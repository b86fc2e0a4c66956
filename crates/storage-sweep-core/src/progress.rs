use crate::model::StrategyKind;

/// Trait for reporting device-scan progress.
///
/// The CLI implements this with indicatif spinners; tests and library
/// callers use the silent implementation. All methods have default no-op
/// implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self) {}
    fn on_strategy_start(&self, _strategy: StrategyKind) {}
    fn on_strategy_end(&self, _strategy: StrategyKind, _records: usize) {}
    fn on_scan_complete(&self, _records: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
