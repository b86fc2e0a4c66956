use std::sync::Mutex;
use std::time::Duration;

use storage_sweep_core::bridge::Bridge;
use storage_sweep_core::deletion::delete_on_device;
use storage_sweep_core::error::{BridgeError, DeleteError};
use storage_sweep_core::{DeleteTarget, FileRecord, ScanResult, StrategyKind};

/// Accepts every command and records it.
struct RecordingBridge {
    commands: Mutex<Vec<String>>,
}

impl RecordingBridge {
    fn new() -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
        }
    }

    fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

impl Bridge for RecordingBridge {
    fn shell(&self, command: &str, _timeout: Duration) -> Result<String, BridgeError> {
        self.commands.lock().unwrap().push(command.to_string());
        Ok(String::new())
    }
}

fn saved_scan(paths: &[&str]) -> ScanResult {
    ScanResult {
        records: paths
            .iter()
            .enumerate()
            .map(|(i, path)| FileRecord {
                path: path.to_string(),
                size_bytes: 1000 - i as u64,
            })
            .collect(),
        strategy_used: StrategyKind::Find,
        timestamp: "2026-08-06T10:00:00+00:00".to_string(),
    }
}

const TIMEOUT: Duration = Duration::from_secs(5);

#[test]
fn index_resolves_against_saved_order() {
    let bridge = RecordingBridge::new();
    let scan = saved_scan(&["/sdcard/first.bin", "/sdcard/second.bin"]);

    let outcomes = delete_on_device(
        &bridge,
        Some(&scan),
        &[DeleteTarget::Index(2)],
        TIMEOUT,
        false,
    );

    assert!(outcomes[0].ok);
    assert_eq!(outcomes[0].path.as_deref(), Some("/sdcard/second.bin"));
    assert_eq!(bridge.commands(), vec!["rm -f /sdcard/second.bin"]);
}

#[test]
fn out_of_range_and_non_positive_indices_fail() {
    let bridge = RecordingBridge::new();
    let scan = saved_scan(&["/sdcard/only.bin"]);

    for bad in [0i64, -3, 2] {
        let outcomes = delete_on_device(
            &bridge,
            Some(&scan),
            &[DeleteTarget::Index(bad)],
            TIMEOUT,
            false,
        );
        assert!(!outcomes[0].ok);
        assert!(matches!(
            outcomes[0].error,
            Some(DeleteError::IndexOutOfRange { index, len: 1 }) if index == bad
        ));
    }
    assert!(bridge.commands().is_empty());
}

#[test]
fn indexing_without_a_saved_scan_fails_per_target() {
    let bridge = RecordingBridge::new();

    let outcomes = delete_on_device(&bridge, None, &[DeleteTarget::Index(1)], TIMEOUT, false);

    assert!(!outcomes[0].ok);
    assert!(matches!(outcomes[0].error, Some(DeleteError::NoPriorScan)));
}

#[test]
fn one_bad_target_does_not_abort_the_batch() {
    let bridge = RecordingBridge::new();
    let scan = saved_scan(&["/sdcard/a.bin"]);

    let targets = [
        DeleteTarget::Path("/sdcard/x.bin".to_string()),
        DeleteTarget::Index(99),
        DeleteTarget::Path("/sdcard/y.bin".to_string()),
    ];
    let outcomes = delete_on_device(&bridge, Some(&scan), &targets, TIMEOUT, false);

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].ok);
    assert!(!outcomes[1].ok);
    assert!(matches!(
        outcomes[1].error,
        Some(DeleteError::IndexOutOfRange { .. })
    ));
    assert!(outcomes[2].ok);
    assert_eq!(
        bridge.commands(),
        vec!["rm -f /sdcard/x.bin", "rm -f /sdcard/y.bin"]
    );
}

#[test]
fn dry_run_resolves_but_issues_no_commands() {
    let bridge = RecordingBridge::new();
    let scan = saved_scan(&["/sdcard/a.bin"]);

    let targets = [
        DeleteTarget::Index(1),
        DeleteTarget::Path("/sdcard/b.bin".to_string()),
    ];
    let outcomes = delete_on_device(&bridge, Some(&scan), &targets, TIMEOUT, true);

    assert!(outcomes.iter().all(|o| o.ok));
    assert_eq!(outcomes[0].path.as_deref(), Some("/sdcard/a.bin"));
    assert!(bridge.commands().is_empty());
}

#[test]
fn paths_with_spaces_are_quoted_in_the_removal_command() {
    let bridge = RecordingBridge::new();

    let targets = [DeleteTarget::Path("/sdcard/file name.zip".to_string())];
    delete_on_device(&bridge, None, &targets, TIMEOUT, false);

    assert_eq!(bridge.commands(), vec!["rm -f '/sdcard/file name.zip'"]);
}
