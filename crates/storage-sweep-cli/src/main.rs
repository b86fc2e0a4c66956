mod commands;
mod logging;
mod progress;
mod report;

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use colored::*;
use commands::{
    CleanArgs, CleanDeviceArgs, Cli, Commands, DeleteDeviceArgs, ScanArgs, ScanDeviceArgs,
};
use dotenv::dotenv;
use progress::CliReporter;
use storage_sweep_core::deletion;
use storage_sweep_core::engine::{self, ScanEngine, ScanOptions};
use storage_sweep_core::scanner;
use storage_sweep_core::util::{format_size, parse_size};
use storage_sweep_core::{AdbBridge, AppConfig, DeleteTarget, FileRecord, ScanStore};
use tracing::{error, warn};

fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match storage_sweep_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    match args.command {
        Some(Commands::Scan(args)) => {
            if let Err(err) = run_scan(&config, args) {
                error!("Error: {}", err);
            }
        }
        Some(Commands::Clean(args)) => {
            if let Err(err) = run_clean(&config, args) {
                error!("Error: {}", err);
            }
        }
        Some(Commands::ScanDevice(args)) => {
            if let Err(err) = run_scan_device(&config, args) {
                error!("Error: {}", err);
            }
        }
        Some(Commands::CleanDevice(args)) => {
            if let Err(err) = run_clean_device(&config, args) {
                error!("Error: {}", err);
            }
        }
        Some(Commands::DeleteDevice(args)) => {
            if let Err(err) = run_delete_device(&config, args) {
                error!("Error: {}", err);
            }
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }

    Ok(())
}

fn run_scan(config: &AppConfig, args: ScanArgs) -> Result<(), Box<dyn Error>> {
    let paths = local_paths(args.paths)?;
    let min_size = parse_size(args.min_size.as_deref().unwrap_or(&config.local_min_size))?;
    let extensions = split_csv(&args.extensions);
    let mut exclude_dirs = config.exclude_dirs.clone();
    exclude_dirs.extend(split_csv(&args.exclude_dirs));
    let top = args.top.unwrap_or(config.top);

    let shown_paths: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    println!(
        "Scanning {} (min size {})",
        shown_paths.join(", "),
        format_size(min_size)
    );

    let scan = scanner::collect_large_files(&paths, min_size, &extensions, &exclude_dirs)?;
    if scan.records.is_empty() {
        println!("{}", "No files found matching criteria.".yellow());
        return Ok(());
    }

    let shown: Vec<FileRecord> = scan.records.iter().take(top).cloned().collect();
    println!("{}", format!("Top {} files:", shown.len()).green());
    report::print_records(&shown, false);
    if scan.denied > 0 {
        println!(
            "{}",
            format!("{} entries skipped (permission denied)", scan.denied).yellow()
        );
    }

    if let Some(json_path) = args.json {
        report::write_json(&json_path, &scan.records)?;
        println!(
            "{}",
            format!("Saved report to {}", json_path.display()).blue()
        );
    }

    Ok(())
}

fn run_clean(config: &AppConfig, args: CleanArgs) -> Result<(), Box<dyn Error>> {
    let paths = local_paths(args.paths)?;
    let min_size = parse_size(args.min_size.as_deref().unwrap_or(&config.local_min_size))?;
    let extensions = split_csv(&args.extensions);
    let mut exclude_dirs = config.exclude_dirs.clone();
    exclude_dirs.extend(split_csv(&args.exclude_dirs));
    let top = args.top.unwrap_or(config.top);

    let scan = scanner::collect_large_files(&paths, min_size, &extensions, &exclude_dirs)?;
    let candidates: Vec<FileRecord> = scan.records.into_iter().take(top).collect();
    if candidates.is_empty() {
        println!("{}", "No candidates to delete.".yellow());
        return Ok(());
    }

    let verb = if args.permanent {
        "Local deletion candidates (PERMANENT):"
    } else {
        "Local candidates to move to trash:"
    };
    println!("{}", verb.red());
    report::print_records(&candidates, true);

    if args.dry_run {
        println!("{}", "Dry-run: no files will be removed.".yellow());
        return Ok(());
    }

    if !args.yes && !prompt_confirm("Remove the listed files?", Some(false))? {
        println!("{}", "Aborted.".yellow());
        return Ok(());
    }

    let outcomes = deletion::clean_local(&candidates, args.permanent, false);
    report::print_outcomes(&outcomes, false);

    let freed: u64 = outcomes
        .iter()
        .zip(&candidates)
        .filter(|(outcome, _)| outcome.ok)
        .map(|(_, record)| record.size_bytes)
        .sum();
    println!("Freed {}", format_size(freed).green());

    Ok(())
}

fn run_scan_device(config: &AppConfig, args: ScanDeviceArgs) -> Result<(), Box<dyn Error>> {
    let options = ScanOptions {
        root: args.root.unwrap_or_else(|| config.device_root.clone()),
        min_size_bytes: parse_size(args.min_size.as_deref().unwrap_or(&config.device_min_size))?,
        extensions: split_csv(&args.extensions),
        timeout: Duration::from_secs(config.shell_timeout_secs),
        max_depth: config.max_depth,
    };
    let top = args.top.unwrap_or(config.top);

    let bridge = AdbBridge::new();
    let engine = ScanEngine::new(&bridge, options);
    let reporter = CliReporter::new();
    let scan = engine.scan(&reporter)?;

    if scan.result.records.is_empty() {
        println!("{}", "No large files found on device.".yellow());
    } else {
        let shown: Vec<FileRecord> = scan.result.records.iter().take(top).cloned().collect();
        println!(
            "{}",
            format!(
                "Top {} files on device (via {}):",
                shown.len(),
                scan.result.strategy_used
            )
            .green()
        );
        report::print_records(&shown, true);
    }
    if scan.skipped_lines > 0 || scan.denied_entries > 0 {
        println!(
            "{}",
            format!(
                "{} lines skipped, {} entries permission-denied",
                scan.skipped_lines, scan.denied_entries
            )
            .yellow()
        );
    }

    let store = ScanStore::default_location()?;
    store.save(&scan.result)?;
    println!(
        "{}",
        format!("Saved last scan to {}", store.path().display()).blue()
    );

    if let Some(json_path) = args.json {
        report::write_json(&json_path, &scan.result.records)?;
        println!(
            "{}",
            format!("Saved device report to {}", json_path.display()).blue()
        );
    }

    Ok(())
}

fn run_clean_device(config: &AppConfig, args: CleanDeviceArgs) -> Result<(), Box<dyn Error>> {
    let bridge = AdbBridge::new();
    let timeout = Duration::from_secs(config.shell_timeout_secs);
    let extensions = split_csv(&args.extensions);
    let top = args.top.unwrap_or(config.top);

    let mut candidates: Vec<FileRecord> = Vec::new();
    if args.paths.is_empty() {
        let options = ScanOptions {
            root: config.device_root.clone(),
            min_size_bytes: parse_size(
                args.min_size.as_deref().unwrap_or(&config.device_min_size),
            )?,
            extensions: extensions.clone(),
            timeout,
            max_depth: config.max_depth,
        };
        let engine = ScanEngine::new(&bridge, options);
        let scan = engine.scan(&CliReporter::new())?;
        candidates = scan.result.records;
    } else {
        for path in &args.paths {
            match engine::stat_size(&bridge, path, timeout) {
                Some(size) => candidates.push(FileRecord {
                    path: path.clone(),
                    size_bytes: size,
                }),
                None => println!("{}", format!("Could not stat {}; skipping.", path).yellow()),
            }
        }
        if !extensions.is_empty() {
            candidates.retain(|record| {
                let lower = record.path.to_ascii_lowercase();
                extensions
                    .iter()
                    .any(|ext| lower.ends_with(&ext.to_ascii_lowercase()))
            });
        }
        candidates.sort_by(|a, b| {
            b.size_bytes
                .cmp(&a.size_bytes)
                .then_with(|| a.path.cmp(&b.path))
        });
    }

    candidates.truncate(top);
    if candidates.is_empty() {
        println!("{}", "No candidates to delete on device.".yellow());
        return Ok(());
    }

    println!("{}", "Device deletion candidates (PERMANENT):".red());
    report::print_records(&candidates, true);

    if args.dry_run {
        println!("{}", "Dry-run: no files will be removed.".yellow());
        return Ok(());
    }

    if !args.yes
        && !prompt_confirm(
            "Permanently delete the listed files on the device?",
            Some(false),
        )?
    {
        println!("{}", "Aborted.".yellow());
        return Ok(());
    }

    let targets: Vec<DeleteTarget> = candidates
        .iter()
        .map(|record| DeleteTarget::Path(record.path.clone()))
        .collect();
    let outcomes = deletion::delete_on_device(&bridge, None, &targets, timeout, false);
    report::print_outcomes(&outcomes, false);

    Ok(())
}

fn run_delete_device(config: &AppConfig, args: DeleteDeviceArgs) -> Result<(), Box<dyn Error>> {
    let mut targets: Vec<DeleteTarget> = flatten_indices(&args.indices)
        .into_iter()
        .map(DeleteTarget::Index)
        .collect();
    targets.extend(args.paths.iter().cloned().map(DeleteTarget::Path));

    if targets.is_empty() {
        println!("{}", "No files selected for deletion.".yellow());
        return Ok(());
    }

    let store = ScanStore::default_location()?;
    let last_scan = store.load().ok();

    let bridge = AdbBridge::new();
    let timeout = Duration::from_secs(config.shell_timeout_secs);

    // Resolve everything first so the user confirms concrete paths.
    let preview = deletion::delete_on_device(&bridge, last_scan.as_ref(), &targets, timeout, true);
    println!("{}", "Selected files for deletion (PERMANENT):".red());
    report::print_preview(&preview, last_scan.as_ref());

    if args.dry_run {
        println!("{}", "Dry-run: no files will be removed.".yellow());
        return Ok(());
    }

    if !args.yes
        && !prompt_confirm(
            "Permanently delete the listed files on the device?",
            Some(false),
        )?
    {
        println!("{}", "Aborted.".yellow());
        return Ok(());
    }

    let outcomes = deletion::delete_on_device(&bridge, last_scan.as_ref(), &targets, timeout, false);
    report::print_outcomes(&outcomes, false);

    if outcomes.iter().any(|outcome| outcome.ok) {
        // The saved scan keeps its pre-deletion indices; warn rather than
        // silently rewriting history.
        println!(
            "{}",
            "Note: the saved scan still reflects pre-deletion state; re-scan before deleting by index again.".yellow()
        );
    }

    Ok(())
}

fn local_paths(paths: Vec<PathBuf>) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    if paths.is_empty() {
        let home =
            storage_sweep_core::util::home_dir().ok_or("could not determine home directory")?;
        Ok(vec![home])
    } else {
        Ok(paths)
    }
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn flatten_indices(values: &[String]) -> Vec<i64> {
    let mut indices = Vec::new();
    for value in values {
        for token in value.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match token.parse::<i64>() {
                Ok(index) => indices.push(index),
                Err(_) => warn!("ignoring unparseable index '{}'", token),
            }
        }
    }
    indices
}

fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        io::stdin().read_line(&mut input)?;

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
