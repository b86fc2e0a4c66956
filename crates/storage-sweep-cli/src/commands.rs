use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "storage-sweep")]
#[command(about = "Find and clean the largest files, locally or on an Android device", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan local paths for large files
    Scan(ScanArgs),
    /// Scan local paths and move the largest files to the trash
    Clean(CleanArgs),
    /// Scan the attached device for large files and save the result
    ScanDevice(ScanDeviceArgs),
    /// Scan the device and delete the largest files found
    CleanDevice(CleanDeviceArgs),
    /// Delete device files by saved-scan index or explicit path
    DeleteDevice(DeleteDeviceArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Paths to scan (defaults to the home directory)
    pub paths: Vec<PathBuf>,

    /// Minimum file size to report (e.g. 100MB, 2GB)
    #[arg(long)]
    pub min_size: Option<String>,

    /// Comma-separated extensions to include (e.g. .mp4,.zip)
    #[arg(long, default_value = "")]
    pub extensions: String,

    /// Comma-separated directory names to exclude (e.g. .cache,node_modules)
    #[arg(long, default_value = "")]
    pub exclude_dirs: String,

    /// Show the top N largest files
    #[arg(long)]
    pub top: Option<usize>,

    /// Write the full report as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Paths to scan (defaults to the home directory)
    pub paths: Vec<PathBuf>,

    /// Minimum file size to consider (e.g. 100MB, 2GB)
    #[arg(long)]
    pub min_size: Option<String>,

    /// Comma-separated extensions to include
    #[arg(long, default_value = "")]
    pub extensions: String,

    /// Comma-separated directory names to exclude
    #[arg(long, default_value = "")]
    pub exclude_dirs: String,

    /// Consider only the top N files for deletion
    #[arg(long)]
    pub top: Option<usize>,

    /// Permanently delete instead of moving to the trash
    #[arg(long)]
    pub permanent: bool,

    /// Do not prompt before deleting
    #[arg(long)]
    pub yes: bool,

    /// Show what would be deleted without deleting
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct ScanDeviceArgs {
    /// Root path on the device to scan
    #[arg(long)]
    pub root: Option<String>,

    /// Minimum file size to report (e.g. 50MB)
    #[arg(long)]
    pub min_size: Option<String>,

    /// Comma-separated extensions to include
    #[arg(long, default_value = "")]
    pub extensions: String,

    /// Show the top N largest files
    #[arg(long)]
    pub top: Option<usize>,

    /// Write the full report as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CleanDeviceArgs {
    /// Explicit device paths to delete; scans the device when omitted
    pub paths: Vec<String>,

    /// Minimum file size to consider (scan mode)
    #[arg(long)]
    pub min_size: Option<String>,

    /// Comma-separated extensions to include
    #[arg(long, default_value = "")]
    pub extensions: String,

    /// Consider only the top N files for deletion
    #[arg(long)]
    pub top: Option<usize>,

    /// Do not prompt before deleting
    #[arg(long)]
    pub yes: bool,

    /// Show what would be deleted without deleting
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct DeleteDeviceArgs {
    /// 1-based index from the last saved scan; repeatable, accepts
    /// comma-separated lists (e.g. --index 2 --index 5,7)
    #[arg(long = "index")]
    pub indices: Vec<String>,

    /// Exact device path to delete; repeatable
    #[arg(long = "path")]
    pub paths: Vec<String>,

    /// Do not prompt before deleting
    #[arg(long)]
    pub yes: bool,

    /// Show what would be deleted without deleting
    #[arg(long)]
    pub dry_run: bool,
}
