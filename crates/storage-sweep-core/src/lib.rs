pub mod bridge;
pub mod config;
pub mod deletion;
pub mod engine;
pub mod error;
pub mod model;
pub mod parse;
pub mod progress;
pub mod scanner;
pub mod store;
pub mod util;

pub use bridge::{AdbBridge, Bridge};
pub use config::AppConfig;
pub use engine::{DeviceScan, ScanEngine, ScanOptions};
pub use error::{BridgeError, DeleteError, Error};
pub use model::{DeleteTarget, DeletionOutcome, FileRecord, ScanResult, StrategyKind};
pub use progress::{ProgressReporter, SilentReporter};
pub use store::ScanStore;
