mod walk;

pub use walk::{collect_large_files, LocalScan};
