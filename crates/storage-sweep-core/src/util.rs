use std::path::PathBuf;

use crate::error::Error;

/// Home directory, the default local scan root.
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}

const SUFFIXES: &[(&str, u64)] = &[
    ("GB", 1 << 30),
    ("MB", 1 << 20),
    ("KB", 1 << 10),
    ("G", 1 << 30),
    ("M", 1 << 20),
    ("K", 1 << 10),
    ("B", 1),
];

/// Parse a human-readable size ("100MB", "2G", "512") into bytes.
/// Bare numbers are bytes.
pub fn parse_size(input: &str) -> Result<u64, Error> {
    let upper = input.trim().to_ascii_uppercase();

    let mut num_str = upper.as_str();
    let mut multiplier = 1u64;
    for (suffix, mult) in SUFFIXES {
        if let Some(n) = upper.strip_suffix(suffix) {
            num_str = n;
            multiplier = *mult;
            break;
        }
    }

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| Error::InvalidSize(input.to_string()))?;
    if num < 0.0 {
        return Err(Error::InvalidSize(input.to_string()));
    }

    Ok((num * multiplier as f64) as u64)
}

/// Format a byte count for display.
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1 << 30 {
        format!("{:.2} GB", bytes as f64 / (1u64 << 30) as f64)
    } else if bytes >= 1 << 20 {
        format!("{:.2} MB", bytes as f64 / (1u64 << 20) as f64)
    } else if bytes >= 1 << 10 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_suffixed_sizes() {
        assert_eq!(parse_size("100MB").unwrap(), 100 * 1024 * 1024);
        assert_eq!(parse_size("100M").unwrap(), 100 * 1024 * 1024);
        assert_eq!(parse_size("2gb").unwrap(), 2 * 1024 * 1024 * 1024);
        assert_eq!(parse_size("512").unwrap(), 512);
        assert_eq!(parse_size("1.5K").unwrap(), 1536);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_size("lots").is_err());
        assert!(parse_size("-5MB").is_err());
    }

    #[test]
    fn formats_round_trip_magnitudes() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(10 * 1024 * 1024), "10.00 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }
}
