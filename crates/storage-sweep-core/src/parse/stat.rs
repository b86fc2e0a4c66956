use super::ParsedListing;
use crate::model::FileRecord;

/// Parse batched `stat -c '%s %n'` output: one fixed-format line per
/// file, byte size first, then the path (which may contain spaces).
pub fn parse(output: &str) -> ParsedListing {
    let mut listing = ParsedListing::default();

    for raw in output.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if super::is_denied(line) {
            listing.denied += 1;
            continue;
        }

        let parsed = line.split_once(char::is_whitespace).and_then(|(size, path)| {
            let size: u64 = size.parse().ok()?;
            let path = path.trim();
            if path.is_empty() {
                return None;
            }
            Some(FileRecord {
                path: path.to_string(),
                size_bytes: size,
            })
        });

        match parsed {
            Some(record) => listing.records.push(record),
            None => listing.skipped += 1,
        }
    }

    listing
}
