use super::ParsedListing;
use crate::model::FileRecord;

/// Parse `find -printf '%p %s'` style output: one file per line, path
/// first (it may contain spaces), byte size as the final
/// whitespace-delimited token.
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

        let parsed = line.rsplit_once(char::is_whitespace).and_then(|(path, size)| {
            let path = path.trim_end();
            let size: u64 = size.parse().ok()?;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_path_then_size() {
        let out = "/sdcard/DCIM/img.jpg 10485760\n/sdcard/Download/file name.zip 2048\n";
        let listing = parse(out);
        assert_eq!(listing.skipped, 0);
        assert_eq!(
            listing.records,
            vec![
                FileRecord {
                    path: "/sdcard/DCIM/img.jpg".into(),
                    size_bytes: 10_485_760,
                },
                FileRecord {
                    path: "/sdcard/Download/file name.zip".into(),
                    size_bytes: 2048,
                },
            ]
        );
    }

    #[test]
    fn counts_malformed_lines() {
        let out = "/sdcard/a.mp4 100\nnot a valid line\n/sdcard/b.mp4 200\n";
        let listing = parse(out);
        assert_eq!(listing.records.len(), 2);
        assert_eq!(listing.skipped, 1);
    }

    #[test]
    fn empty_input_is_zero_records_not_failure() {
        let listing = parse("");
        assert!(listing.records.is_empty());
        assert_eq!(listing.skipped, 0);
    }

    #[test]
    fn counts_permission_denied_lines() {
        let out = "find: /sdcard/Android/data: Permission denied\n/sdcard/ok.bin 42\n";
        let listing = parse(out);
        assert_eq!(listing.denied, 1);
        assert_eq!(listing.records.len(), 1);
    }

    #[test]
    fn zero_size_files_are_kept() {
        let listing = parse("/sdcard/empty.txt 0\n");
        assert_eq!(listing.records[0].size_bytes, 0);
    }
}
