use super::ParsedListing;
use crate::model::FileRecord;

/// One classified line of `ls -l` output.
enum Entry {
    File { name: String, size: u64 },
    Dir { name: String },
    /// Symlinks, `total` lines, blanks: excluded without being an error.
    Ignored,
    Denied,
    Malformed,
}

/// Files and subdirectories of a single `ls -l <dir>` listing, used by
/// the per-directory fallback strategy.
#[derive(Debug, Default)]
pub struct DirListing {
    pub files: Vec<FileRecord>,
    pub subdirs: Vec<String>,
    pub skipped: usize,
    pub denied: usize,
}

/// Parse recursive `ls -lR` output. Directory header lines (`/path:`)
/// switch the current directory; entry lines resolve against it.
pub fn parse_recursive(output: &str, root: &str) -> ParsedListing {
    let mut listing = ParsedListing::default();
    let mut current_dir = root.trim_end_matches('/').to_string();

    for raw in output.lines() {
        let line = raw.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        if let Some(header) = line.strip_suffix(':') {
            if header.starts_with('/') {
                current_dir = header.trim_end_matches('/').to_string();
                continue;
            }
        }

        match classify(line.trim()) {
            Entry::File { name, size } => listing.records.push(FileRecord {
                path: join_path(&current_dir, &name),
                size_bytes: size,
            }),
            Entry::Dir { .. } | Entry::Ignored => {}
            Entry::Denied => listing.denied += 1,
            Entry::Malformed => listing.skipped += 1,
        }
    }

    listing
}

/// Parse one non-recursive `ls -l <dir>` listing into files and subdirs.
pub fn parse_dir_listing(output: &str, dir: &str) -> DirListing {
    let mut listing = DirListing::default();

    for raw in output.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        match classify(line) {
            Entry::File { name, size } => listing.files.push(FileRecord {
                path: join_path(dir, &name),
                size_bytes: size,
            }),
            Entry::Dir { name } => listing.subdirs.push(join_path(dir, &name)),
            Entry::Ignored => {}
            Entry::Denied => listing.denied += 1,
            Entry::Malformed => listing.skipped += 1,
        }
    }

    listing
}

fn classify(line: &str) -> Entry {
    if line.starts_with("total ") || line == "total" {
        return Entry::Ignored;
    }
    if super::is_denied(line) {
        return Entry::Denied;
    }

    let mode = match line.chars().next() {
        Some(c) => c,
        None => return Entry::Ignored,
    };

    match mode {
        // Only regular files are counted; symlinks and specials excluded.
        'l' | 'c' | 'b' | 'p' | 's' => Entry::Ignored,
        '-' => {
            let parts: Vec<&str> = line.split_whitespace().collect();
            match size_and_name(&parts) {
                Some((size, name)) => Entry::File { name, size },
                None => Entry::Malformed,
            }
        }
        'd' => {
            let parts: Vec<&str> = line.split_whitespace().collect();
            match size_and_name(&parts) {
                Some((_, name)) => Entry::Dir { name },
                None => Entry::Malformed,
            }
        }
        _ => Entry::Malformed,
    }
}

/// Extract the size and name tokens from a long-listing entry line.
///
/// Toybox shape: `perms links owner group size YYYY-MM-DD HH:MM name`.
/// Anything else falls back to first-plausible-numeric-token scanning, so
/// vendor shells with odd date formats still resolve.
fn size_and_name(parts: &[&str]) -> Option<(u64, String)> {
    if parts.len() >= 8 {
        if let Ok(size) = parts[4].parse::<u64>() {
            if looks_like_date(parts[5]) && looks_like_time(parts[6]) {
                return Some((size, parts[7..].join(" ")));
            }
        }
    }

    // Start at the group column to avoid mistaking the link count for a size.
    for i in 2..parts.len() {
        if let Ok(size) = parts[i].parse::<u64>() {
            // A month-name date (`Jun 1 12:00`) is three tokens, a
            // numeric one (`2023-06-01 12:00`) two.
            let date_tokens = if parts
                .get(i + 1)
                .is_some_and(|t| t.chars().all(|c| c.is_ascii_alphabetic()))
            {
                3
            } else {
                2
            };
            let name_start = i + 1 + date_tokens;
            if parts.len() > name_start {
                return Some((size, parts[name_start..].join(" ")));
            }
            return parts.last().map(|name| (size, name.to_string()));
        }
    }
    None
}

fn looks_like_date(token: &str) -> bool {
    token.len() == 10 && token.as_bytes()[4] == b'-' && token.as_bytes()[7] == b'-'
}

fn looks_like_time(token: &str) -> bool {
    token.contains(':')
}

fn join_path(dir: &str, name: &str) -> String {
    if name.starts_with('/') {
        name.to_string()
    } else {
        format!("{}/{}", dir.trim_end_matches('/'), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recursive_header_resolves_entry_paths() {
        let out = "\
/sdcard/Pictures:
total 8
-rw-rw---- 1 root sdcard_rw 500 2023-06-01 12:00 photo.png
";
        let listing = parse_recursive(out, "/sdcard");
        assert_eq!(listing.records.len(), 1);
        assert_eq!(listing.records[0].path, "/sdcard/Pictures/photo.png");
        assert_eq!(listing.records[0].size_bytes, 500);
    }

    #[test]
    fn entries_before_first_header_resolve_against_root() {
        let out = "-rw-rw---- 1 root sdcard_rw 42 2023-06-01 12:00 top.txt\n";
        let listing = parse_recursive(out, "/sdcard/");
        assert_eq!(listing.records[0].path, "/sdcard/top.txt");
    }

    #[test]
    fn symlinks_and_totals_are_ignored() {
        let out = "\
/sdcard:
total 16
lrwxrwxrwx 1 root root 21 2023-06-01 12:00 link -> /storage/emulated/0
-rw-rw---- 1 root sdcard_rw 100 2023-06-01 12:00 real.bin
";
        let listing = parse_recursive(out, "/sdcard");
        assert_eq!(listing.records.len(), 1);
        assert_eq!(listing.records[0].path, "/sdcard/real.bin");
        assert_eq!(listing.skipped, 0);
    }

    #[test]
    fn permission_denied_lines_are_counted() {
        let out = "ls: /sdcard/Android/data: Permission denied\n";
        let listing = parse_recursive(out, "/sdcard");
        assert_eq!(listing.denied, 1);
        assert!(listing.records.is_empty());
    }

    #[test]
    fn names_with_spaces_survive() {
        let out = "-rw-rw---- 1 root sdcard_rw 2048 2023-06-01 12:00 file name.zip\n";
        let listing = parse_recursive(out, "/sdcard/Download");
        assert_eq!(listing.records[0].path, "/sdcard/Download/file name.zip");
    }

    #[test]
    fn empty_input_is_zero_records() {
        let listing = parse_recursive("", "/sdcard");
        assert!(listing.records.is_empty());
        assert_eq!(listing.skipped, 0);
    }

    #[test]
    fn dir_listing_splits_files_and_subdirs() {
        let out = "\
total 24
drwxrwx--x 2 root sdcard_rw 4096 2023-06-01 12:00 DCIM
drwxrwx--x 2 root sdcard_rw 4096 2023-06-01 12:00 Download
-rw-rw---- 1 root sdcard_rw 777 2023-06-01 12:00 note.txt
";
        let listing = parse_dir_listing(out, "/sdcard");
        assert_eq!(listing.subdirs, vec!["/sdcard/DCIM", "/sdcard/Download"]);
        assert_eq!(listing.files.len(), 1);
        assert_eq!(listing.files[0].path, "/sdcard/note.txt");
        assert_eq!(listing.files[0].size_bytes, 777);
    }

    #[test]
    fn empty_dir_listing_is_zero_records() {
        let listing = parse_dir_listing("", "/sdcard");
        assert!(listing.files.is_empty());
        assert!(listing.subdirs.is_empty());
        assert_eq!(listing.skipped, 0);
    }

    #[test]
    fn garbage_entry_lines_count_as_skipped() {
        let out = "-corrupted nonsense\n";
        let listing = parse_dir_listing(out, "/sdcard");
        assert!(listing.files.is_empty());
        assert_eq!(listing.skipped, 1);
    }

    #[test]
    fn coreutils_date_shape_still_parses() {
        // `Jun 1 12:00` style: size found by scanning, name after the
        // three date tokens.
        let out = "-rw-r--r-- 1 u0_a123 sdcard_rw 9000 Jun 1 12:00 video clip.mp4\n";
        let listing = parse_dir_listing(out, "/sdcard/Movies");
        assert_eq!(listing.files.len(), 1);
        assert_eq!(listing.files[0].size_bytes, 9000);
        assert_eq!(listing.files[0].path, "/sdcard/Movies/video clip.mp4");
    }
}
