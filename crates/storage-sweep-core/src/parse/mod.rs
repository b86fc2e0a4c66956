//! One parsing strategy per remote enumeration method. Each parser is a
//! pure function from raw command output to a normalized record set:
//! empty input parses to zero records, malformed lines are skipped and
//! counted, permission-denied lines are counted separately.

pub mod find;
pub mod ls;
pub mod stat;

use crate::bridge::quote;
use crate::model::{FileRecord, StrategyKind};

/// Outcome of feeding one command's output through a parser.
#[derive(Debug, Default)]
pub struct ParsedListing {
    pub records: Vec<FileRecord>,
    /// Lines that did not match the expected shape.
    pub skipped: usize,
    /// Entries the device shell refused to read.
    pub denied: usize,
}

impl StrategyKind {
    /// The single remote command a batch strategy issues for `root`.
    /// The per-directory fallback iterates and has no one-shot command.
    pub fn command(&self, root: &str) -> Option<String> {
        match self {
            StrategyKind::Find => Some(format!(
                "find {} -type f -printf '%p %s\\n'",
                quote(root)
            )),
            StrategyKind::Stat => Some(format!(
                "find {} -type f -exec stat -c '%s %n' {{}} +",
                quote(root)
            )),
            StrategyKind::LsRecursive => Some(format!("ls -lR {}", quote(root))),
            StrategyKind::PerDirectory => None,
        }
    }

    /// Parse the output of this strategy's batch command.
    pub fn parse(&self, output: &str, root: &str) -> ParsedListing {
        match self {
            StrategyKind::Find => find::parse(output),
            StrategyKind::Stat => stat::parse(output),
            StrategyKind::LsRecursive | StrategyKind::PerDirectory => {
                ls::parse_recursive(output, root)
            }
        }
    }
}

pub(crate) fn is_denied(line: &str) -> bool {
    line.contains("Permission denied")
}
