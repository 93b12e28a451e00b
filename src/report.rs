use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Final record counts per split.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SplitSizes {
    /// Records written to the train split.
    pub train: usize,
    /// Records written to the validation split.
    pub validation: usize,
    /// Records written to the test split.
    pub test: usize,
}

impl SplitSizes {
    /// Total records across all splits.
    pub fn total(&self) -> usize {
        self.train + self.validation + self.test
    }
}

/// Exact counts for one pipeline run.
///
/// Every locally-recovered input error (undecodable file, empty file,
/// malformed CSV row) is reflected here; nothing is silently swallowed.
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Eligible files visited under the input root.
    pub scanned_files: usize,
    /// Files skipped as unreadable or non-UTF-8.
    pub decode_failures: usize,
    /// Files skipped as empty after normalization.
    pub empty_files: usize,
    /// Snippet records produced by the collector.
    pub snippet_records: usize,
    /// Reference CSV rows accepted.
    pub reference_rows_loaded: usize,
    /// Reference CSV rows skipped (missing fields or unparsable).
    pub reference_rows_skipped: usize,
    /// Records dropped as content-hash duplicates.
    pub duplicates_removed: usize,
    /// Unique records after deduplication.
    pub unique_records: usize,
    /// Final split sizes.
    pub splits: SplitSizes,
    /// True when no output files were written.
    pub dry_run: bool,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "scanned {} files ({} decode failures, {} empty)",
            self.scanned_files, self.decode_failures, self.empty_files
        )?;
        if self.reference_rows_loaded > 0 || self.reference_rows_skipped > 0 {
            writeln!(
                f,
                "reference rows: {} loaded, {} skipped",
                self.reference_rows_loaded, self.reference_rows_skipped
            )?;
        }
        writeln!(
            f,
            "{} duplicates removed, {} unique records",
            self.duplicates_removed, self.unique_records
        )?;
        write!(
            f,
            "split sizes (train/val/test): {}/{}/{}",
            self.splits.train, self.splits.validation, self.splits.test
        )?;
        if self.dry_run {
            write!(f, " [dry run, no files written]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> RunSummary {
        let now = Utc::now();
        RunSummary {
            started_at: now,
            finished_at: now,
            scanned_files: 12,
            decode_failures: 1,
            empty_files: 2,
            snippet_records: 9,
            reference_rows_loaded: 3,
            reference_rows_skipped: 1,
            duplicates_removed: 2,
            unique_records: 10,
            splits: SplitSizes {
                train: 8,
                validation: 1,
                test: 1,
            },
            dry_run: false,
        }
    }

    #[test]
    fn split_sizes_total() {
        let sizes = SplitSizes {
            train: 8,
            validation: 1,
            test: 1,
        };
        assert_eq!(sizes.total(), 10);
    }

    #[test]
    fn display_reports_exact_counts() {
        let rendered = summary().to_string();
        assert!(rendered.contains("scanned 12 files (1 decode failures, 2 empty)"));
        assert!(rendered.contains("reference rows: 3 loaded, 1 skipped"));
        assert!(rendered.contains("2 duplicates removed, 10 unique records"));
        assert!(rendered.contains("split sizes (train/val/test): 8/1/1"));
        assert!(!rendered.contains("dry run"));
    }

    #[test]
    fn display_marks_dry_runs() {
        let mut s = summary();
        s.dry_run = true;
        assert!(s.to_string().contains("[dry run, no files written]"));
    }

    #[test]
    fn display_omits_reference_line_when_no_csv_was_given() {
        let mut s = summary();
        s.reference_rows_loaded = 0;
        s.reference_rows_skipped = 0;
        assert!(!s.to_string().contains("reference rows"));
    }
}
