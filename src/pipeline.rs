use std::path::PathBuf;

use chrono::Utc;
use tracing::info;

use crate::collect::SnippetCollector;
use crate::constants::{splits, writer};
use crate::dedupe::Deduplicator;
use crate::errors::PipelineError;
use crate::reference::ReferenceLoader;
use crate::report::{RunSummary, SplitSizes};
use crate::split::{SplitLabel, SplitRatios, split_records};
use crate::writer::write_jsonl;

/// Configuration surface for one dataset build.
///
/// All paths and tuning knobs are externally supplied; the pipeline itself
/// holds no ambient state.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    /// Root directory containing snippet files in category subdirectories.
    pub input_root: PathBuf,
    /// Directory receiving the three split files.
    pub output_dir: PathBuf,
    /// Train split filename.
    pub train_file: String,
    /// Validation split filename.
    pub val_file: String,
    /// Test split filename.
    pub test_file: String,
    /// Optional reference CSV side-tables, merged into the record stream.
    pub reference_csvs: Vec<PathBuf>,
    /// Split ratios.
    pub ratios: SplitRatios,
    /// Shuffle seed.
    pub seed: u64,
    /// Compute the summary without writing any files.
    pub dry_run: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            input_root: PathBuf::from(writer::DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(writer::DEFAULT_OUTPUT_DIR),
            train_file: writer::TRAIN_FILENAME.to_string(),
            val_file: writer::VAL_FILENAME.to_string(),
            test_file: writer::TEST_FILENAME.to_string(),
            reference_csvs: Vec::new(),
            ratios: SplitRatios::default(),
            seed: splits::DEFAULT_SEED,
            dry_run: false,
        }
    }
}

impl BuildConfig {
    /// Fail fast on configuration that would invalidate the whole run.
    ///
    /// Runs before any output path is touched.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.input_root.is_dir() {
            return Err(PipelineError::Configuration(format!(
                "input root '{}' is not a directory",
                self.input_root.display()
            )));
        }
        self.ratios.validated()?;
        Ok(())
    }

    /// Output filename configured for `label`.
    pub fn filename_for(&self, label: SplitLabel) -> &str {
        match label {
            SplitLabel::Train => &self.train_file,
            SplitLabel::Validation => &self.val_file,
            SplitLabel::Test => &self.test_file,
        }
    }
}

/// Run the full batch pipeline: collect, merge references, dedupe, split,
/// write. Returns exact counts for the run.
///
/// The pipeline either completes and reports counts or aborts before
/// mutating any output path.
pub fn build_dataset(config: &BuildConfig) -> Result<RunSummary, PipelineError> {
    let started_at = Utc::now();
    config.validate()?;

    let collected = SnippetCollector::new(&config.input_root).collect()?;
    info!(
        scanned = collected.scanned,
        records = collected.records.len(),
        decode_failures = collected.decode_failures.len(),
        empty_files = collected.empty_files.len(),
        "collected snippet files"
    );

    let mut records = collected.records;
    let snippet_records = records.len();
    let mut reference_rows_loaded = 0;
    let mut reference_rows_skipped = 0;
    for csv_path in &config.reference_csvs {
        let outcome = ReferenceLoader::load(csv_path)?;
        info!(
            path = %csv_path.display(),
            loaded = outcome.rows_loaded,
            skipped = outcome.rows_skipped,
            "loaded reference csv"
        );
        reference_rows_loaded += outcome.rows_loaded;
        reference_rows_skipped += outcome.rows_skipped;
        records.extend(outcome.records);
    }

    let deduped = Deduplicator::new().run(records);
    info!(
        unique = deduped.unique.len(),
        dropped = deduped.dropped.len(),
        "deduplicated records"
    );

    let unique_records = deduped.unique.len();
    let duplicates_removed = deduped.dropped.len();
    let splits = split_records(deduped.unique, config.ratios, config.seed)?;
    let sizes = SplitSizes {
        train: splits.train.len(),
        validation: splits.validation.len(),
        test: splits.test.len(),
    };

    if !config.dry_run {
        for (label, records) in splits.iter_labeled() {
            let path = config.output_dir.join(config.filename_for(label));
            write_jsonl(records, &path)?;
            info!(
                split = label.as_str(),
                count = records.len(),
                path = %path.display(),
                "wrote split file"
            );
        }
    }

    Ok(RunSummary {
        started_at,
        finished_at: Utc::now(),
        scanned_files: collected.scanned,
        decode_failures: collected.decode_failures.len(),
        empty_files: collected.empty_files.len(),
        snippet_records,
        reference_rows_loaded,
        reference_rows_skipped,
        duplicates_removed,
        unique_records,
        splits: sizes,
        dry_run: config.dry_run,
    })
}
