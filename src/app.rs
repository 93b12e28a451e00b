use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::constants::{splits, writer};
use crate::harmony;
use crate::pipeline::{BuildConfig, build_dataset};
use crate::split::SplitRatios;

#[derive(Debug, Parser)]
#[command(
    name = "snippet-dataset",
    disable_help_subcommand = true,
    about = "Deterministic JSONL dataset builder for script-snippet corpora",
    long_about = "Build prompt/response JSONL splits from a tree of snippet files, \
                  then optionally project them into the three-role chat schema \
                  consumed by the fine-tuning framework."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Discover, dedupe, split, and write the prompt/response dataset.
    Build(BuildArgs),
    /// Re-wrap a prompt/response JSONL file into harmony chat records.
    Harmony(HarmonyArgs),
}

#[derive(Debug, Args)]
struct BuildArgs {
    #[arg(
        long,
        default_value = writer::DEFAULT_INPUT_DIR,
        help = "Root directory containing snippet files"
    )]
    input_dir: PathBuf,
    #[arg(
        long,
        default_value = writer::DEFAULT_OUTPUT_DIR,
        help = "Directory receiving the split files"
    )]
    output_dir: PathBuf,
    #[arg(long, default_value = writer::TRAIN_FILENAME)]
    train_file: String,
    #[arg(long, default_value = writer::VAL_FILENAME)]
    val_file: String,
    #[arg(long, default_value = writer::TEST_FILENAME)]
    test_file: String,
    #[arg(
        long,
        default_value_t = splits::DEFAULT_VALIDATION_RATIO,
        help = "Fraction of unique records held out for validation"
    )]
    val_ratio: f32,
    #[arg(
        long,
        default_value_t = splits::DEFAULT_TEST_RATIO,
        help = "Fraction of unique records held out for test"
    )]
    test_ratio: f32,
    #[arg(
        long,
        default_value_t = splits::DEFAULT_SEED,
        help = "Deterministic shuffle seed"
    )]
    seed: u64,
    #[arg(
        long = "elements-csv",
        value_name = "PATH",
        help = "Optional reference CSV side-table, repeat as needed"
    )]
    elements_csv: Vec<PathBuf>,
    #[arg(long, help = "Report counts without writing any files")]
    dry_run: bool,
}

impl BuildArgs {
    fn into_config(self) -> BuildConfig {
        BuildConfig {
            input_root: self.input_dir,
            output_dir: self.output_dir,
            train_file: self.train_file,
            val_file: self.val_file,
            test_file: self.test_file,
            reference_csvs: self.elements_csv,
            ratios: SplitRatios::with_holdouts(self.val_ratio, self.test_ratio),
            seed: self.seed,
            dry_run: self.dry_run,
        }
    }
}

#[derive(Debug, Args)]
struct HarmonyArgs {
    #[arg(long = "in", value_name = "PATH", help = "Prompt/response JSONL input")]
    input: PathBuf,
    #[arg(long = "out", value_name = "PATH", help = "Harmony JSONL output")]
    output: PathBuf,
}

/// Parse CLI arguments and run the selected stage.
pub fn run() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let cli = Cli::parse();
    match cli.command {
        Command::Build(args) => {
            let config = args.into_config();
            let summary = build_dataset(&config)?;
            println!("{summary}");
        }
        Command::Harmony(args) => {
            let report = harmony::project_jsonl(&args.input, &args.output)?;
            println!(
                "projected {} records ({} blank lines skipped, {} malformed lines skipped)",
                report.projected, report.blank_lines, report.malformed_lines
            );
        }
    }
    Ok(())
}
