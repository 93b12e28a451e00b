#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// CLI front-end for the build and harmony stages.
pub mod app;
/// Snippet discovery and decoding.
pub mod collect;
/// Centralized constants used across pipeline stages.
pub mod constants;
/// Content-hash deduplication.
pub mod dedupe;
/// Chat-schema projection for the fine-tuning framework.
pub mod harmony;
mod hash;
/// Pipeline orchestration and configuration.
pub mod pipeline;
/// Prompt rendering helpers.
pub mod prompt;
/// Record types flowing through the pipeline.
pub mod record;
/// Reference CSV side-table loading.
pub mod reference;
/// Run summary counters.
pub mod report;
/// Deterministic split assignment.
pub mod split;
/// Shared type aliases.
pub mod types;
/// JSONL emission with safe-write discipline.
pub mod writer;

mod errors;

pub use collect::{CollectOutcome, SnippetCollector};
pub use dedupe::{DedupeOutcome, Deduplicator, DroppedDuplicate};
pub use errors::PipelineError;
pub use harmony::{HarmonyMessage, HarmonyRecord, ProjectionReport, project_jsonl, to_harmony};
pub use pipeline::{BuildConfig, build_dataset};
pub use prompt::{build_prompt, humanize_title};
pub use record::{RawFile, RecordKind, RecordMetadata, RecordOrigin, SnippetRecord};
pub use reference::{ReferenceLoader, ReferenceOutcome};
pub use report::{RunSummary, SplitSizes};
pub use split::{DatasetSplits, SplitLabel, SplitRatios, split_records};
pub use types::{
    CategoryName, HexDigest, PromptText, RelativePath, ResponseText, TitleText,
};
pub use writer::write_jsonl;
