use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::warn;
use walkdir::WalkDir;

use crate::constants::collector::{DEFAULT_CATEGORY, SNIPPET_EXTENSION, UTF8_BOM};
use crate::errors::PipelineError;
use crate::prompt::build_prompt;
use crate::record::{RawFile, RecordKind, RecordOrigin, SnippetRecord};
use crate::types::{CategoryName, RelativePath};

/// Result of one collection pass over the input root.
#[derive(Debug, Default)]
pub struct CollectOutcome {
    /// One record per decoded, non-empty snippet file, in sorted path order.
    pub records: Vec<SnippetRecord>,
    /// Number of eligible files visited.
    pub scanned: usize,
    /// Files skipped because they were unreadable or not valid UTF-8.
    pub decode_failures: Vec<PathBuf>,
    /// Files skipped because they were empty after normalization.
    pub empty_files: Vec<PathBuf>,
}

/// Recursive snippet discovery over a directory tree.
///
/// Traversal order is made deterministic by sorting the collected paths
/// lexicographically before any further processing, so parallel reads never
/// leak non-deterministic ordering into the seeded shuffle downstream.
pub struct SnippetCollector {
    root: PathBuf,
    extension: String,
    follow_links: bool,
}

impl SnippetCollector {
    /// Create a collector rooted at `root`, matching the default extension.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: SNIPPET_EXTENSION.to_string(),
            follow_links: false,
        }
    }

    /// Override the eligible file extension (without dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Configure symlink traversal.
    pub fn with_follow_symlinks(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Walk the root and produce records for every decodable, non-empty file.
    ///
    /// Unreadable or non-UTF-8 files and empty files are skipped and counted,
    /// never fatal. A missing root is a configuration error.
    pub fn collect(&self) -> Result<CollectOutcome, PipelineError> {
        if !self.root.is_dir() {
            return Err(PipelineError::Configuration(format!(
                "input root '{}' is not a directory",
                self.root.display()
            )));
        }

        let mut paths = self.eligible_paths();
        paths.sort();

        // Reads are side-effect free, so they can fan out; the pre-sorted
        // path list fixes the order of the collected results.
        let reads: Vec<(PathBuf, Result<String, String>)> = paths
            .into_par_iter()
            .map(|path| {
                let decoded = read_decoded(&path);
                (path, decoded)
            })
            .collect();

        let mut outcome = CollectOutcome {
            scanned: reads.len(),
            ..CollectOutcome::default()
        };
        for (path, decoded) in reads {
            let text = match decoded {
                Ok(text) => text,
                Err(reason) => {
                    warn!(path = %path.display(), %reason, "skipping undecodable snippet file");
                    outcome.decode_failures.push(path);
                    continue;
                }
            };
            if text.trim().is_empty() {
                warn!(path = %path.display(), "skipping empty snippet file");
                outcome.empty_files.push(path);
                continue;
            }
            let raw = RawFile {
                relative_path: relative_posix(&self.root, &path),
                path,
                text,
            };
            outcome.records.push(self.build_record(raw)?);
        }
        Ok(outcome)
    }

    fn eligible_paths(&self) -> Vec<PathBuf> {
        let mut walker = WalkDir::new(&self.root);
        if self.follow_links {
            walker = walker.follow_links(true);
        }
        walker
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| has_extension(path, &self.extension))
            .collect()
    }

    fn build_record(&self, raw: RawFile) -> Result<SnippetRecord, PipelineError> {
        let category = category_of(&raw.relative_path);
        let stem = raw
            .path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        let filename = raw
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        let prompt = build_prompt(&category, stem);
        SnippetRecord::new(
            prompt,
            &raw.text,
            RecordOrigin {
                source_path: raw.relative_path,
                category,
                filename,
                kind: Some(RecordKind::Snippet),
                extra: Default::default(),
            },
        )
    }
}

/// Category is the first path component when the file is nested, otherwise a
/// fixed fallback so prompts never carry an empty category.
fn category_of(relative_path: &RelativePath) -> CategoryName {
    let mut parts = relative_path.split('/');
    let first = parts.next().unwrap_or_default();
    match parts.next() {
        Some(_) => first.to_string(),
        None => DEFAULT_CATEGORY.to_string(),
    }
}

fn relative_posix(root: &Path, path: &Path) -> RelativePath {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<&str> = relative
        .components()
        .filter_map(|component| component.as_os_str().to_str())
        .collect();
    parts.join("/")
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

fn read_decoded(path: &Path) -> Result<String, String> {
    let bytes = fs::read(path).map_err(|err| err.to_string())?;
    let text = String::from_utf8(bytes).map_err(|err| err.to_string())?;
    Ok(text.strip_prefix(UTF8_BOM).unwrap_or(&text).to_string())
}
