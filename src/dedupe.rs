use indexmap::IndexMap;
use tracing::debug;

use crate::record::SnippetRecord;
use crate::types::{HexDigest, RelativePath};

/// One record dropped because an earlier record carried the same digest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DroppedDuplicate {
    /// Source path of the dropped record.
    pub source_path: RelativePath,
    /// Digest shared with the record that was kept.
    pub sha256: HexDigest,
}

/// Result of one deduplication pass.
#[derive(Debug, Default)]
pub struct DedupeOutcome {
    /// First record observed per unique digest, in original relative order.
    pub unique: Vec<SnippetRecord>,
    /// Identity of every dropped duplicate, for diagnostics.
    pub dropped: Vec<DroppedDuplicate>,
}

/// Content-hash deduplicator owning its own seen-digest state.
///
/// No global registries: each pass constructs a fresh instance, which keeps
/// parallel runs and tests isolated.
#[derive(Default)]
pub struct Deduplicator {
    seen: IndexMap<HexDigest, SnippetRecord>,
}

impl Deduplicator {
    /// Create an empty deduplicator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collapse `records` to one record per unique digest.
    ///
    /// Keeps the first record observed for each digest in input order and
    /// returns the survivors in stable original order. Pure with respect to
    /// the input: no I/O, idempotent on its own output.
    pub fn run(mut self, records: Vec<SnippetRecord>) -> DedupeOutcome {
        let mut dropped = Vec::new();
        for record in records {
            let digest = record.metadata.sha256.clone();
            if self.seen.contains_key(&digest) {
                debug!(
                    source_path = %record.metadata.source_path,
                    sha256 = %digest,
                    "dropping duplicate record"
                );
                dropped.push(DroppedDuplicate {
                    source_path: record.metadata.source_path,
                    sha256: digest,
                });
                continue;
            }
            self.seen.insert(digest, record);
        }
        DedupeOutcome {
            unique: self.seen.into_values().collect(),
            dropped,
        }
    }
}
