use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;
use crate::hash::content_digest;
use crate::types::{CategoryName, HexDigest, PromptText, RelativePath, ResponseText};

/// Ephemeral view of one discovered file before prompt rendering.
///
/// Produced by the collector, consumed once, never persisted.
#[derive(Clone, Debug)]
pub struct RawFile {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Root-relative, forward-slash path.
    pub relative_path: RelativePath,
    /// Decoded UTF-8 content with the byte-order mark already stripped.
    pub text: String,
}

/// Origin of a record (script corpus or reference side-table).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// One example script file from the input tree.
    Snippet,
    /// One row of a reference CSV side-table.
    Reference,
}

/// Provenance fields supplied by the stage constructing a record.
///
/// Derived fields (`sha256`, `line_count`) are computed by
/// [`SnippetRecord::new`], not supplied here.
#[derive(Clone, Debug, Default)]
pub struct RecordOrigin {
    /// Root-relative source path (or the CSV origin for reference rows).
    pub source_path: RelativePath,
    /// Category label embedded in the prompt.
    pub category: CategoryName,
    /// File name including extension.
    pub filename: String,
    /// Record origin kind.
    pub kind: Option<RecordKind>,
    /// Extra CSV columns carried through without polluting the core schema.
    pub extra: BTreeMap<String, String>,
}

/// Structured metadata carried by every record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Root-relative source path (no machine-specific prefixes).
    pub source_path: RelativePath,
    /// Category label.
    pub category: CategoryName,
    /// File name including extension.
    pub filename: String,
    /// SHA-256 hex digest of the normalized response bytes.
    pub sha256: HexDigest,
    /// Record origin kind.
    pub record_type: RecordKind,
    /// Line count of the normalized response.
    pub line_count: usize,
    /// Side-bag for unknown/extra reference columns.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// The central prompt/response entity flowing through the pipeline.
///
/// Immutable after construction; `metadata.sha256` is always the digest of
/// `response`, so equal digests mean duplicate records regardless of path.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnippetRecord {
    /// Rendered instruction text (never empty).
    pub prompt: PromptText,
    /// Normalized script or description text.
    pub response: ResponseText,
    /// Structured provenance metadata.
    pub metadata: RecordMetadata,
}

impl SnippetRecord {
    /// Build a record from a rendered prompt and raw response text.
    ///
    /// Normalizes the response (CRLF to LF, outer trim, exactly one trailing
    /// newline) and computes the content digest and line count. Fails when
    /// either the prompt or the normalized response is empty.
    pub fn new(
        prompt: impl Into<PromptText>,
        response_text: &str,
        origin: RecordOrigin,
    ) -> Result<Self, PipelineError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(PipelineError::InvalidRecord(format!(
                "empty prompt for '{}'",
                origin.source_path
            )));
        }
        let response = normalize_response(response_text);
        if response.trim().is_empty() {
            return Err(PipelineError::InvalidRecord(format!(
                "empty response for '{}'",
                origin.source_path
            )));
        }
        let sha256 = content_digest(&response);
        let line_count = response.lines().count();
        Ok(Self {
            prompt,
            response,
            metadata: RecordMetadata {
                source_path: origin.source_path,
                category: origin.category,
                filename: origin.filename,
                sha256,
                record_type: origin.kind.unwrap_or(RecordKind::Snippet),
                line_count,
                extra: origin.extra,
            },
        })
    }
}

/// Normalize response text: LF line endings, outer trim, one trailing newline.
pub fn normalize_response(text: &str) -> ResponseText {
    let unified = text.replace("\r\n", "\n");
    format!("{}\n", unified.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::content_digest;

    fn origin(path: &str) -> RecordOrigin {
        RecordOrigin {
            source_path: path.to_string(),
            category: "GUI".to_string(),
            filename: "Button_Click.ahk".to_string(),
            kind: Some(RecordKind::Snippet),
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn digest_matches_normalized_response() {
        let record =
            SnippetRecord::new("prompt", "MsgBox('Test')  \n", origin("GUI/a.ahk")).unwrap();
        assert_eq!(record.response, "MsgBox('Test')\n");
        assert_eq!(record.metadata.sha256, content_digest("MsgBox('Test')\n"));
        assert_eq!(record.metadata.line_count, 1);
    }

    #[test]
    fn crlf_and_lf_content_hash_alike() {
        let a = SnippetRecord::new("p", "line one\r\nline two\r\n", origin("a.ahk")).unwrap();
        let b = SnippetRecord::new("p", "line one\nline two\n", origin("b.ahk")).unwrap();
        assert_eq!(a.metadata.sha256, b.metadata.sha256);
        assert_eq!(a.metadata.line_count, 2);
    }

    #[test]
    fn empty_prompt_is_rejected() {
        let err = SnippetRecord::new("   ", "MsgBox('x')", origin("a.ahk")).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidRecord(msg) if msg.contains("prompt")));
    }

    #[test]
    fn empty_response_is_rejected() {
        let err = SnippetRecord::new("prompt", "  \n\n ", origin("a.ahk")).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidRecord(msg) if msg.contains("response")));
    }

    #[test]
    fn serialized_metadata_flattens_extra_columns() {
        let mut o = origin("GUI/a.ahk");
        o.extra.insert("symbol".to_string(), "#Warn".to_string());
        let record = SnippetRecord::new("prompt", "MsgBox('x')", o).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["metadata"]["record_type"], "snippet");
        assert_eq!(json["metadata"]["symbol"], "#Warn");
        assert_eq!(json["metadata"]["sha256"].as_str().unwrap().len(), 64);
    }
}
