use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::harmony::{ASSISTANT_ROLE, SYSTEM_MESSAGE, SYSTEM_ROLE, USER_ROLE};
use crate::errors::PipelineError;
use crate::writer::write_jsonl;

/// One chat message in a harmony record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarmonyMessage {
    /// Role label (`system`, `user`, or `assistant`).
    pub role: String,
    /// Message text.
    pub content: String,
}

/// Read-only projection of a prompt/response record into the three-role chat
/// schema consumed by the fine-tuning framework.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HarmonyRecord {
    /// Exactly three messages, in system/user/assistant order.
    pub messages: Vec<HarmonyMessage>,
}

/// Counters for one projection pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ProjectionReport {
    /// Non-blank lines read from the input file.
    pub lines_read: usize,
    /// Records projected and written.
    pub projected: usize,
    /// Blank lines skipped.
    pub blank_lines: usize,
    /// Lines that failed to parse as prompt/response rows.
    pub malformed_lines: usize,
}

#[derive(Deserialize)]
struct PromptResponseRow {
    prompt: String,
    response: String,
}

/// Wrap a prompt/response pair into a harmony record.
///
/// Pure and total: trims outer whitespace from both strings, keeps internal
/// whitespace verbatim, and prepends the fixed system message.
pub fn to_harmony(prompt: &str, response: &str) -> HarmonyRecord {
    HarmonyRecord {
        messages: vec![
            HarmonyMessage {
                role: SYSTEM_ROLE.to_string(),
                content: SYSTEM_MESSAGE.to_string(),
            },
            HarmonyMessage {
                role: USER_ROLE.to_string(),
                content: prompt.trim().to_string(),
            },
            HarmonyMessage {
                role: ASSISTANT_ROLE.to_string(),
                content: response.trim().to_string(),
            },
        ],
    }
}

/// Project a prompt/response JSONL file into a harmony JSONL file.
///
/// Blank input lines are skipped; malformed lines are counted and skipped,
/// never fatal. The output is written with the same safe-write discipline as
/// the split files.
pub fn project_jsonl(input: &Path, output: &Path) -> Result<ProjectionReport, PipelineError> {
    let reader = BufReader::new(File::open(input)?);
    let mut report = ProjectionReport::default();
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            report.blank_lines += 1;
            continue;
        }
        report.lines_read += 1;
        match serde_json::from_str::<PromptResponseRow>(&line) {
            Ok(row) => records.push(to_harmony(&row.prompt, &row.response)),
            Err(err) => {
                warn!(input = %input.display(), error = %err, "skipping malformed dataset row");
                report.malformed_lines += 1;
            }
        }
    }
    write_jsonl(&records, output)?;
    report.projected = records.len();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::harmony::MESSAGE_COUNT;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn produces_three_messages_in_fixed_order() {
        let record = to_harmony("  What does this do?  ", "\nMsgBox('x')\n\n");
        assert_eq!(record.messages.len(), MESSAGE_COUNT);
        assert_eq!(record.messages[0].role, "system");
        assert_eq!(record.messages[0].content, SYSTEM_MESSAGE);
        assert_eq!(record.messages[1].role, "user");
        assert_eq!(record.messages[1].content, "What does this do?");
        assert_eq!(record.messages[2].role, "assistant");
        assert_eq!(record.messages[2].content, "MsgBox('x')");
    }

    #[test]
    fn internal_whitespace_survives_the_outer_trim() {
        let record = to_harmony("prompt", "  line one\n\n    indented line\n");
        assert_eq!(record.messages[2].content, "line one\n\n    indented line");
    }

    #[test]
    fn projection_skips_blank_and_malformed_lines() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("train.jsonl");
        let output = dir.path().join("train_harmony.jsonl");
        fs::write(
            &input,
            "{\"prompt\": \"p1\", \"response\": \"r1\"}\n\
             \n\
             not json at all\n\
             {\"prompt\": \"p2\", \"response\": \"r2\"}\n",
        )
        .unwrap();

        let report = project_jsonl(&input, &output).unwrap();
        assert_eq!(report.lines_read, 3);
        assert_eq!(report.projected, 2);
        assert_eq!(report.blank_lines, 1);
        assert_eq!(report.malformed_lines, 1);

        let content = fs::read_to_string(&output).unwrap();
        assert_eq!(content.lines().count(), 2);
        let first: HarmonyRecord = serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(first.messages[1].content, "p1");
    }

    #[test]
    fn projection_of_empty_file_writes_empty_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("empty.jsonl");
        let output = dir.path().join("empty_harmony.jsonl");
        fs::write(&input, "").unwrap();

        let report = project_jsonl(&input, &output).unwrap();
        assert_eq!(report, ProjectionReport::default());
        assert_eq!(fs::read_to_string(&output).unwrap(), "");
    }

    #[test]
    fn missing_input_is_an_io_error() {
        let dir = tempdir().unwrap();
        let err = project_jsonl(
            Path::new("/nonexistent/input.jsonl"),
            &dir.path().join("out.jsonl"),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)));
    }
}
