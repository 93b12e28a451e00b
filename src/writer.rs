use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::errors::PipelineError;

/// Serialize `records` as newline-delimited JSON at `path`.
///
/// One object per line, UTF-8, newline-terminated, no trailing blank line.
/// The records are written to a temp file in the destination directory and
/// renamed into place, so a failed run leaves the destination unchanged.
pub fn write_jsonl<T: Serialize>(records: &[T], path: &Path) -> Result<(), PipelineError> {
    ensure_parent_dir(path)?;
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut out = BufWriter::new(tmp.as_file_mut());
        for record in records {
            serde_json::to_writer(&mut out, record)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
    }
    tmp.persist(path).map_err(|err| PipelineError::Write {
        path: path.display().to_string(),
        reason: err.error.to_string(),
    })?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::fs;
    use tempfile::tempdir;

    #[derive(Serialize)]
    struct Row {
        prompt: String,
        response: String,
    }

    fn row(n: u32) -> Row {
        Row {
            prompt: format!("prompt {n}"),
            response: format!("response {n}\n"),
        }
    }

    #[test]
    fn writes_one_object_per_line_with_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("train.jsonl");
        write_jsonl(&[row(1), row(2)], &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.ends_with('\n'));
        assert!(!content.ends_with("\n\n"));
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value["prompt"].is_string());
        }
    }

    #[test]
    fn empty_record_set_produces_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("val.jsonl");
        write_jsonl::<Row>(&[], &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("test.jsonl");
        write_jsonl(&[row(1)], &path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn overwrites_existing_destination_atomically() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("train.jsonl");
        write_jsonl(&[row(1)], &path).unwrap();
        write_jsonl(&[row(2), row(3)], &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("prompt 2"));
        assert!(!content.contains("prompt 1"));
    }

    #[test]
    fn non_ascii_text_is_written_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("unicode.jsonl");
        write_jsonl(
            &[Row {
                prompt: "Ctrl+ü höhe".to_string(),
                response: "Send('ü')\n".to_string(),
            }],
            &path,
        )
        .unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Ctrl+ü höhe"));
        assert!(!content.contains("\\u00fc"));
    }
}
