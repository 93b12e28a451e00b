use std::collections::BTreeMap;
use std::path::Path;

use tracing::warn;

use crate::constants::collector::UTF8_BOM;
use crate::constants::reference::{
    COL_DESCRIPTION, COL_ELEMENT_TYPE, COL_NAME, COL_PARAMETERS, COL_PATH, COL_RETURN_TYPE,
    COL_SOURCE_FILE, COL_SYMBOL, COL_TYPE, DEFAULT_ELEMENT_TYPE, KNOWN_COLUMNS,
};
use crate::errors::PipelineError;
use crate::prompt::build_reference_prompt;
use crate::record::{RecordKind, RecordOrigin, SnippetRecord};

/// Result of loading one reference CSV side-table.
#[derive(Debug, Default)]
pub struct ReferenceOutcome {
    /// One record per well-formed row.
    pub records: Vec<SnippetRecord>,
    /// Rows accepted.
    pub rows_loaded: usize,
    /// Rows rejected (missing required fields or unparsable), surfaced in the
    /// run summary rather than treated as errors.
    pub rows_skipped: usize,
}

/// Loader for optional CSV side-tables of reference entries.
///
/// A missing file, an unreadable file, or a header without the required
/// `Name`/`Description` columns all contribute zero rows with a single
/// warning; none of these abort the batch.
pub struct ReferenceLoader;

impl ReferenceLoader {
    /// Load `path` into reference records.
    pub fn load(path: &Path) -> Result<ReferenceOutcome, PipelineError> {
        if !path.is_file() {
            warn!(path = %path.display(), "reference csv not found, contributing zero rows");
            return Ok(ReferenceOutcome::default());
        }
        let mut reader = match csv::ReaderBuilder::new().from_path(path) {
            Ok(reader) => reader,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "reference csv unreadable, contributing zero rows");
                return Ok(ReferenceOutcome::default());
            }
        };
        let columns = match header_columns(&mut reader) {
            Some(columns) => columns,
            None => {
                warn!(path = %path.display(), "reference csv missing Name/Description header, contributing zero rows");
                return Ok(ReferenceOutcome::default());
            }
        };

        let source_csv = posix_display(path);
        let mut outcome = ReferenceOutcome::default();
        for row in reader.records() {
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping malformed reference row");
                    outcome.rows_skipped += 1;
                    continue;
                }
            };
            match build_row_record(&columns, &row, &source_csv)? {
                Some(record) => {
                    outcome.records.push(record);
                    outcome.rows_loaded += 1;
                }
                None => outcome.rows_skipped += 1,
            }
        }
        Ok(outcome)
    }
}

/// Header name to field index map, `None` when required columns are absent.
fn header_columns(reader: &mut csv::Reader<std::fs::File>) -> Option<BTreeMap<String, usize>> {
    let headers = reader.headers().ok()?;
    let mut columns = BTreeMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // utf-8-sig exports prefix the first header cell with a BOM.
        let name = name.strip_prefix(UTF8_BOM).unwrap_or(name).trim();
        if !name.is_empty() {
            columns.insert(name.to_string(), idx);
        }
    }
    if columns.contains_key(COL_NAME) && columns.contains_key(COL_DESCRIPTION) {
        Some(columns)
    } else {
        None
    }
}

fn field<'a>(
    columns: &BTreeMap<String, usize>,
    row: &'a csv::StringRecord,
    name: &str,
) -> &'a str {
    columns
        .get(name)
        .and_then(|idx| row.get(*idx))
        .unwrap_or_default()
        .trim()
}

fn build_row_record(
    columns: &BTreeMap<String, usize>,
    row: &csv::StringRecord,
    source_csv: &str,
) -> Result<Option<SnippetRecord>, PipelineError> {
    let name = field(columns, row, COL_NAME);
    let description = field(columns, row, COL_DESCRIPTION);
    if name.is_empty() || description.is_empty() {
        return Ok(None);
    }

    let element_type = match field(columns, row, COL_ELEMENT_TYPE) {
        "" => DEFAULT_ELEMENT_TYPE,
        value => value,
    };
    let source_file = field(columns, row, COL_SOURCE_FILE);
    let category_path = field(columns, row, COL_PATH);

    let prompt = build_reference_prompt(element_type, name, source_file, category_path);

    let mut response_parts = vec![description.to_string()];
    for (label, column) in [
        ("Signature Type", COL_TYPE),
        ("Return Type", COL_RETURN_TYPE),
        ("Symbol", COL_SYMBOL),
        ("Parameters", COL_PARAMETERS),
    ] {
        let value = field(columns, row, column);
        if !value.is_empty() {
            response_parts.push(format!("{label}: {value}"));
        }
    }
    let response = response_parts.join("\n");

    let mut extra = BTreeMap::new();
    extra.insert("name".to_string(), name.to_string());
    if !category_path.is_empty() {
        extra.insert("category_path".to_string(), category_path.to_string());
    }
    for (column, idx) in columns {
        if KNOWN_COLUMNS.contains(&column.as_str()) {
            continue;
        }
        if let Some(value) = row.get(*idx) {
            let value = value.trim();
            if !value.is_empty() {
                extra.insert(column.clone(), value.to_string());
            }
        }
    }

    let filename = if source_file.is_empty() {
        name.to_string()
    } else {
        source_file.to_string()
    };
    SnippetRecord::new(
        prompt,
        &response,
        RecordOrigin {
            source_path: source_csv.to_string(),
            category: element_type.to_string(),
            filename,
            kind: Some(RecordKind::Reference),
            extra,
        },
    )
    .map(Some)
    .map_err(|err| PipelineError::Reference {
        path: source_csv.to_string(),
        reason: err.to_string(),
    })
}

fn posix_display(path: &Path) -> String {
    let parts: Vec<&str> = path
        .components()
        .filter_map(|component| component.as_os_str().to_str())
        .collect();
    parts.join("/")
}
