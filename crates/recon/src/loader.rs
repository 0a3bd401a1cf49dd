//! Reads one delimited source into a [`Dataset`] keyed by a resolved key column.

use std::collections::BTreeMap;
use std::path::Path;

use caseless::default_case_fold_str;
use log::debug;

use crate::error::ReconError;
use crate::model::{Dataset, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Load a CSV file, resolve `key_field` in its header, and return rows sorted by key.
pub fn load(path: &Path, key_field: &str, options: &LoadOptions) -> Result<Dataset, ReconError> {
    if !path.exists() {
        return Err(ReconError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let label = source_label(path);
    let bytes = std::fs::read(path).map_err(|e| ReconError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let content = String::from_utf8(bytes).map_err(|e| ReconError::Format {
        source: label.clone(),
        message: format!("file is not valid UTF-8 ({})", e.utf8_error()),
    })?;

    parse_dataset(&label, &content, key_field, options)
}

/// Parse CSV text already in memory. `label` names the source in errors.
pub fn parse_dataset(
    label: &str,
    content: &str,
    key_field: &str,
    options: &LoadOptions,
) -> Result<Dataset, ReconError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| format_error(label, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(ReconError::Format {
            source: label.into(),
            message: "CSV file has no header row".into(),
        });
    }

    let physical_key = resolve_key_column(&headers, key_field)
        .ok_or_else(|| ReconError::KeyColumnMissing {
            source: label.into(),
            key: key_field.into(),
        })?
        .to_string();
    if physical_key != key_field {
        debug!("{label}: key column '{key_field}' resolved case-insensitively to '{physical_key}'");
    }

    // Header columns under their canonical names
    let columns: Vec<String> = headers
        .iter()
        .map(|h| {
            if *h == physical_key {
                key_field.to_string()
            } else {
                h.clone()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| format_error(label, e))?;

        let mut fields = BTreeMap::new();
        for (i, column) in columns.iter().enumerate() {
            // Short records pad with empty text
            let value = record.get(i).unwrap_or("");
            fields.insert(column.clone(), value.to_string());
        }

        let key = fields.get(key_field).cloned().unwrap_or_default();
        rows.push(Row { key, fields });
    }

    // Ordinal (byte-wise) order; stable so equal keys keep file order
    rows.sort_by(|a, b| a.key.cmp(&b.key));

    debug!("{label}: loaded {} rows, {} columns", rows.len(), columns.len());

    Ok(Dataset {
        source: label.to_string(),
        key_field: key_field.to_string(),
        columns,
        rows,
    })
}

/// Two-pass key column lookup: exact name first, then Unicode full case folding
/// (so `Straße` matches `STRASSE`).
pub fn resolve_key_column<'a>(headers: &'a [String], key_field: &str) -> Option<&'a str> {
    if let Some(exact) = headers.iter().find(|h| *h == key_field) {
        return Some(exact);
    }
    let folded = default_case_fold_str(key_field);
    headers
        .iter()
        .find(|h| default_case_fold_str(h) == folded)
        .map(String::as_str)
}

/// File name of `path`, falling back to the full path.
pub fn source_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn format_error(label: &str, e: csv::Error) -> ReconError {
    let message = match e.position() {
        Some(pos) => format!("line {}: {e}", pos.line()),
        None => e.to_string(),
    };
    ReconError::Format {
        source: label.into(),
        message,
    }
}
