//! Field report: per-field difference counts persisted as a flat CSV.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::ReconError;
use crate::model::{Difference, SummaryRow};
use crate::summary::summarize;

/// Header labels of the field report, in column order.
pub const REPORT_HEADERS: [&str; 5] = [
    "Field",
    "Total discrepancies",
    "Value mismatches",
    "Missing in file 1",
    "Missing in file 2",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub delimiter: u8,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Summarize `differences` and write the field report to `destination`.
pub fn write_report(
    differences: &[Difference],
    destination: Option<&Path>,
) -> Result<(), ReconError> {
    write_report_with(differences, destination, &ReportOptions::default())
}

/// Like [`write_report`] with explicit options.
///
/// The report is written to a temporary file beside `destination` and renamed
/// into place, so a failed write leaves any previous file untouched.
pub fn write_report_with(
    differences: &[Difference],
    destination: Option<&Path>,
    options: &ReportOptions,
) -> Result<(), ReconError> {
    let destination = match destination {
        Some(path) if !path.as_os_str().is_empty() => path,
        _ => {
            return Err(ReconError::Destination {
                path: None,
                message: "no output path given".into(),
            })
        }
    };

    let rows = summarize(differences);
    if rows.is_empty() {
        return Err(ReconError::EmptyReport);
    }

    let bytes = render_report(&rows, options)?;

    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let dest_err = |message: String| ReconError::Destination {
        path: Some(destination.to_path_buf()),
        message,
    };

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| dest_err(e.to_string()))?;
    tmp.write_all(&bytes).map_err(|e| dest_err(e.to_string()))?;
    tmp.as_file().sync_all().map_err(|e| dest_err(e.to_string()))?;
    tmp.persist(destination).map_err(|e| dest_err(e.error.to_string()))?;

    info!(
        "field report written to {} ({} fields)",
        destination.display(),
        rows.len()
    );
    Ok(())
}

/// Render summary rows as report CSV bytes (header row included).
pub fn render_report(rows: &[SummaryRow], options: &ReportOptions) -> Result<Vec<u8>, ReconError> {
    let render_err = |e: csv::Error| ReconError::Destination {
        path: None,
        message: format!("cannot render report: {e}"),
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(Vec::new());

    writer.write_record(REPORT_HEADERS).map_err(render_err)?;
    for row in rows {
        writer
            .write_record([
                row.field.clone(),
                row.total.to_string(),
                row.value_mismatches.to_string(),
                row.missing_in_a.to_string(),
                row.missing_in_b.to_string(),
            ])
            .map_err(render_err)?;
    }

    writer.into_inner().map_err(|e| ReconError::Destination {
        path: None,
        message: format!("cannot render report: {}", e.error()),
    })
}
