use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use log::{info, warn};

use crate::config::CompareConfig;
use crate::duplicates::find_duplicate_keys;
use crate::error::{DuplicateKeys, ReconError};
use crate::loader::load;
use crate::model::{Dataset, Difference, DifferenceKind, Row, MISSING_ROW_COLUMN};

/// Compare two CSV files by `key_field` with default load options.
pub fn reconcile(
    path_a: &Path,
    path_b: &Path,
    key_field: &str,
) -> Result<Vec<Difference>, ReconError> {
    let config = CompareConfig {
        key_field: key_field.to_string(),
        ..CompareConfig::default()
    };
    reconcile_with(path_a, path_b, &config)
}

/// Compare two CSV files per `config`. Any load error aborts the whole comparison.
pub fn reconcile_with(
    path_a: &Path,
    path_b: &Path,
    config: &CompareConfig,
) -> Result<Vec<Difference>, ReconError> {
    let options = config.load_options();
    let dataset_a = load(path_a, &config.key_field, &options)?;
    let dataset_b = load(path_b, &config.key_field, &options)?;
    reconcile_datasets(&dataset_a, &dataset_b)
}

/// Align two loaded datasets by key and diff every shared key field by field.
///
/// Both datasets must be keyed by the same field name. Both sides are checked
/// for duplicate keys before anything is compared; duplicates on either side
/// fail the whole comparison.
///
/// A row present on one side only yields one `__missing__` difference. The
/// side holding the row gets its preview (`File 1 data: ...` in `value_a`, or
/// `File 2 data: ...` in `value_b`); the other side reads `No record in <file>`.
pub fn reconcile_datasets(
    dataset_a: &Dataset,
    dataset_b: &Dataset,
) -> Result<Vec<Difference>, ReconError> {
    if dataset_a.key_field != dataset_b.key_field {
        return Err(ReconError::ConfigValidation(format!(
            "{} is keyed by '{}' but {} is keyed by '{}'",
            dataset_a.source, dataset_a.key_field, dataset_b.source, dataset_b.key_field
        )));
    }
    let key_field = dataset_a.key_field.as_str();

    let source_a = duplicates_of(dataset_a, key_field);
    let source_b = duplicates_of(dataset_b, key_field);
    if source_a.is_some() || source_b.is_some() {
        return Err(ReconError::DuplicateKeys { source_a, source_b });
    }

    let lookup_a = index_by_key(&dataset_a.rows);
    let lookup_b = index_by_key(&dataset_b.rows);

    let all_keys: BTreeSet<&str> = lookup_a.keys().chain(lookup_b.keys()).copied().collect();
    let columns: Vec<&str> = column_universe(dataset_a, dataset_b)
        .into_iter()
        .filter(|c| *c != key_field)
        .collect();

    let key_count = all_keys.len();
    let mut differences = Vec::new();
    for key in all_keys {
        match (lookup_a.get(key), lookup_b.get(key)) {
            (Some(row_a), None) => differences.push(Difference {
                key: key.to_string(),
                column: MISSING_ROW_COLUMN.to_string(),
                value_a: format!("File 1 data: {}", row_preview(row_a, &columns)),
                value_b: format!("No record in {}", dataset_b.source),
                kind: DifferenceKind::MissingInB,
            }),
            (None, Some(row_b)) => differences.push(Difference {
                key: key.to_string(),
                column: MISSING_ROW_COLUMN.to_string(),
                value_a: format!("No record in {}", dataset_a.source),
                value_b: format!("File 2 data: {}", row_preview(row_b, &columns)),
                kind: DifferenceKind::MissingInA,
            }),
            (Some(row_a), Some(row_b)) => {
                compare_fields(key, row_a, row_b, &columns, &mut differences)
            }
            (None, None) => {}
        }
    }

    info!(
        "{} vs {}: {} keys compared, {} differences",
        dataset_a.source,
        dataset_b.source,
        key_count,
        differences.len()
    );

    Ok(differences)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn duplicates_of(dataset: &Dataset, key_field: &str) -> Option<DuplicateKeys> {
    let keys = find_duplicate_keys(&dataset.rows, key_field);
    if keys.is_empty() {
        return None;
    }
    warn!("{}: {} duplicate key value(s)", dataset.source, keys.len());
    Some(DuplicateKeys {
        source: dataset.source.clone(),
        keys,
    })
}

fn index_by_key(rows: &[Row]) -> HashMap<&str, &Row> {
    rows.iter().map(|row| (row.key.as_str(), row)).collect()
}

/// Every column seen in either dataset, ascending.
fn column_universe<'a>(dataset_a: &'a Dataset, dataset_b: &'a Dataset) -> BTreeSet<&'a str> {
    let mut columns = BTreeSet::new();
    for dataset in [dataset_a, dataset_b] {
        columns.extend(dataset.columns.iter().map(String::as_str));
        for row in &dataset.rows {
            columns.extend(row.fields.keys().map(String::as_str));
        }
    }
    columns
}

fn compare_fields(
    key: &str,
    row_a: &Row,
    row_b: &Row,
    columns: &[&str],
    out: &mut Vec<Difference>,
) {
    for column in columns {
        let value_a = row_a.get(column);
        let value_b = row_b.get(column);
        if value_a != value_b {
            out.push(Difference {
                key: key.to_string(),
                column: column.to_string(),
                value_a: value_a.to_string(),
                value_b: value_b.to_string(),
                kind: DifferenceKind::ValueMismatch,
            });
        }
    }
}

/// Non-empty `column=value` pairs of a row, excluding the key.
fn row_preview(row: &Row, columns: &[&str]) -> String {
    let parts: Vec<String> = columns
        .iter()
        .filter_map(|column| {
            let value = row.get(column);
            (!value.is_empty()).then(|| format!("{column}={value}"))
        })
        .collect();
    if parts.is_empty() {
        "no data".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{parse_dataset, LoadOptions};

    fn dataset(label: &str, csv: &str) -> Dataset {
        parse_dataset(label, csv, "POLICY_NO", &LoadOptions::default()).unwrap()
    }

    fn summary(diffs: &[Difference]) -> Vec<(&str, &str, DifferenceKind)> {
        diffs
            .iter()
            .map(|d| (d.key.as_str(), d.column.as_str(), d.kind))
            .collect()
    }

    #[test]
    fn value_mismatches() {
        let a = dataset("a.csv", "POLICY_NO,Amount,Status\n001,100,Active\n002,200,Active\n");
        let b = dataset("b.csv", "POLICY_NO,Amount,Status\n001,150,Active\n002,200,Closed\n");

        let diffs = reconcile_datasets(&a, &b).unwrap();
        assert_eq!(
            summary(&diffs),
            vec![
                ("001", "Amount", DifferenceKind::ValueMismatch),
                ("002", "Status", DifferenceKind::ValueMismatch),
            ]
        );
        assert_eq!(diffs[0].value_a, "100");
        assert_eq!(diffs[0].value_b, "150");
    }

    #[test]
    fn row_missing_in_a() {
        let a = dataset("a.csv", "POLICY_NO,Amount\n001,100\n");
        let b = dataset("b.csv", "POLICY_NO,Amount\n001,100\n002,200\n");

        let diffs = reconcile_datasets(&a, &b).unwrap();
        assert_eq!(diffs.len(), 1);
        let diff = &diffs[0];
        assert_eq!(diff.key, "002");
        assert_eq!(diff.column, MISSING_ROW_COLUMN);
        assert_eq!(diff.kind, DifferenceKind::MissingInA);
        assert_eq!(diff.value_a, "No record in a.csv");
        assert_eq!(diff.value_b, "File 2 data: Amount=200");
    }

    #[test]
    fn row_missing_in_b_without_data() {
        let a = dataset("a.csv", "POLICY_NO,Amount\n001,100\n003,\n");
        let b = dataset("b.csv", "POLICY_NO,Amount\n001,100\n");

        let diffs = reconcile_datasets(&a, &b).unwrap();
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DifferenceKind::MissingInB);
        assert_eq!(diffs[0].value_a, "File 1 data: no data");
        assert_eq!(diffs[0].value_b, "No record in b.csv");
    }

    #[test]
    fn column_only_in_one_file_compared_against_empty() {
        let a = dataset("a.csv", "POLICY_NO,Amount,Agent\n001,100,Smith\n002,200,\n");
        let b = dataset("b.csv", "POLICY_NO,Amount\n001,100\n002,200\n");

        let diffs = reconcile_datasets(&a, &b).unwrap();
        assert_eq!(summary(&diffs), vec![("001", "Agent", DifferenceKind::ValueMismatch)]);
        assert_eq!(diffs[0].value_b, "");
    }

    #[test]
    fn key_case_differs_between_files() {
        let options = LoadOptions::default();
        let a = parse_dataset("a.csv", "policy_no,Amount\n001,1\n", "POLICY_NO", &options).unwrap();
        let b = dataset("b.csv", "POLICY_NO,Amount\n001,1\n");
        assert!(reconcile_datasets(&a, &b).unwrap().is_empty());
    }

    #[test]
    fn mismatches_ordered_by_key_then_column() {
        let a = dataset("a.csv", "POLICY_NO,Zeta,Alpha\n002,1,1\n001,1,1\n");
        let b = dataset("b.csv", "POLICY_NO,Alpha,Zeta\n001,2,2\n002,2,2\n");

        let diffs = reconcile_datasets(&a, &b).unwrap();
        assert_eq!(
            summary(&diffs),
            vec![
                ("001", "Alpha", DifferenceKind::ValueMismatch),
                ("001", "Zeta", DifferenceKind::ValueMismatch),
                ("002", "Alpha", DifferenceKind::ValueMismatch),
                ("002", "Zeta", DifferenceKind::ValueMismatch),
            ]
        );
    }

    #[test]
    fn duplicates_reported_for_both_sides() {
        let a = dataset("a.csv", "POLICY_NO,Amount\n001,100\n001,150\n");
        let b = dataset("b.csv", "POLICY_NO,Amount\n002,1\n002,2\n003,1\n003,1\n");

        match reconcile_datasets(&a, &b).unwrap_err() {
            ReconError::DuplicateKeys { source_a, source_b } => {
                let source_a = source_a.unwrap();
                assert_eq!(source_a.source, "a.csv");
                assert_eq!(source_a.keys, vec!["001"]);
                assert_eq!(source_b.unwrap().keys, vec!["002", "003"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn datasets_keyed_by_different_fields_are_rejected() {
        let options = LoadOptions::default();
        let a = parse_dataset("a.csv", "POLICY_NO,ID,Amount\n001,001,1\n", "POLICY_NO", &options)
            .unwrap();
        let b = parse_dataset("b.csv", "POLICY_NO,ID,Amount\n001,001,1\n", "ID", &options)
            .unwrap();

        match reconcile_datasets(&a, &b).unwrap_err() {
            ReconError::ConfigValidation(msg) => {
                assert!(msg.contains("'POLICY_NO'"), "{msg}");
                assert!(msg.contains("'ID'"), "{msg}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn identical_datasets_have_no_differences() {
        let csv = "POLICY_NO,Amount,Status\n001,100,Active\n002,,Closed\n";
        let a = dataset("a.csv", csv);
        let b = dataset("b.csv", csv);
        assert!(reconcile_datasets(&a, &b).unwrap().is_empty());
    }
}
