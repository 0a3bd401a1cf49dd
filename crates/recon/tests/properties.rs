// Property-based tests for reconciliation and summarization.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use csvrecon_engine::model::{Dataset, Difference, DifferenceKind, Row};
use csvrecon_engine::{reconcile_datasets, summarize, ReconError};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

const KEY: &str = "POLICY_NO";

type Fields = BTreeMap<String, String>;

/// Arbitrary value: mostly short text, sometimes empty.
fn arb_value() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => r"[0-9]{1,4}",
        1 => r"[A-Za-z]{1,6}",
        1 => Just(String::new()),
    ]
}

/// Field map over the given non-key columns.
fn arb_fields(columns: &'static [&'static str]) -> impl Strategy<Value = Fields> {
    proptest::collection::vec(arb_value(), columns.len()).prop_map(move |values| {
        columns
            .iter()
            .zip(values)
            .map(|(c, v)| (c.to_string(), v))
            .collect()
    })
}

/// Keyed rows: up to 12 keys drawn from a small space so sides overlap.
fn arb_side(columns: &'static [&'static str]) -> impl Strategy<Value = BTreeMap<String, Fields>> {
    proptest::collection::btree_map(r"0[0-9]{2}", arb_fields(columns), 0..12)
}

fn dataset(source: &str, columns: &[&str], side: &BTreeMap<String, Fields>) -> Dataset {
    let rows = side
        .iter()
        .map(|(key, fields)| {
            let mut fields = fields.clone();
            fields.insert(KEY.to_string(), key.clone());
            Row {
                key: key.clone(),
                fields,
            }
        })
        .collect();
    let mut all_columns = vec![KEY.to_string()];
    all_columns.extend(columns.iter().map(|c| c.to_string()));
    Dataset {
        source: source.to_string(),
        key_field: KEY.to_string(),
        columns: all_columns,
        rows,
    }
}

const COLUMNS_A: &[&str] = &["Amount", "Status"];
const COLUMNS_B: &[&str] = &["Agent", "Amount", "Status"];

fn field<'a>(fields: &'a Fields, column: &str) -> &'a str {
    fields.get(column).map(String::as_str).unwrap_or("")
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn identical_sides_reconcile_clean(side in arb_side(COLUMNS_A)) {
        let a = dataset("a.csv", COLUMNS_A, &side);
        let b = dataset("b.csv", COLUMNS_A, &side);
        prop_assert!(reconcile_datasets(&a, &b).unwrap().is_empty());
    }

    #[test]
    fn one_sided_keys_yield_one_missing_row(
        side_a in arb_side(COLUMNS_A),
        side_b in arb_side(COLUMNS_B),
    ) {
        let diffs = reconcile_datasets(
            &dataset("a.csv", COLUMNS_A, &side_a),
            &dataset("b.csv", COLUMNS_B, &side_b),
        ).unwrap();

        for key in side_a.keys().filter(|k| !side_b.contains_key(*k)) {
            let for_key: Vec<&Difference> = diffs.iter().filter(|d| &d.key == key).collect();
            prop_assert_eq!(for_key.len(), 1);
            prop_assert_eq!(for_key[0].kind, DifferenceKind::MissingInB);
            prop_assert!(for_key[0].is_missing_row());
        }
        for key in side_b.keys().filter(|k| !side_a.contains_key(*k)) {
            let for_key: Vec<&Difference> = diffs.iter().filter(|d| &d.key == key).collect();
            prop_assert_eq!(for_key.len(), 1);
            prop_assert_eq!(for_key[0].kind, DifferenceKind::MissingInA);
        }
    }

    #[test]
    fn matched_keys_count_differing_columns(
        side_a in arb_side(COLUMNS_A),
        side_b in arb_side(COLUMNS_B),
    ) {
        let diffs = reconcile_datasets(
            &dataset("a.csv", COLUMNS_A, &side_a),
            &dataset("b.csv", COLUMNS_B, &side_b),
        ).unwrap();

        for (key, fields_a) in &side_a {
            let Some(fields_b) = side_b.get(key) else { continue };
            let expected = COLUMNS_B
                .iter()
                .filter(|c| field(fields_a, c) != field(fields_b, c))
                .count();
            let actual = diffs
                .iter()
                .filter(|d| &d.key == key && d.kind == DifferenceKind::ValueMismatch)
                .count();
            prop_assert_eq!(actual, expected, "key {}", key);
            prop_assert!(diffs.iter().filter(|d| &d.key == key).all(|d| !d.is_missing_row()));
        }
    }

    #[test]
    fn output_ordered_by_key_then_column(
        side_a in arb_side(COLUMNS_A),
        side_b in arb_side(COLUMNS_B),
    ) {
        let diffs = reconcile_datasets(
            &dataset("a.csv", COLUMNS_A, &side_a),
            &dataset("b.csv", COLUMNS_B, &side_b),
        ).unwrap();

        for pair in diffs.windows(2) {
            let left = (&pair[0].key, &pair[0].column);
            let right = (&pair[1].key, &pair[1].column);
            prop_assert!(left < right, "{:?} should sort before {:?}", left, right);
        }
    }

    #[test]
    fn summarize_ignores_input_order(
        (diffs, shuffled) in (arb_side(COLUMNS_A), arb_side(COLUMNS_B))
            .prop_map(|(side_a, side_b)| {
                reconcile_datasets(
                    &dataset("a.csv", COLUMNS_A, &side_a),
                    &dataset("b.csv", COLUMNS_B, &side_b),
                ).unwrap()
            })
            .prop_flat_map(|diffs| (Just(diffs.clone()), Just(diffs).prop_shuffle())),
    ) {
        prop_assert_eq!(summarize(&diffs), summarize(&shuffled));
    }

    #[test]
    fn summary_totals_partition_kinds(
        side_a in arb_side(COLUMNS_A),
        side_b in arb_side(COLUMNS_B),
    ) {
        let diffs = reconcile_datasets(
            &dataset("a.csv", COLUMNS_A, &side_a),
            &dataset("b.csv", COLUMNS_B, &side_b),
        ).unwrap();
        let rows = summarize(&diffs);

        let fields: BTreeSet<&str> = diffs.iter().map(|d| d.field_label()).collect();
        prop_assert_eq!(rows.len(), fields.len());
        for row in &rows {
            prop_assert_eq!(row.total, row.value_mismatches + row.missing_in_a + row.missing_in_b);
        }
        prop_assert_eq!(rows.iter().map(|r| r.total).sum::<usize>(), diffs.len());
    }

    #[test]
    fn duplicate_key_fails_before_comparison(
        side in arb_side(COLUMNS_A).prop_filter("need a row", |s| !s.is_empty()),
        dup_on_a in any::<bool>(),
    ) {
        let clean = dataset("clean.csv", COLUMNS_A, &side);
        let mut dirty = dataset("dirty.csv", COLUMNS_A, &side);
        let first = dirty.rows[0].clone();
        dirty.rows.push(first);

        let result = if dup_on_a {
            reconcile_datasets(&dirty, &clean)
        } else {
            reconcile_datasets(&clean, &dirty)
        };
        match result {
            Err(ReconError::DuplicateKeys { source_a, source_b }) => {
                prop_assert_eq!(source_a.is_some(), dup_on_a);
                prop_assert_eq!(source_b.is_some(), !dup_on_a);
            }
            other => prop_assert!(false, "expected duplicate keys error, got {:?}", other),
        }
    }
}
