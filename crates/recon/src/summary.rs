use std::collections::BTreeMap;

use crate::model::{Difference, DifferenceKind, KindTally, SummaryRow};

/// Group differences by field (sentinel mapped to its label) and count each kind.
/// Rows come back ascending by field name.
pub fn summarize(differences: &[Difference]) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<&str, SummaryRow> = BTreeMap::new();

    for diff in differences {
        let field = diff.field_label();
        let entry = groups.entry(field).or_insert_with(|| SummaryRow {
            field: field.to_string(),
            ..SummaryRow::default()
        });
        entry.total += 1;
        match diff.kind {
            DifferenceKind::ValueMismatch => entry.value_mismatches += 1,
            DifferenceKind::MissingInA => entry.missing_in_a += 1,
            DifferenceKind::MissingInB => entry.missing_in_b += 1,
        }
    }

    groups.into_values().collect()
}

/// Count differences per kind.
pub fn tally_kinds(differences: &[Difference]) -> KindTally {
    let mut tally = KindTally::default();
    for diff in differences {
        match diff.kind {
            DifferenceKind::ValueMismatch => tally.value_mismatches += 1,
            DifferenceKind::MissingInA => tally.missing_in_a += 1,
            DifferenceKind::MissingInB => tally.missing_in_b += 1,
        }
    }
    tally
}
