use std::collections::HashMap;

use crate::model::Row;

/// Key values that occur more than once, each reported once at its second occurrence.
pub fn find_duplicate_keys(rows: &[Row], key_field: &str) -> Vec<String> {
    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    let mut duplicates = Vec::new();
    for row in rows {
        let key = row.get(key_field);
        let count = occurrences.entry(key).or_insert(0);
        *count += 1;
        if *count == 2 {
            duplicates.push(key.to_string());
        }
    }
    duplicates
}
