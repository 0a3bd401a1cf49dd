// Output rendering for `csvrecon compare` and `csvrecon summary`.
// Pure functions: differences in, text/bytes out. No clap, no IO.

use csvrecon_engine::model::{Difference, DifferenceKind, SummaryRow};
use csvrecon_engine::tally_kinds;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a table cell may grow before it is truncated.
const MAX_CELL_WIDTH: usize = 40;

const KIND_ORDER: [DifferenceKind; 3] = [
    DifferenceKind::ValueMismatch,
    DifferenceKind::MissingInA,
    DifferenceKind::MissingInB,
];

// ---------------------------------------------------------------------------
// Differences
// ---------------------------------------------------------------------------

/// Differences as aligned text, one section per difference kind.
/// Rows keep their key/column order inside each section.
pub fn differences_table(differences: &[Difference], file_a: &str, file_b: &str) -> String {
    let headers = [
        "Key".to_string(),
        "Field".to_string(),
        format!("Value {file_a}"),
        format!("Value {file_b}"),
    ];

    let mut out = String::new();
    for kind in KIND_ORDER {
        let rows: Vec<[&str; 4]> = differences
            .iter()
            .filter(|d| d.kind == kind)
            .map(|d| [d.key.as_str(), d.field_label(), d.value_a.as_str(), d.value_b.as_str()])
            .collect();
        if rows.is_empty() {
            continue;
        }

        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("{} ({})\n", kind.label(), rows.len()));

        let header_refs = headers.each_ref().map(String::as_str);
        let widths = column_widths(&header_refs, &rows);
        push_line(&mut out, &header_refs, &widths);
        push_rule(&mut out, &widths);
        for row in &rows {
            push_line(&mut out, row, &widths);
        }
    }
    out
}

/// Differences as a pretty JSON array.
pub fn differences_json(differences: &[Difference]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(differences)
}

/// Differences as CSV: key, column, kind, value_a, value_b.
pub fn differences_csv(differences: &[Difference], delimiter: u8) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    writer.write_record(["key", "column", "kind", "value_a", "value_b"])?;
    for d in differences {
        let kind = d.kind.to_string();
        writer.write_record([
            d.key.as_str(),
            d.column.as_str(),
            kind.as_str(),
            d.value_a.as_str(),
            d.value_b.as_str(),
        ])?;
    }
    writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))
}

/// One-line status: total, file names, and a per-kind breakdown.
pub fn status_line(differences: &[Difference], file_a: &str, file_b: &str) -> String {
    if differences.is_empty() {
        return format!("No differences found. File 1: {file_a}. File 2: {file_b}.");
    }

    let tally = tally_kinds(differences);
    let mut details = Vec::new();
    if tally.value_mismatches > 0 {
        details.push(format!("value mismatches: {}", tally.value_mismatches));
    }
    if tally.missing_in_a > 0 {
        details.push(format!("missing rows in file 1: {}", tally.missing_in_a));
    }
    if tally.missing_in_b > 0 {
        details.push(format!("missing rows in file 2: {}", tally.missing_in_b));
    }

    format!(
        "Total differences: {}. File 1: {file_a}. File 2: {file_b}. Breakdown: {}.",
        tally.total(),
        details.join("; ")
    )
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

pub fn summary_table(rows: &[SummaryRow]) -> String {
    let headers = ["Field", "Total", "Mismatch", "Missing 1", "Missing 2"];
    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|r| {
            [
                r.field.clone(),
                r.total.to_string(),
                r.value_mismatches.to_string(),
                r.missing_in_a.to_string(),
                r.missing_in_b.to_string(),
            ]
        })
        .collect();
    let cell_refs: Vec<[&str; 5]> = cells
        .iter()
        .map(|r| r.each_ref().map(String::as_str))
        .collect();

    let widths = column_widths(&headers, &cell_refs);
    let mut out = String::new();
    push_line(&mut out, &headers, &widths);
    push_rule(&mut out, &widths);
    for row in &cell_refs {
        push_line(&mut out, row, &widths);
    }
    out
}

pub fn summary_json(rows: &[SummaryRow]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(rows)
}

// ---------------------------------------------------------------------------
// Table helpers
// ---------------------------------------------------------------------------

fn column_widths<const N: usize>(headers: &[&str; N], rows: &[[&str; N]]) -> [usize; N] {
    let mut widths = (*headers).map(|h| h.width());
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.width());
        }
    }
    widths.map(|w| w.min(MAX_CELL_WIDTH))
}

fn push_line(out: &mut String, cells: &[&str], widths: &[usize]) {
    let padded: Vec<String> = cells.iter().zip(widths).map(|(c, w)| fit(c, *w)).collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}

fn push_rule(out: &mut String, widths: &[usize]) {
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
}

/// Pad `s` to exactly `width` display columns, truncating with ".." when wider.
fn fit(s: &str, width: usize) -> String {
    let sw = s.width();
    if sw <= width {
        return format!("{s}{}", " ".repeat(width - sw));
    }
    if width < 3 {
        return ".".repeat(width);
    }

    // Leave two columns for ".."
    let budget = width - 2;
    let mut used = 0;
    let mut cut = String::new();
    for ch in s.chars() {
        let cw = ch.width().unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        cut.push(ch);
    }
    format!("{cut}..{}", " ".repeat(budget - used))
}
