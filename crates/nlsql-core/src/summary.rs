//! Markdown table rendering of query results

use serde_json::Value;

use crate::exec::QueryResult;

/// Default number of body rows shown in a summary.
pub const DEFAULT_DISPLAY_ROWS: usize = 20;

/// Render a bounded Markdown table preview of `result`.
///
/// Returns `None` when the result has no columns (a statement that produced
/// nothing tabular gets no summary, not an empty one). Rows beyond `cap` are
/// silently omitted; there is no truncation marker. Pure; cannot fail.
pub fn summarize(result: &QueryResult, cap: usize) -> Option<String> {
    if result.columns.is_empty() {
        return None;
    }

    let header = format!("| {} |", result.columns.join(" | "));
    let separator = format!(
        "| {} |",
        vec!["---"; result.columns.len()].join(" | ")
    );

    let mut lines = vec![header, separator];
    for row in result.rows.iter().take(cap) {
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }

    Some(lines.join("\n"))
}

/// Default scalar-to-text contract for table cells: strings render raw
/// (unquoted), NULL renders as an empty cell, everything else uses its JSON
/// display form.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
