//! Student roster import from delimited text.

use std::collections::HashSet;

/// Extract a de-duplicated list of student names from CSV text.
///
/// Only the first column is read, so both single-column lists and wider
/// exports work. A first line mentioning "name" or "student" is treated as a
/// header. Names are compared case-insensitively; the first spelling seen is
/// kept, in input order.
pub fn parse_names_from_csv(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let first = lines.first().map(|l| l.to_lowercase()).unwrap_or_default();
    let start = usize::from(first.contains("name") || first.contains("student"));

    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for line in lines.iter().skip(start) {
        let column = line.split(',').next().unwrap_or("").trim();
        let column = column.strip_prefix('"').unwrap_or(column);
        let column = column.strip_suffix('"').unwrap_or(column);
        let name = column.trim();
        if name.is_empty() {
            continue;
        }
        if seen.insert(name.to_lowercase()) {
            names.push(name.to_string());
        }
    }

    tracing::debug!(count = names.len(), "parsed roster names");
    names
}
