//! Pipe tables.
//!
//! Parsing is deliberately permissive: rows are not padded or truncated to
//! the header width, and alignment markers in the separator row are ignored.

use crate::block::{Row, Table};
use crate::pipeline::inline;

/// `true` for a row made only of `-`, `:`, `|` and whitespace.
pub fn is_separator_row(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c == '-' || c == ':' || c == '|' || c.is_whitespace())
}

/// `true` when a raw line can belong to a pipe table.
pub fn is_table_line(line: &str) -> bool {
    line.contains('|')
}

/// Number of consecutive table lines starting at `lines[start]`.
pub fn run_length(lines: &[&str], start: usize) -> usize {
    lines[start..]
        .iter()
        .take_while(|line| is_table_line(line))
        .count()
}

/// Parse a run of table lines.
///
/// Returns `None` when fewer than two rows remain after separator rows are
/// dropped; the caller decides how to fall back.
pub fn parse(lines: &[&str]) -> Option<Table> {
    let rows: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|line| !line.trim().is_empty() && !is_separator_row(line))
        .collect();

    let (header, body) = rows.split_first()?;
    if body.is_empty() {
        return None;
    }

    Some(Table {
        header: parse_row(header),
        rows: body.iter().map(|row| parse_row(row)).collect(),
    })
}

/// Split a row on `|`, dropping the empty cells produced by the outer
/// delimiters, and tokenize each remaining cell.
pub fn parse_row(row: &str) -> Row {
    let mut cells: Vec<&str> = row.split('|').map(str::trim).collect();
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    cells.into_iter().map(inline::tokenize).collect()
}
