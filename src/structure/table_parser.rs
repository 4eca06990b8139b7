use std::sync::LazyLock;

use regex::Regex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

static SEPARATOR_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|[\s\-:|]+\|$").expect("separator pattern is valid"));

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableModel {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub num_cols: usize,
    /// Number of rows including the header row.
    pub num_rows: usize,
}

impl TableModel {
    /// Every row of the table, header first.
    pub fn all_rows(&self) -> impl Iterator<Item = &Vec<String>> { std::iter::once(&self.headers).chain(&self.rows) }
}

pub(crate) fn is_table_row(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 2 && line.starts_with('|') && line.ends_with('|')
}

/// `|---|:--:|` style lines separating the header from the body. A line of
/// bare pipes and spaces is not a separator.
pub(crate) fn is_separator_row(line: &str) -> bool {
    let line = line.trim();
    SEPARATOR_ROW.is_match(line) && line.contains('-')
}

/// Splits a pipe-delimited row into trimmed cells. `\|` is a literal pipe.
pub(crate) fn split_cells(line: &str) -> Vec<String> {
    let line = line.trim();
    let inner = line
        .strip_prefix('|')
        .and_then(|rest| rest.strip_suffix('|'))
        .unwrap_or(line);

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('|') => cell.push('|'),
                Some(other) => {
                    cell.push('\\');
                    cell.push(other);
                }
                None => cell.push('\\'),
            },
            '|' => cells.push(std::mem::take(&mut cell).trim().to_owned()),
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_owned());

    cells
}

/// Parses a pipe-delimited markdown table into a [`TableModel`].
///
/// Every non-blank line has to be a table row. Separator rows are dropped
/// wherever they appear and the first remaining row becomes the header.
/// Short rows are padded with empty cells up to the widest row.
///
/// ```
/// use redline_text::parse_table;
///
/// let table = parse_table("| A | B |\n|---|---|\n| 1 | 2 |").unwrap();
/// assert_eq!(table.headers, vec!["A", "B"]);
/// assert_eq!(table.rows, vec![vec!["1", "2"]]);
/// ```
#[must_use]
pub fn parse_table(content: &str) -> Option<TableModel> {
    let lines = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>();

    if lines.is_empty() || !lines.iter().all(|line| is_table_row(line)) {
        return None;
    }

    let mut rows = lines
        .into_iter()
        .filter(|line| !is_separator_row(line))
        .map(split_cells)
        .collect::<Vec<_>>();

    if rows.is_empty() {
        return None;
    }

    let num_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(num_cols, String::new());
    }

    let headers = rows.remove(0);

    Some(TableModel {
        num_rows: rows.len() + 1,
        headers,
        rows,
        num_cols,
    })
}
