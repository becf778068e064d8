//! Single-row parser for the tracker table.
//!
//! Column contract, left to right:
//!
//! | # | Column            | Extraction                                  |
//! |---|-------------------|---------------------------------------------|
//! | 0 | Certification     | link text of `[text](url)`, else raw cell   |
//! | 1 | Platform          | raw cell                                    |
//! | 2 | Status            | text inside `<span ...>text</span>`, else raw |
//! | 3 | Target Completion | raw cell, `None` when blank                 |
//!
//! Extra trailing columns are ignored.

use crate::models::{Status, TrackerRow};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Minimum number of cells a data row must carry.
pub const MIN_CELLS: usize = 4;

/// Why a line could not be turned into a [`TrackerRow`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("line is not a table row")]
    NotATableRow,

    #[error("expected at least 4 cells, found {found}")]
    TooFewCells { found: usize },

    #[error("certification cell is empty")]
    EmptyName,
}

fn link_text_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]+)\]").expect("valid regex"))
}

fn span_text_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r">([^<]+)<").expect("valid regex"))
}

/// Split a pipe-delimited line into trimmed cells.
///
/// The outer pipes are optional on the right: `| a | b |` and `| a | b`
/// both yield `["a", "b"]`.
pub fn split_cells(line: &str) -> Result<Vec<&str>, RowError> {
    let inner = line
        .trim()
        .strip_prefix('|')
        .ok_or(RowError::NotATableRow)?;
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    Ok(inner.split('|').map(str::trim).collect())
}

/// True for the `|---|:---:|` row under the header.
pub fn is_separator_row(line: &str) -> bool {
    match split_cells(line) {
        Ok(cells) => cells.iter().all(|c| {
            !c.is_empty() && c.chars().all(|ch| matches!(ch, '-' | ':' | ' '))
        }),
        Err(_) => false,
    }
}

/// True when the line is the tracker's header row.
pub fn is_header_row(line: &str) -> bool {
    split_cells(line)
        .map(|cells| cells.iter().any(|c| *c == "Certification"))
        .unwrap_or(false)
}

/// Parse one data row.
pub fn parse_row(line: &str) -> Result<TrackerRow, RowError> {
    let cells = split_cells(line)?;
    if cells.len() < MIN_CELLS {
        return Err(RowError::TooFewCells { found: cells.len() });
    }

    let name = extract_link_text(cells[0]);
    if name.is_empty() {
        return Err(RowError::EmptyName);
    }

    let status_text = extract_span_text(cells[2]);
    let target_date = match cells[3] {
        "" => None,
        text => Some(text.to_string()),
    };

    Ok(TrackerRow {
        name,
        platform: cells[1].to_string(),
        status: Status::from_text(&status_text),
        target_date,
    })
}

fn extract_link_text(cell: &str) -> String {
    link_text_re()
        .captures(cell)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| cell.to_string())
}

fn extract_span_text(cell: &str) -> String {
    span_text_re()
        .captures(cell)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| cell.to_string())
}
