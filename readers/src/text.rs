use std::fs;
use std::path::Path;

use crate::error::{ReadError, Result};

pub(crate) fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| ReadError::io(path, e))
}

/// Non-empty rows of whitespace separated tokens.
pub(crate) fn rows(text: &str) -> impl Iterator<Item = Vec<&str>> {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>())
        .filter(|tokens| !tokens.is_empty())
}

/// Parses a row of numbers. The recorder appends a text label to some rows,
/// so a trailing token that is not a number is dropped.
pub(crate) fn numeric_row(tokens: &[&str]) -> std::result::Result<Vec<f32>, String> {
    let tokens = match tokens.split_last() {
        Some((last, rest)) if last.parse::<f32>().is_err() => rest,
        _ => tokens,
    };

    tokens
        .iter()
        .map(|tok| {
            tok.parse::<f32>()
                .map_err(|_| format!("invalid number '{}'", tok))
        })
        .collect()
}
