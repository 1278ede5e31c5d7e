//! In-memory sheet model
//!
//! A sheet is a header row plus string cells. The core only ever addresses
//! cells by header name; a missing header is a fatal configuration error.

use crate::error::GeneratorError;

/// One loaded worksheet.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Sheet {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Index of a header, or a `MissingColumn` error naming the sheet.
    pub fn require_column(&self, header: &str) -> Result<usize, GeneratorError> {
        self.headers
            .iter()
            .position(|h| h == header)
            .ok_or_else(|| GeneratorError::MissingColumn {
                sheet: self.name.clone(),
                column: header.to_string(),
            })
    }

    /// Cell content, trimmed. Short rows read as empty cells.
    pub fn cell<'a>(&'a self, row: &'a [String], index: usize) -> &'a str {
        row.get(index).map(|s| s.trim()).unwrap_or("")
    }
}
