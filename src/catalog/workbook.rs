//! Workbook access behind narrow traits
//!
//! The core never touches files directly: it reads sheets through
//! [`SheetReader`] and writes report sheets through [`SheetWriter`].
//! [`CsvWorkbook`] realizes a workbook as a directory of CSV files, one
//! file per sheet, named `<Sheet Name>.csv`.

use std::fs;
use std::path::{Path, PathBuf};

use super::sheet::Sheet;
use crate::error::GeneratorError;

/// Loads a named sheet from a workbook.
pub trait SheetReader {
    fn read_sheet(&self, sheet: &str) -> Result<Sheet, GeneratorError>;
}

/// Writes a named sheet into a workbook.
pub trait SheetWriter {
    fn write_sheet(
        &self,
        sheet: &str,
        headers: &[&str],
        rows: &[Vec<String>],
    ) -> Result<(), GeneratorError>;
}

/// A workbook stored as a directory of CSV files.
#[derive(Debug, Clone)]
pub struct CsvWorkbook {
    path: PathBuf,
}

impl CsvWorkbook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvWorkbook { path: path.into() }
    }

    fn sheet_path(&self, sheet: &str) -> PathBuf {
        self.path.join(format!("{}.csv", sheet))
    }
}

impl SheetReader for CsvWorkbook {
    fn read_sheet(&self, sheet: &str) -> Result<Sheet, GeneratorError> {
        let path = self.sheet_path(sheet);
        if !path.is_file() {
            return Err(GeneratorError::SheetNotFound {
                path: self.path.clone(),
                sheet: sheet.to_string(),
            });
        }

        let read_err = |source| GeneratorError::SheetReadError {
            path: path.clone(),
            sheet: sheet.to_string(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&path)
            .map_err(read_err)?;

        let headers = reader
            .headers()
            .map_err(read_err)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(read_err)?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }

        Ok(Sheet::new(sheet, headers, rows))
    }
}

impl SheetWriter for CsvWorkbook {
    fn write_sheet(
        &self,
        sheet: &str,
        headers: &[&str],
        rows: &[Vec<String>],
    ) -> Result<(), GeneratorError> {
        fs::create_dir_all(&self.path).map_err(|source| GeneratorError::OutputDirError {
            path: self.path.clone(),
            source,
        })?;

        let path = self.sheet_path(sheet);
        let write_err = |source| GeneratorError::SheetWriteError {
            path: path.clone(),
            sheet: sheet.to_string(),
            source,
        };

        let mut writer = csv::Writer::from_path(&path).map_err(write_err)?;
        writer.write_record(headers).map_err(write_err)?;
        for row in rows {
            writer.write_record(row).map_err(write_err)?;
        }
        writer.flush().map_err(|source| GeneratorError::SheetWriteError {
            path: path.clone(),
            sheet: sheet.to_string(),
            source: csv::Error::from(source),
        })?;

        Ok(())
    }
}

/// Write one rendered script, creating the parent directory if needed.
pub fn write_script(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| GeneratorError::OutputDirError {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| GeneratorError::ScriptWriteError {
        path: path.to_path_buf(),
        source,
    })
}
