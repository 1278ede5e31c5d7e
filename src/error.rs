//! Error types for lakeddl

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during catalog reconciliation and script generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Failed to read config file: {path}")]
    ConfigReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {path}")]
    ConfigParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Sheet '{sheet}' not found in workbook {path}")]
    SheetNotFound { path: PathBuf, sheet: String },

    #[error("Failed to read sheet '{sheet}' from {path}")]
    SheetReadError {
        path: PathBuf,
        sheet: String,
        #[source]
        source: csv::Error,
    },

    #[error("Sheet '{sheet}' is missing expected column '{column}'")]
    MissingColumn { sheet: String, column: String },

    #[error("Failed to write sheet '{sheet}' to {path}")]
    SheetWriteError {
        path: PathBuf,
        sheet: String,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write script to {path}")]
    ScriptWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output directory {path}")]
    OutputDirError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Script generation failed for entity '{entity}'")]
    EntityError {
        entity: String,
        #[source]
        source: Box<GeneratorError>,
    },
}
