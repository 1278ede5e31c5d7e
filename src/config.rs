//! Run configuration loaded from a JSON file
//!
//! Key names follow the camelCase convention of the original hand-maintained
//! config files, so existing configs keep working.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::GeneratorError;

/// How the default-metadata column tier is resolved during rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieringMode {
    /// Every default-metadata column is rendered inline for every entity.
    #[default]
    Single,
    /// Inline-tagged columns are always rendered; membership-tagged columns
    /// are rendered only when the entity's target catalog contains them.
    Split,
}

impl std::str::FromStr for TieringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" => Ok(TieringMode::Single),
            "split" => Ok(TieringMode::Split),
            _ => Err(format!("Unknown tiering mode: {} (expected single|split)", s)),
        }
    }
}

/// One entity selected for script generation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableEntry {
    pub table_name: String,
}

/// Full run configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Workbook holding the source-system attribute catalog.
    pub source_workbook_path: PathBuf,
    #[serde(default = "default_source_sheet")]
    pub source_sheet_name: String,

    /// Workbook holding the target (parquet) column catalog and the
    /// default-column catalog.
    pub target_workbook_path: PathBuf,
    #[serde(default = "default_target_sheet")]
    pub target_sheet_name: String,
    #[serde(default = "default_defaults_sheet")]
    pub default_columns_sheet_name: String,

    /// Workbook that receives the discrepancy report sheets.
    pub exception_workbook_path: PathBuf,

    /// Directory that receives the generated .sql files.
    pub output_directory: PathBuf,

    pub schema_name: String,
    pub data_source: String,
    pub file_format: String,
    pub location_prefix: String,

    #[serde(default)]
    pub table_script_prefix: String,
    #[serde(default)]
    pub table_script_suffix: String,
    #[serde(default)]
    pub view_script_prefix: String,
    #[serde(default)]
    pub view_script_suffix: String,

    #[serde(default = "default_combined_table_name")]
    pub combined_external_table_script_name: String,
    #[serde(default = "default_combined_view_name")]
    pub combined_view_script_name: String,

    /// Concatenate all scripts into the two combined files instead of
    /// writing one pair of files per entity.
    #[serde(default)]
    pub all_scripts_in_one: bool,

    #[serde(default)]
    pub default_column_tiering: TieringMode,

    pub tables: Vec<TableEntry>,
}

fn default_source_sheet() -> String {
    "Metadata".to_string()
}

fn default_target_sheet() -> String {
    "Parquet_Metadata".to_string()
}

fn default_defaults_sheet() -> String {
    "Default Metadata".to_string()
}

fn default_combined_table_name() -> String {
    "all_external_tables.sql".to_string()
}

fn default_combined_view_name() -> String {
    "all_views.sql".to_string()
}

/// Load and validate a run configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<GeneratorConfig, GeneratorError> {
    let content = fs::read_to_string(path).map_err(|source| GeneratorError::ConfigReadError {
        path: path.to_path_buf(),
        source,
    })?;

    let config: GeneratorConfig =
        serde_json::from_str(&content).map_err(|source| GeneratorError::ConfigParseError {
            path: path.to_path_buf(),
            source,
        })?;

    if config.tables.is_empty() {
        return Err(GeneratorError::InvalidConfig {
            message: "'tables' must list at least one entity".to_string(),
        });
    }

    Ok(config)
}
