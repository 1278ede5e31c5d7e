//! Catalog data model and typed sheet loading
//!
//! Three catalogs feed a run: the source-system attribute catalog, the
//! target (parquet) column catalog, and the default-column catalog. Each is
//! read once per run and never mutated afterwards.

pub mod sheet;
pub mod workbook;

pub use sheet::Sheet;
pub use workbook::{write_script, CsvWorkbook, SheetReader, SheetWriter};

use crate::error::GeneratorError;

/// Attribute type marking a source column that is computed on read and
/// never materialized in the target files.
pub const VIRTUAL_ATTRIBUTE_TYPE: &str = "Virtual";

/// One row of the source attribute catalog, optionally annotated with the
/// target catalog's primitive type after the catalogs are joined.
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    pub entity_name: String,
    pub logical_name: String,
    pub attribute_type: String,
    /// Free text carrying optional `Precision: N` / `Max length: N` tokens.
    pub additional_data: String,
    pub target_raw_type: Option<String>,
}

impl ColumnDescriptor {
    pub fn is_virtual(&self) -> bool {
        self.attribute_type == VIRTUAL_ATTRIBUTE_TYPE
    }
}

/// One row of the target column catalog.
#[derive(Debug, Clone)]
pub struct TargetColumn {
    pub entity_name: String,
    pub logical_name: String,
    pub column_id: String,
    pub raw_type: String,
}

/// Header names of the source catalog sheet.
pub mod source_headers {
    pub const ENTITY: &str = "Entity Logical Name";
    pub const LOGICAL_NAME: &str = "Logical Name";
    pub const ATTRIBUTE_TYPE: &str = "Attribute Type";
    pub const ADDITIONAL_DATA: &str = "Additional data";
}

/// Header names of the target catalog sheet.
pub mod target_headers {
    pub const ENTITY: &str = "Entity Logical Name";
    pub const LOGICAL_NAME: &str = "Logical Name";
    pub const COLUMN_ID: &str = "Parquet Column Id";
    pub const RAW_TYPE: &str = "Parquet Data Type";
}

/// Header name of the default-column catalog sheet.
pub const DEFAULT_CATALOG_HEADER: &str = "Logical Name";

/// Load the source attribute catalog.
pub fn load_source_catalog(
    reader: &dyn SheetReader,
    sheet_name: &str,
) -> Result<Vec<ColumnDescriptor>, GeneratorError> {
    let sheet = reader.read_sheet(sheet_name)?;
    let entity = sheet.require_column(source_headers::ENTITY)?;
    let logical = sheet.require_column(source_headers::LOGICAL_NAME)?;
    let attr_type = sheet.require_column(source_headers::ATTRIBUTE_TYPE)?;
    let additional = sheet.require_column(source_headers::ADDITIONAL_DATA)?;

    let columns = sheet
        .rows
        .iter()
        .map(|row| ColumnDescriptor {
            entity_name: sheet.cell(row, entity).to_string(),
            logical_name: sheet.cell(row, logical).to_string(),
            attribute_type: sheet.cell(row, attr_type).to_string(),
            additional_data: sheet.cell(row, additional).to_string(),
            target_raw_type: None,
        })
        .collect();

    Ok(columns)
}

/// Load the target column catalog.
pub fn load_target_catalog(
    reader: &dyn SheetReader,
    sheet_name: &str,
) -> Result<Vec<TargetColumn>, GeneratorError> {
    let sheet = reader.read_sheet(sheet_name)?;
    let entity = sheet.require_column(target_headers::ENTITY)?;
    let logical = sheet.require_column(target_headers::LOGICAL_NAME)?;
    let column_id = sheet.require_column(target_headers::COLUMN_ID)?;
    let raw_type = sheet.require_column(target_headers::RAW_TYPE)?;

    let columns = sheet
        .rows
        .iter()
        .map(|row| TargetColumn {
            entity_name: sheet.cell(row, entity).to_string(),
            logical_name: sheet.cell(row, logical).to_string(),
            column_id: sheet.cell(row, column_id).to_string(),
            raw_type: sheet.cell(row, raw_type).to_string(),
        })
        .collect();

    Ok(columns)
}

/// Load the default-column catalog (logical names only).
pub fn load_default_catalog(
    reader: &dyn SheetReader,
    sheet_name: &str,
) -> Result<Vec<String>, GeneratorError> {
    let sheet = reader.read_sheet(sheet_name)?;
    let logical = sheet.require_column(DEFAULT_CATALOG_HEADER)?;

    Ok(sheet
        .rows
        .iter()
        .map(|row| sheet.cell(row, logical).to_string())
        .collect())
}
