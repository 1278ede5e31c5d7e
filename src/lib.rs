//! lakeddl: external table and view script generation from column catalogs
//!
//! This library reconciles column metadata between a source-system
//! attribute catalog, a target parquet column catalog and a static
//! default-column registry, reports the discrepancies between them, and
//! renders one external-table/view script pair per configured entity.

pub mod catalog;
pub mod config;
pub mod error;
pub mod mapper;
pub mod reconcile;
pub mod registry;
pub mod script;

use std::path::Path;

use anyhow::Result;
use tracing::{error, info};

use catalog::{CsvWorkbook, SheetReader, SheetWriter};
use config::GeneratorConfig;
use script::{ColumnTiers, EntityScript, RenderOptions};

pub use error::GeneratorError;

/// Discrepancy report sheet names.
pub mod report_sheets {
    pub const IN_SOURCE_NOT_IN_TARGET: &str = "In Source Not In Target";
    pub const IN_SOURCE_NOT_IN_TARGET_EX_VIRTUAL: &str = "In Source Not In Target Ex Virtual";
    pub const MISSING_DEFAULT_COLUMNS: &str = "Missing Default Columns";
    pub const DATATYPE_MISMATCH: &str = "Datatype Mismatch";
}

/// All reconciliation result sets for one run.
#[derive(Debug, Clone)]
pub struct ReconcileReport {
    pub in_source_not_in_target: Vec<reconcile::MissingColumnRow>,
    pub in_source_not_in_target_ex_virtual: Vec<reconcile::MissingColumnRow>,
    pub missing_default_columns: Vec<reconcile::MissingColumnRow>,
    pub datatype_mismatches: Vec<reconcile::TypeMismatchRow>,
}

/// Render the script pair for every configured entity.
///
/// Pure with respect to the filesystem apart from sheet loading: nothing is
/// written. `run_generate` handles persistence.
pub fn generate_entity_scripts(
    config: &GeneratorConfig,
    source_reader: &dyn SheetReader,
    target_reader: &dyn SheetReader,
) -> Result<Vec<EntityScript>, GeneratorError> {
    let source = catalog::load_source_catalog(source_reader, &config.source_sheet_name)?;
    let target = catalog::load_target_catalog(target_reader, &config.target_sheet_name)?;
    info!(
        source_rows = source.len(),
        target_rows = target.len(),
        "loaded catalogs"
    );

    let merged = reconcile::merge_source_with_target(&source, &target);
    let mapped = mapper::map_catalog(&merged);

    let render_opts = RenderOptions {
        schema_name: &config.schema_name,
        data_source: &config.data_source,
        file_format: &config.file_format,
        location_prefix: &config.location_prefix,
    };

    let mut scripts = Vec::with_capacity(config.tables.len());
    for table in &config.tables {
        let entity_columns = reconcile::resolve_entity_columns(&mapped, &table.table_name);
        let membership = reconcile::resolve_membership_defaults(&target, &table.table_name);

        let tiers = ColumnTiers {
            system: script::system_tier(),
            defaults: script::default_tier(config.default_column_tiering, &membership),
            entity: entity_columns.iter().map(|c| c.declaration()).collect(),
        };

        info!(
            entity = %table.table_name,
            entity_columns = tiers.entity.len(),
            default_columns = tiers.defaults.len(),
            "rendering scripts"
        );

        scripts.push(EntityScript {
            table_name: table.table_name.clone(),
            table_script: script::render_external_table(&table.table_name, &tiers, &render_opts),
            view_script: script::render_view(&table.table_name, &config.schema_name),
        });
    }

    Ok(scripts)
}

/// Compute every reconciliation result set.
pub fn build_reconcile_report(
    config: &GeneratorConfig,
    source_reader: &dyn SheetReader,
    target_reader: &dyn SheetReader,
) -> Result<ReconcileReport, GeneratorError> {
    let source = catalog::load_source_catalog(source_reader, &config.source_sheet_name)?;
    let target = catalog::load_target_catalog(target_reader, &config.target_sheet_name)?;
    let default_names =
        catalog::load_default_catalog(target_reader, &config.default_columns_sheet_name)?;

    // The mismatch report is an inner join: target-only columns have no
    // source type to disagree with and must not appear in it.
    let mapped = mapper::map_catalog(&reconcile::annotate_matched_source(&source, &target));

    Ok(ReconcileReport {
        in_source_not_in_target: reconcile::columns_in_source_not_in_target(
            &source, &target, false,
        ),
        in_source_not_in_target_ex_virtual: reconcile::columns_in_source_not_in_target(
            &source, &target, true,
        ),
        missing_default_columns: reconcile::default_columns_missing_in_target(
            &default_names,
            &target,
        ),
        datatype_mismatches: reconcile::datatype_mismatches(&mapped, &target),
    })
}

/// Load the config, render every configured entity's scripts and write
/// them, per entity or combined.
pub fn run_generate(config_path: &Path) -> Result<()> {
    let config = config::load_config(config_path)?;
    let source_reader = CsvWorkbook::new(&config.source_workbook_path);
    let target_reader = CsvWorkbook::new(&config.target_workbook_path);

    let scripts = generate_entity_scripts(&config, &source_reader, &target_reader)?;

    if config.all_scripts_in_one {
        let mut combined_tables = String::new();
        let mut combined_views = String::new();
        for entity in &scripts {
            combined_tables.push_str(&format!("\n{}\n", entity.table_script));
            combined_views.push_str(&format!("\n{}\n", entity.view_script));
        }

        let tables_path = config
            .output_directory
            .join(&config.combined_external_table_script_name);
        let views_path = config.output_directory.join(&config.combined_view_script_name);
        catalog::write_script(&tables_path, &combined_tables)?;
        catalog::write_script(&views_path, &combined_views)?;
        info!(
            tables = %tables_path.display(),
            views = %views_path.display(),
            "wrote combined scripts"
        );
    } else {
        for entity in &scripts {
            write_entity_scripts(&config, entity).map_err(|source| {
                error!(entity = %entity.table_name, "failed to write entity scripts");
                GeneratorError::EntityError {
                    entity: entity.table_name.clone(),
                    source: Box::new(source),
                }
            })?;
        }
        info!(entities = scripts.len(), "wrote per-entity scripts");
    }

    Ok(())
}

fn write_entity_scripts(
    config: &GeneratorConfig,
    entity: &EntityScript,
) -> Result<(), GeneratorError> {
    let table_path = config.output_directory.join(format!(
        "{}{}{}.sql",
        config.table_script_prefix, entity.table_name, config.table_script_suffix
    ));
    let view_path = config.output_directory.join(format!(
        "{}{}{}.sql",
        config.view_script_prefix, entity.table_name, config.view_script_suffix
    ));

    catalog::write_script(&table_path, &entity.table_script)?;
    catalog::write_script(&view_path, &entity.view_script)
}

/// Load the config, reconcile the catalogs and write the discrepancy
/// report sheets into the exception workbook.
pub fn run_reconcile(config_path: &Path) -> Result<()> {
    let config = config::load_config(config_path)?;
    let source_reader = CsvWorkbook::new(&config.source_workbook_path);
    let target_reader = CsvWorkbook::new(&config.target_workbook_path);

    let report = build_reconcile_report(&config, &source_reader, &target_reader)?;
    let writer = CsvWorkbook::new(&config.exception_workbook_path);
    write_reconcile_report(&report, &writer)?;

    info!(
        in_source_not_in_target = report.in_source_not_in_target.len(),
        ex_virtual = report.in_source_not_in_target_ex_virtual.len(),
        missing_defaults = report.missing_default_columns.len(),
        type_mismatches = report.datatype_mismatches.len(),
        "wrote discrepancy report"
    );
    Ok(())
}

/// Write every report sheet through the sheet-writer collaborator.
pub fn write_reconcile_report(
    report: &ReconcileReport,
    writer: &dyn SheetWriter,
) -> Result<(), GeneratorError> {
    let missing_headers = ["Entity Logical Name", "Logical Name"];
    let missing_rows = |rows: &[reconcile::MissingColumnRow]| {
        rows.iter()
            .map(|r| vec![r.entity_name.clone(), r.logical_name.clone()])
            .collect::<Vec<_>>()
    };

    writer.write_sheet(
        report_sheets::IN_SOURCE_NOT_IN_TARGET,
        &missing_headers,
        &missing_rows(&report.in_source_not_in_target),
    )?;
    writer.write_sheet(
        report_sheets::IN_SOURCE_NOT_IN_TARGET_EX_VIRTUAL,
        &missing_headers,
        &missing_rows(&report.in_source_not_in_target_ex_virtual),
    )?;
    writer.write_sheet(
        report_sheets::MISSING_DEFAULT_COLUMNS,
        &missing_headers,
        &missing_rows(&report.missing_default_columns),
    )?;
    writer.write_sheet(
        report_sheets::DATATYPE_MISMATCH,
        &["Entity Logical Name", "Logical Name", "Derived Data Type", "Parquet Data Type"],
        &report
            .datatype_mismatches
            .iter()
            .map(|r| {
                vec![
                    r.entity_name.clone(),
                    r.logical_name.clone(),
                    r.derived_type.clone(),
                    r.target_type.clone(),
                ]
            })
            .collect::<Vec<_>>(),
    )
}
