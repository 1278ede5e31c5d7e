//! External table and view script rendering
//!
//! Pure string assembly: the renderer receives an entity name plus its
//! resolved column tiers and produces the script text. The identity,
//! version and delete-flag column names are fixed conventions shared with
//! the parquet export pipeline, not parameters.

use std::collections::HashSet;

use crate::config::TieringMode;
use crate::registry::{DefaultColumn, DefaultTier, DEFAULT_METADATA, PARQUET_METADATA};

/// Column every view de-duplicates on.
pub const IDENTITY_COLUMN: &str = "Id";
/// Monotonically increasing column picking the latest row per identity.
pub const VERSION_COLUMN: &str = "versionnumber";
/// Soft-delete flag; rows with it set are filtered out of the view.
pub const DELETE_FLAG_COLUMN: &str = "IsDelete";

/// The three ordered column tiers of one external table, each entry a full
/// declaration (`name TYPE`).
#[derive(Debug, Clone, Default)]
pub struct ColumnTiers {
    /// Parquet creation metadata, always present.
    pub system: Vec<String>,
    /// Default metadata, resolved per tiering mode.
    pub defaults: Vec<String>,
    /// Entity-specific columns in source-catalog order.
    pub entity: Vec<String>,
}

impl ColumnTiers {
    /// All declarations in rendering order.
    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.system.iter().chain(&self.defaults).chain(&self.entity)
    }
}

/// Fixed rendering parameters shared by every entity in a run.
#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    pub schema_name: &'a str,
    pub data_source: &'a str,
    pub file_format: &'a str,
    pub location_prefix: &'a str,
}

/// The rendered output pair for one entity.
#[derive(Debug, Clone)]
pub struct EntityScript {
    pub table_name: String,
    pub table_script: String,
    pub view_script: String,
}

/// The always-present system tier.
pub fn system_tier() -> Vec<String> {
    PARQUET_METADATA.iter().map(|c| c.declaration()).collect()
}

/// The default-metadata tier for one entity. Under single tiering every
/// registry entry is rendered; under split tiering membership-tier entries
/// are kept only when present in `membership_present`. Registry declaration
/// order is preserved either way.
pub fn default_tier(mode: TieringMode, membership_present: &[&DefaultColumn]) -> Vec<String> {
    match mode {
        TieringMode::Single => DEFAULT_METADATA.iter().map(|c| c.declaration()).collect(),
        TieringMode::Split => {
            let present: HashSet<&str> = membership_present
                .iter()
                .map(|c| c.logical_name)
                .collect();
            DEFAULT_METADATA
                .iter()
                .filter(|c| c.tier == DefaultTier::Inline || present.contains(c.logical_name))
                .map(|c| c.declaration())
                .collect()
        }
    }
}

/// Render the external table definition over the versioned parquet files.
pub fn render_external_table(table_name: &str, tiers: &ColumnTiers, opts: &RenderOptions) -> String {
    let location = format!(
        "{}/{}_partitioned/PartitionId=*/*.snappy.parquet",
        opts.location_prefix, table_name
    );

    let system = tiers.system.join(",\n\t\t");
    let defaults = tiers.defaults.join(",\n\t\t");
    let entity = tiers.entity.join(",\n\t\t");

    format!(
        "\nCREATE EXTERNAL TABLE {schema}.[{table}_raw] \n\
         (\n\
         \t\t/** Parquet Creation Metadata **/\n\n\
         \t\t{system},\n\n\
         \t\t/** Data **/\n\
         \t\t/** Default Metadata **/\n\n\
         \t\t{defaults},\n\n\
         \t\t/** Entity Specific Metadata **/\n\n\
         \t\t{entity}\n\
         )\n\
         WITH (\n    \
         DATA_SOURCE = {data_source},\n    \
         LOCATION = N'{location}',\n    \
         FILE_FORMAT = {file_format},\n    \
         REJECT_TYPE = VALUE,\n    \
         REJECT_VALUE = 0\n\
         )\n\n\
         GO\n",
        schema = opts.schema_name,
        table = table_name,
        system = system,
        defaults = defaults,
        entity = entity,
        data_source = opts.data_source,
        location = location,
        file_format = opts.file_format,
    )
}

/// Render the deduplicating view over the external table: latest version
/// per identity, soft-deleted rows filtered out.
pub fn render_view(table_name: &str, schema_name: &str) -> String {
    format!(
        "\nCREATE VIEW {schema}.{table} \n\
         AS\n\
         SELECT * \n  \
         FROM \n    \
         (\n        \
         SELECT *, ROW_NUMBER() OVER (PARTITION BY {identity} ORDER BY {version} DESC) as _row_id\n          \
         FROM {schema}.[{table}_raw]\n    \
         ) AS A\n \
         WHERE A._row_id = 1\n   \
         AND A.{delete_flag} IS NULL\n\n\
         GO\n",
        schema = schema_name,
        table = table_name,
        identity = IDENTITY_COLUMN,
        version = VERSION_COLUMN,
        delete_flag = DELETE_FLAG_COLUMN,
    )
}
