//! Static registries of system-injected columns
//!
//! Two fixed catalogs are injected into every external table: the parquet
//! creation metadata written by the export pipeline itself, and the default
//! metadata columns every source entity carries. The exclusion list keeps
//! both sets out of the entity-specific column tier.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Rendering tier of a default-metadata column under split tiering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultTier {
    /// Rendered for every entity.
    Inline,
    /// Rendered only when the entity's target catalog contains the column.
    Membership,
}

/// A system-injected column: declared name, SQL type, and tier.
#[derive(Debug, Clone, Copy)]
pub struct DefaultColumn {
    pub logical_name: &'static str,
    pub sql_type: &'static str,
    pub tier: DefaultTier,
}

impl DefaultColumn {
    /// The column as it appears in a table definition, e.g. `statecode INTEGER`.
    pub fn declaration(&self) -> String {
        format!("{} {}", self.logical_name, self.sql_type)
    }
}

const fn inline(logical_name: &'static str, sql_type: &'static str) -> DefaultColumn {
    DefaultColumn {
        logical_name,
        sql_type,
        tier: DefaultTier::Inline,
    }
}

const fn membership(logical_name: &'static str, sql_type: &'static str) -> DefaultColumn {
    DefaultColumn {
        logical_name,
        sql_type,
        tier: DefaultTier::Membership,
    }
}

/// Columns the parquet export pipeline adds to every file. Always rendered
/// first; `[Id]` and `versionnumber` drive view de-duplication and
/// `IsDelete` drives soft-delete filtering.
pub static PARQUET_METADATA: &[DefaultColumn] = &[
    inline("[Id]", "VARCHAR(50)"),
    inline("SinkCreatedOn", "VARCHAR(50)"),
    inline("SinkModifiedOn", "VARCHAR(50)"),
    inline("versionnumber", "BigInt"),
    inline("IsDelete", "VARCHAR(10)"),
    inline("createdonpartition", "VARCHAR(50)"),
    inline("uniquedscid", "VARCHAR(50)"),
];

/// Default metadata columns carried by every source entity. The audit and
/// state columns are materialized unconditionally by the target store
/// (Inline); the display name, yomi and image columns only exist for some
/// entities and are resolved per entity under split tiering (Membership).
pub static DEFAULT_METADATA: &[DefaultColumn] = &[
    inline("statecode", "INTEGER"),
    inline("statuscode", "INTEGER"),
    inline("createdby", "VARCHAR(50)"),
    inline("createdby_entitytype", "VARCHAR(100)"),
    inline("createdonbehalfby", "VARCHAR(50)"),
    inline("createdonbehalfby_entitytype", "VARCHAR(100)"),
    inline("modifiedby", "VARCHAR(50)"),
    inline("modifiedby_entitytype", "VARCHAR(100)"),
    inline("modifiedonbehalfby", "VARCHAR(50)"),
    inline("modifiedonbehalfby_entitytype", "VARCHAR(100)"),
    inline("organizationid", "VARCHAR(50)"),
    inline("organizationid_entitytype", "VARCHAR(100)"),
    membership("createdbyname", "VARCHAR(100)"),
    membership("createdbyyominame", "VARCHAR(100)"),
    inline("createdon", "VARCHAR(50)"),
    membership("createdonbehalfbyname", "VARCHAR(100)"),
    membership("createdonbehalfbyyominame", "VARCHAR(100)"),
    membership("modifiedbyname", "VARCHAR(100)"),
    membership("modifiedbyyominame", "VARCHAR(100)"),
    inline("modifiedon", "VARCHAR(50)"),
    membership("modifiedonbehalfbyname", "VARCHAR(100)"),
    membership("modifiedonbehalfbyyominame", "VARCHAR(100)"),
    membership("entityimage_timestamp", "VARCHAR(50)"),
    membership("entityimage_url", "VARCHAR(200)"),
    membership("entityimageid", "VARCHAR(50)"),
    inline("importsequencenumber", "INTEGER"),
    inline("overriddencreatedon", "VARCHAR(50)"),
];

/// Logical names that must never appear in the entity-specific tier
/// because a parquet or default metadata column already covers them.
/// Mixed casing is historical; all matching is case-insensitive.
pub static EXCLUSION_LIST: &[&str] = &[
    "StateCode",
    "StatusCode",
    "CreatedBy",
    "CreatedBy_EntityType",
    "CreatedOnBehalfBy",
    "CreatedOnBehalfBy_EntityType",
    "ModifiedBy",
    "ModifiedBy_EntityType",
    "ModifiedOnBehalfBy",
    "ModifiedOnBehalfBy_EntityType",
    "OrganizationId",
    "OrganizationId_EntityType",
    "CreatedByName",
    "CreatedByYomiName",
    "CreatedOn",
    "CreatedOnBehalfByName",
    "CreatedOnBehalfByYominame",
    "ModifiedByName",
    "ModifiedByYomiName",
    "ModifiedOn",
    "ModifiedOnBehalfByName",
    "ModifiedOnBehalfByYomiName",
    "EntityImage_Timestamp",
    "EntityImage_Url",
    "EntityImageid",
    "ImportSequenceNumber",
    "OverriddenCreatedOn",
    "id",
    "SinkCreatedOn",
    "SinkModifiedOn",
    "VersionNumber",
    "isDelete",
    "CreatedOnPartition",
    "UniqueDscId",
];

/// Lower-cased first token of every exclusion entry, built once.
static EXCLUSION_SET: LazyLock<HashSet<String>> = LazyLock::new(|| {
    EXCLUSION_LIST
        .iter()
        .map(|entry| {
            entry
                .split_whitespace()
                .next()
                .unwrap_or(entry)
                .to_lowercase()
        })
        .collect()
});

/// Whether a logical name is shadowed by a system-injected column.
/// Case-insensitive; matches each list entry's first whitespace token.
pub fn is_excluded(logical_name: &str) -> bool {
    EXCLUSION_SET.contains(&logical_name.trim().to_lowercase())
}
