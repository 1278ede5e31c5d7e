//! Unit tests for the catalog reconciliation operations

use lakeddl::catalog::{ColumnDescriptor, TargetColumn};
use lakeddl::mapper::{map_catalog, MappedColumn, ResolvedType};
use lakeddl::reconcile::{
    annotate_matched_source, columns_in_source_not_in_target, datatype_mismatches,
    default_columns_missing_in_target, merge_source_with_target, resolve_entity_columns,
    resolve_membership_defaults,
};

fn source_column(entity: &str, logical: &str, attr: &str) -> ColumnDescriptor {
    ColumnDescriptor {
        entity_name: entity.to_string(),
        logical_name: logical.to_string(),
        attribute_type: attr.to_string(),
        additional_data: String::new(),
        target_raw_type: None,
    }
}

fn target_column(entity: &str, logical: &str, raw_type: &str) -> TargetColumn {
    TargetColumn {
        entity_name: entity.to_string(),
        logical_name: logical.to_string(),
        column_id: "1".to_string(),
        raw_type: raw_type.to_string(),
    }
}

fn mapped_column(entity: &str, logical: &str, data_type: &str) -> MappedColumn {
    MappedColumn {
        entity_name: entity.to_string(),
        logical_name: logical.to_string(),
        resolved: ResolvedType {
            data_type: data_type.to_string(),
            size: None,
            precision: None,
        },
    }
}

// ============================================================================
// Source-not-in-target Tests
// ============================================================================

#[test]
fn test_source_not_in_target_basic() {
    let source = vec![
        source_column("E1", "colA", "Text"),
        source_column("E1", "colB", "Text"),
    ];
    let target = vec![target_column("E1", "colA", "VARCHAR(8000)")];

    let missing = columns_in_source_not_in_target(&source, &target, false);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].entity_name, "E1");
    assert_eq!(missing[0].logical_name, "colB");
}

#[test]
fn test_source_not_in_target_join_is_case_insensitive_on_logical_name() {
    let source = vec![source_column("E1", "ColA", "Text")];
    let target = vec![target_column("E1", "cola", "VARCHAR(8000)")];

    let missing = columns_in_source_not_in_target(&source, &target, false);
    assert!(missing.is_empty(), "case difference must not report a missing column");
}

#[test]
fn test_source_not_in_target_matches_entity_exactly() {
    let source = vec![source_column("E1", "colA", "Text")];
    let target = vec![target_column("E2", "colA", "VARCHAR(8000)")];

    let missing = columns_in_source_not_in_target(&source, &target, false);
    assert_eq!(missing.len(), 1, "same column under another entity is not a match");
}

#[test]
fn test_source_not_in_target_virtual_variant() {
    let source = vec![
        source_column("E1", "real", "Text"),
        source_column("E1", "ghost", "Virtual"),
    ];
    let target: Vec<TargetColumn> = Vec::new();

    let all = columns_in_source_not_in_target(&source, &target, false);
    assert_eq!(all.len(), 2);

    let ex_virtual = columns_in_source_not_in_target(&source, &target, true);
    assert_eq!(ex_virtual.len(), 1);
    assert_eq!(ex_virtual[0].logical_name, "real");
}

// ============================================================================
// Default-not-in-target Tests
// ============================================================================

#[test]
fn test_default_missing_reports_per_entity() {
    let defaults = vec!["statecode".to_string(), "createdon".to_string()];
    let target = vec![
        target_column("account", "name", "VARCHAR(8000)"),
        target_column("contact", "statecode", "int"),
    ];

    let missing = default_columns_missing_in_target(&defaults, &target);

    // account misses both defaults, contact misses one
    let account: Vec<&str> = missing
        .iter()
        .filter(|r| r.entity_name == "account")
        .map(|r| r.logical_name.as_str())
        .collect();
    assert_eq!(account, vec!["statecode", "createdon"]);

    let contact: Vec<&str> = missing
        .iter()
        .filter(|r| r.entity_name == "contact")
        .map(|r| r.logical_name.as_str())
        .collect();
    assert_eq!(contact, vec!["createdon"]);
}

#[test]
fn test_default_missing_is_case_insensitive() {
    let defaults = vec!["StateCode".to_string()];
    let target = vec![target_column("account", "statecode", "int")];

    let missing = default_columns_missing_in_target(&defaults, &target);
    assert!(missing.is_empty());
}

#[test]
fn test_default_missing_dedupes_repeated_catalog_entries() {
    // A repeated default-catalog entry must yield one report row per entity
    let defaults = vec![
        "statecode".to_string(),
        "StateCode".to_string(),
        "statecode".to_string(),
    ];
    let target = vec![target_column("account", "name", "VARCHAR(8000)")];

    let missing = default_columns_missing_in_target(&defaults, &target);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].logical_name, "statecode");
}

#[test]
fn test_default_missing_two_columns_one_entity() {
    let defaults = vec!["statecode".to_string(), "statuscode".to_string()];
    let target = vec![target_column("account", "name", "VARCHAR(8000)")];

    let missing = default_columns_missing_in_target(&defaults, &target);
    assert_eq!(missing.len(), 2);
    assert!(missing.iter().all(|r| r.entity_name == "account"));
}

// ============================================================================
// Merge Tests
// ============================================================================

#[test]
fn test_merge_keeps_exactly_target_columns() {
    let source = vec![
        source_column("E1", "onlysource", "Text"),
        source_column("E1", "shared", "Lookup"),
    ];
    let target = vec![
        target_column("E1", "shared", "VARCHAR(8000)"),
        target_column("E1", "onlytarget", "int"),
    ];

    let merged = merge_source_with_target(&source, &target);
    let names: Vec<&str> = merged.iter().map(|d| d.logical_name.as_str()).collect();
    assert_eq!(names, vec!["shared", "onlytarget"]);

    assert_eq!(merged[0].attribute_type, "Lookup");
    assert_eq!(merged[0].target_raw_type.as_deref(), Some("VARCHAR(8000)"));
    assert_eq!(merged[1].attribute_type, "", "target-only rows have no source annotation");
}

#[test]
fn test_annotate_matched_source_keeps_only_matched_source_rows() {
    let source = vec![
        source_column("E1", "onlysource", "Text"),
        source_column("E1", "shared", "Lookup"),
        source_column("E1", "ghost", "Virtual"),
    ];
    let target = vec![
        target_column("E1", "shared", "VARCHAR(8000)"),
        target_column("E1", "onlytarget", "int"),
        target_column("E1", "ghost", "int"),
    ];

    let matched = annotate_matched_source(&source, &target);
    let names: Vec<&str> = matched.iter().map(|d| d.logical_name.as_str()).collect();
    assert_eq!(names, vec!["shared"], "no target-only or virtual rows");
    assert_eq!(matched[0].target_raw_type.as_deref(), Some("VARCHAR(8000)"));
}

#[test]
fn test_merge_drops_virtual_source_rows() {
    let source = vec![source_column("E1", "shared", "Virtual")];
    let target = vec![target_column("E1", "shared", "int")];

    let merged = merge_source_with_target(&source, &target);
    // The target row survives, but without the virtual source annotation
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].attribute_type, "");
}

// ============================================================================
// Entity Column Resolution Tests
// ============================================================================

#[test]
fn test_resolve_entity_columns_filters_entity_and_exclusions() {
    let mapped = vec![
        mapped_column("account", "name", "NVARCHAR(160)"),
        mapped_column("account", "StateCode", "INTEGER"),
        mapped_column("contact", "fullname", "NVARCHAR(100)"),
    ];

    let resolved = resolve_entity_columns(&mapped, "account");
    let names: Vec<&str> = resolved.iter().map(|c| c.logical_name.as_str()).collect();
    assert_eq!(names, vec!["name"], "excluded and foreign-entity columns must be dropped");
}

#[test]
fn test_resolve_entity_columns_is_idempotent() {
    let mapped = vec![
        mapped_column("account", "name", "NVARCHAR(160)"),
        mapped_column("account", "versionnumber", "BIGINT"),
        mapped_column("account", "accountnumber", "NVARCHAR(20)"),
    ];

    let once: Vec<MappedColumn> = resolve_entity_columns(&mapped, "account")
        .into_iter()
        .cloned()
        .collect();
    let twice = resolve_entity_columns(&once, "account");

    let names_once: Vec<&str> = once.iter().map(|c| c.logical_name.as_str()).collect();
    let names_twice: Vec<&str> = twice.iter().map(|c| c.logical_name.as_str()).collect();
    assert_eq!(names_once, names_twice);
    assert_eq!(names_once, vec!["name", "accountnumber"]);
}

#[test]
fn test_resolve_entity_columns_preserves_source_order() {
    let mapped = vec![
        mapped_column("account", "zeta", "VARCHAR(50)"),
        mapped_column("account", "alpha", "VARCHAR(50)"),
        mapped_column("account", "mid", "VARCHAR(50)"),
    ];

    let resolved = resolve_entity_columns(&mapped, "account");
    let names: Vec<&str> = resolved.iter().map(|c| c.logical_name.as_str()).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

// ============================================================================
// Membership Default Tests
// ============================================================================

#[test]
fn test_membership_defaults_follow_target_presence() {
    let target = vec![
        target_column("account", "createdbyname", "VARCHAR(8000)"),
        target_column("account", "entityimageid", "VARCHAR(8000)"),
        // present for another entity only
        target_column("contact", "modifiedbyname", "VARCHAR(8000)"),
    ];

    let resolved = resolve_membership_defaults(&target, "account");
    let names: Vec<&str> = resolved.iter().map(|c| c.logical_name).collect();
    // Registry declaration order, not target order
    assert_eq!(names, vec!["createdbyname", "entityimageid"]);
}

#[test]
fn test_membership_defaults_are_case_insensitive() {
    let target = vec![target_column("account", "CreatedByName", "VARCHAR(8000)")];

    let resolved = resolve_membership_defaults(&target, "account");
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].logical_name, "createdbyname");
}

#[test]
fn test_membership_defaults_never_include_inline_columns() {
    let target = vec![target_column("account", "statecode", "int")];

    let resolved = resolve_membership_defaults(&target, "account");
    assert!(resolved.is_empty(), "inline columns are not membership-resolved");
}

// ============================================================================
// Datatype Mismatch Tests
// ============================================================================

#[test]
fn test_datatype_mismatch_reports_differing_inner_join_rows() {
    let mapped = vec![
        mapped_column("E1", "matching", "INTEGER"),
        mapped_column("E1", "differing", "NVARCHAR(160)"),
        mapped_column("E1", "sourceonly", "VARCHAR(50)"),
    ];
    let target = vec![
        target_column("E1", "matching", "integer"),
        target_column("E1", "differing", "VARCHAR(8000)"),
        target_column("E1", "targetonly", "int"),
    ];

    let mismatches = datatype_mismatches(&mapped, &target);
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].logical_name, "differing");
    assert_eq!(mismatches[0].derived_type, "NVARCHAR(160)");
    assert_eq!(mismatches[0].target_type, "VARCHAR(8000)");
}

#[test]
fn test_datatype_mismatch_never_reports_target_only_columns() {
    // A column with no source counterpart has no derived type to compare:
    // mapping the inner-joined catalog must produce an empty report even
    // though the target carries unmatched rows.
    let source = vec![source_column("account", "name", "Lookup")];
    let target = vec![
        target_column("account", "name", "VARCHAR(50)"),
        target_column("account", "targetonly", "int"),
    ];

    let mapped = map_catalog(&annotate_matched_source(&source, &target));
    let mismatches = datatype_mismatches(&mapped, &target);
    assert!(
        mismatches.is_empty(),
        "target-only columns must not be reported: {:?}",
        mismatches
    );
}

// ============================================================================
// End-to-end Mapping Tests
// ============================================================================

#[test]
fn test_map_catalog_over_merged_rows() {
    let source = vec![
        source_column("account", "revenue", "Currency"),
        source_column("account", "name", "Text"),
    ];
    let mut source = source;
    source[0].additional_data = "Precision: 4".to_string();
    source[1].additional_data = "Max length: 160".to_string();

    let target = vec![
        target_column("account", "revenue", "decimal"),
        target_column("account", "name", "VARCHAR(8000)"),
    ];

    let mapped = map_catalog(&merge_source_with_target(&source, &target));
    assert_eq!(mapped[0].declaration(), "revenue DECIMAL(38,4)");
    assert_eq!(mapped[1].declaration(), "name NVARCHAR(160)");
}
