//! Set-based reconciliation between the three catalogs
//!
//! All joins key on (entity name, logical name) with the logical name
//! compared case-insensitively; entity names match exactly. No operation
//! reorders columns within a tier: source-derived output follows source row
//! order, default-derived output follows registry/catalog declaration
//! order.

use std::collections::{HashMap, HashSet};

use crate::catalog::{ColumnDescriptor, TargetColumn};
use crate::mapper::MappedColumn;
use crate::registry::{self, DefaultColumn, DefaultTier, DEFAULT_METADATA};

/// A (entity, column) pair found in one catalog but not another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingColumnRow {
    pub entity_name: String,
    pub logical_name: String,
}

/// A column whose derived type disagrees with the target catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatchRow {
    pub entity_name: String,
    pub logical_name: String,
    pub derived_type: String,
    pub target_type: String,
}

fn join_key(entity: &str, logical: &str) -> (String, String) {
    (entity.to_string(), logical.to_lowercase())
}

fn target_key_set(target: &[TargetColumn]) -> HashSet<(String, String)> {
    target
        .iter()
        .map(|c| join_key(&c.entity_name, &c.logical_name))
        .collect()
}

/// Source columns with no target-catalog counterpart (left join, keep
/// unmatched). With `exclude_virtual`, non-materialized source rows are
/// dropped before joining.
pub fn columns_in_source_not_in_target(
    source: &[ColumnDescriptor],
    target: &[TargetColumn],
    exclude_virtual: bool,
) -> Vec<MissingColumnRow> {
    let target_keys = target_key_set(target);

    source
        .iter()
        .filter(|d| !(exclude_virtual && d.is_virtual()))
        .filter(|d| !target_keys.contains(&join_key(&d.entity_name, &d.logical_name)))
        .map(|d| MissingColumnRow {
            entity_name: d.entity_name.clone(),
            logical_name: d.logical_name.clone(),
        })
        .collect()
}

/// Default-catalog columns absent from the target catalog, computed per
/// distinct target entity. Entities are visited in order of first
/// appearance in the target catalog; missing names follow default-catalog
/// declaration order, deduplicated case-insensitively (first occurrence
/// wins) so a repeated catalog entry yields one report row per entity.
pub fn default_columns_missing_in_target(
    default_names: &[String],
    target: &[TargetColumn],
) -> Vec<MissingColumnRow> {
    let mut entities = Vec::new();
    let mut columns_by_entity: HashMap<&str, HashSet<String>> = HashMap::new();
    for column in target {
        let entry = columns_by_entity.entry(column.entity_name.as_str());
        if matches!(entry, std::collections::hash_map::Entry::Vacant(_)) {
            entities.push(column.entity_name.as_str());
        }
        entry.or_default().insert(column.logical_name.to_lowercase());
    }

    let mut defaults = Vec::new();
    let mut seen = HashSet::new();
    for name in default_names {
        let folded = name.to_lowercase();
        if seen.insert(folded.clone()) {
            defaults.push(folded);
        }
    }

    let mut report = Vec::new();
    for entity in entities {
        let present = &columns_by_entity[entity];
        for name in &defaults {
            if !present.contains(name) {
                report.push(MissingColumnRow {
                    entity_name: entity.to_string(),
                    logical_name: name.clone(),
                });
            }
        }
    }
    report
}

/// Inner-join source and target and report rows whose derived type differs
/// from the target catalog's raw type (case-insensitive comparison).
pub fn datatype_mismatches(
    mapped: &[MappedColumn],
    target: &[TargetColumn],
) -> Vec<TypeMismatchRow> {
    let target_types: HashMap<(String, String), &str> = target
        .iter()
        .map(|c| (join_key(&c.entity_name, &c.logical_name), c.raw_type.as_str()))
        .collect();

    mapped
        .iter()
        .filter_map(|column| {
            let target_type =
                target_types.get(&join_key(&column.entity_name, &column.logical_name))?;
            if column.resolved.data_type.eq_ignore_ascii_case(target_type) {
                None
            } else {
                Some(TypeMismatchRow {
                    entity_name: column.entity_name.clone(),
                    logical_name: column.logical_name.clone(),
                    derived_type: column.resolved.data_type.clone(),
                    target_type: target_type.to_string(),
                })
            }
        })
        .collect()
}

/// Annotate the source catalog with target primitive types, keeping only
/// the source rows with a target-catalog match (inner-join semantics).
///
/// Non-materialized ("Virtual") source rows are dropped before joining;
/// matched rows keep source row order.
pub fn annotate_matched_source(
    source: &[ColumnDescriptor],
    target: &[TargetColumn],
) -> Vec<ColumnDescriptor> {
    let target_types: HashMap<(String, String), &str> = target
        .iter()
        .map(|c| (join_key(&c.entity_name, &c.logical_name), c.raw_type.as_str()))
        .collect();

    source
        .iter()
        .filter(|d| !d.is_virtual())
        .filter_map(|descriptor| {
            let key = join_key(&descriptor.entity_name, &descriptor.logical_name);
            target_types.get(&key).map(|raw_type| {
                let mut annotated = descriptor.clone();
                annotated.target_raw_type = Some(raw_type.to_string());
                annotated
            })
        })
        .collect()
}

/// Annotate the source catalog with target primitive types, keeping exactly
/// the columns present in the target catalog (right-join semantics).
///
/// Non-materialized ("Virtual") source rows are dropped before joining.
/// Matched rows keep source row order; target-only rows follow in target
/// row order with an empty attribute type, which the type mapper resolves
/// through its catch-all rule.
pub fn merge_source_with_target(
    source: &[ColumnDescriptor],
    target: &[TargetColumn],
) -> Vec<ColumnDescriptor> {
    let mut merged = annotate_matched_source(source, target);

    let matched_keys: HashSet<(String, String)> = merged
        .iter()
        .map(|d| join_key(&d.entity_name, &d.logical_name))
        .collect();

    for column in target {
        let key = join_key(&column.entity_name, &column.logical_name);
        if !matched_keys.contains(&key) {
            merged.push(ColumnDescriptor {
                entity_name: column.entity_name.clone(),
                logical_name: column.logical_name.clone(),
                attribute_type: String::new(),
                additional_data: String::new(),
                target_raw_type: Some(column.raw_type.clone()),
            });
        }
    }

    merged
}

/// Resolve the entity-specific column tier: the mapped catalog restricted
/// to one entity, minus any logical name on the exclusion list. Row order
/// is preserved; the filter is idempotent.
pub fn resolve_entity_columns<'a>(
    mapped: &'a [MappedColumn],
    entity_name: &str,
) -> Vec<&'a MappedColumn> {
    mapped
        .iter()
        .filter(|c| c.entity_name == entity_name)
        .filter(|c| !registry::is_excluded(&c.logical_name))
        .collect()
}

/// Resolve which membership-tier default columns the target catalog
/// actually carries for one entity (inner-join semantics). Result follows
/// registry declaration order.
pub fn resolve_membership_defaults(
    target: &[TargetColumn],
    entity_name: &str,
) -> Vec<&'static DefaultColumn> {
    let present: HashSet<String> = target
        .iter()
        .filter(|c| c.entity_name == entity_name)
        .map(|c| c.logical_name.to_lowercase())
        .collect();

    DEFAULT_METADATA
        .iter()
        .filter(|c| c.tier == DefaultTier::Membership)
        .filter(|c| present.contains(&c.logical_name.to_lowercase()))
        .collect()
}
