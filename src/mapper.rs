//! Source-attribute to target-storage type derivation
//!
//! The mapping is an ordered rule table: each rule pairs a predicate over
//! the column descriptor with a resolver producing the storage type. Rules
//! are evaluated in declaration order and the first match wins — several
//! categories overlap (e.g. a bit-typed target column whose source
//! attribute is "Two Options"), so order is load-bearing. The table ends in
//! a catch-all, making derivation total.
//!
//! Missing `Precision:` / `Max length:` tokens never raise: each such case
//! resolves to a documented fallback and logs a warning.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::catalog::ColumnDescriptor;

/// Scale used for Currency/Decimal columns whose descriptor carries no
/// `Precision:` token.
pub const FALLBACK_DECIMAL_SCALE: u32 = 6;

/// Width threshold above which a text column becomes unbounded.
pub const MAX_BOUNDED_TEXT_WIDTH: u32 = 8000;

static PRECISION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Precision:\s*(\d+)").unwrap());
static MAX_LENGTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Max length:\s*(\d+)").unwrap());

/// The storage type derived for one source column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// Full type text, e.g. `VARCHAR(50)` or `DECIMAL(38,4)`. Never empty.
    pub data_type: String,
    /// Parsed `Max length:` value, when one was present.
    pub size: Option<u32>,
    /// Decimal scale actually used, when the type carries one.
    pub precision: Option<u32>,
}

impl ResolvedType {
    fn plain(data_type: &str) -> Self {
        ResolvedType {
            data_type: data_type.to_string(),
            size: None,
            precision: None,
        }
    }
}

/// A source column with its derived storage type.
#[derive(Debug, Clone)]
pub struct MappedColumn {
    pub entity_name: String,
    pub logical_name: String,
    pub resolved: ResolvedType,
}

impl MappedColumn {
    /// The column as it appears in a table definition.
    pub fn declaration(&self) -> String {
        format!("{} {}", self.logical_name, self.resolved.data_type)
    }
}

type Predicate = fn(&ColumnDescriptor) -> bool;
type Resolver = fn(&ColumnDescriptor) -> ResolvedType;

/// Ordered type-derivation rules; first match wins.
static RULES: &[(Predicate, Resolver)] = &[
    // Boolean-marked target columns take priority over the source type.
    (
        |d| target_type_is(d, "bit"),
        |_| ResolvedType::plain("INTEGER"),
    ),
    (
        |d| d.attribute_type.eq_ignore_ascii_case("BigInt"),
        |_| ResolvedType::plain("BIGINT"),
    ),
    // Generic large-text target columns get a bounded width unless the
    // source attribute carries its own width semantics.
    (
        |d| {
            target_type_is(d, "VARCHAR(8000)")
                && !attr_in(d, &["Uniqueidentifier", "DateTime", "Text", "Multiline Text"])
        },
        |_| ResolvedType::plain("VARCHAR(100)"),
    ),
    (
        |d| target_type_is(d, "FLOAT") || d.attribute_type == "Double",
        |_| ResolvedType::plain("FLOAT"),
    ),
    (
        |d| attr_in(d, &["Choice", "State", "Status", "ManagedProperty", "Whole number"]),
        |_| ResolvedType::plain("INTEGER"),
    ),
    (
        |d| attr_in(d, &["Currency", "Decimal"]),
        resolve_decimal,
    ),
    (
        |d| {
            attr_in(
                d,
                &["Customer", "EntityName", "Lookup", "Owner", "Uniqueidentifier", "DateTime"],
            )
        },
        |_| ResolvedType::plain("VARCHAR(50)"),
    ),
    (
        |d| d.attribute_type == "Multiline Text",
        resolve_multiline_text,
    ),
    (
        |d| d.attribute_type == "PartyList",
        |_| ResolvedType::plain("VARCHAR(100)"),
    ),
    (
        |d| d.attribute_type == "Two Options",
        |_| ResolvedType::plain("VARCHAR(5)"),
    ),
    (
        |d| d.attribute_type == "Text",
        resolve_text,
    ),
    // Catch-all: Virtual and every unrecognized attribute type.
    (
        |_| true,
        |_| ResolvedType::plain("VARCHAR(50)"),
    ),
];

/// Derive the target storage type for one source column descriptor.
///
/// Total over its input: the rule table ends in a catch-all and token parse
/// failures resolve to fallbacks, so this never fails and never produces an
/// empty type.
pub fn derive_type(descriptor: &ColumnDescriptor) -> ResolvedType {
    for (matches, resolve) in RULES {
        if matches(descriptor) {
            return resolve(descriptor);
        }
    }
    // The last rule always matches.
    unreachable!("type rule table must end in a catch-all")
}

/// Derive types for every column of an annotated catalog.
pub fn map_catalog(catalog: &[ColumnDescriptor]) -> Vec<MappedColumn> {
    catalog
        .iter()
        .map(|descriptor| MappedColumn {
            entity_name: descriptor.entity_name.clone(),
            logical_name: descriptor.logical_name.clone(),
            resolved: derive_type(descriptor),
        })
        .collect()
}

fn target_type_is(descriptor: &ColumnDescriptor, marker: &str) -> bool {
    descriptor
        .target_raw_type
        .as_deref()
        .is_some_and(|t| t.eq_ignore_ascii_case(marker))
}

fn attr_in(descriptor: &ColumnDescriptor, types: &[&str]) -> bool {
    types.iter().any(|t| descriptor.attribute_type == *t)
}

fn parse_token(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// A zero width is no width: `NVARCHAR(0)` is not a valid column type, so
/// the text resolvers treat `Max length: 0` like a missing token. Decimal
/// scale is unaffected (`DECIMAL(38,0)` is valid).
fn parse_width(text: &str) -> Option<u32> {
    parse_token(&MAX_LENGTH_RE, text).filter(|&width| width > 0)
}

fn resolve_decimal(descriptor: &ColumnDescriptor) -> ResolvedType {
    let scale = match parse_token(&PRECISION_RE, &descriptor.additional_data) {
        Some(scale) => scale,
        None => {
            warn!(
                entity = %descriptor.entity_name,
                column = %descriptor.logical_name,
                "no 'Precision:' token in additional data, using scale {}",
                FALLBACK_DECIMAL_SCALE
            );
            FALLBACK_DECIMAL_SCALE
        }
    };
    ResolvedType {
        data_type: format!("DECIMAL(38,{})", scale),
        size: None,
        precision: Some(scale),
    }
}

fn resolve_multiline_text(descriptor: &ColumnDescriptor) -> ResolvedType {
    match parse_width(&descriptor.additional_data) {
        Some(size) if size > MAX_BOUNDED_TEXT_WIDTH => ResolvedType {
            data_type: "VARCHAR(MAX)".to_string(),
            size: Some(size),
            precision: None,
        },
        Some(size) => ResolvedType {
            data_type: format!("NVARCHAR({})", size),
            size: Some(size),
            precision: None,
        },
        None => {
            warn!(
                entity = %descriptor.entity_name,
                column = %descriptor.logical_name,
                "no usable 'Max length:' value in additional data, using VARCHAR(50)"
            );
            ResolvedType::plain("VARCHAR(50)")
        }
    }
}

fn resolve_text(descriptor: &ColumnDescriptor) -> ResolvedType {
    match parse_width(&descriptor.additional_data) {
        Some(size) => ResolvedType {
            data_type: format!("NVARCHAR({})", size),
            size: Some(size),
            precision: None,
        },
        None => {
            warn!(
                entity = %descriptor.entity_name,
                column = %descriptor.logical_name,
                "no usable 'Max length:' value in additional data, using VARCHAR(50)"
            );
            ResolvedType::plain("VARCHAR(50)")
        }
    }
}
