//! Schema record types: wire-format column records and their normalized form

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A full schema: table name mapped to its column records, as read from a
/// schema file or assembled by live introspection. Table order is
/// irrelevant; column order within a table drives emitted property order.
pub type Schema = BTreeMap<String, Vec<RawColumn>>;

/// Nullability marker as it appears on the wire.
///
/// The information-schema views report nullability as the labels
/// `YES`/`NO`, and schema files are documented to use the same labels, but
/// records assembled programmatically have historically carried plain
/// booleans. The create and update rule builders read this marker through
/// two different lenses ([`is_yes`](Self::is_yes) vs
/// [`is_truthy`](Self::is_truthy)) that agree on `Label("YES")` and
/// disagree elsewhere; see the validator module before touching either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NullableMarker {
    Flag(bool),
    Label(String),
}

impl NullableMarker {
    pub fn yes() -> Self {
        Self::Label("YES".to_string())
    }

    pub fn no() -> Self {
        Self::Label("NO".to_string())
    }

    /// Strict reading: only the literal label `YES` counts as nullable.
    pub fn is_yes(&self) -> bool {
        matches!(self, Self::Label(label) if label == "YES")
    }

    /// Loose reading: any truthy marker counts as nullable. The label `NO`
    /// is a non-empty string and therefore truthy under this reading.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Label(label) => !label.is_empty(),
        }
    }
}

/// One column record in wire format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawColumn {
    pub column_name: String,
    pub data_type: String,
    pub is_nullable: NullableMarker,
    pub is_foreign_key: bool,
    pub referenced_table_name: Option<String>,
}

/// A normalized column descriptor, the shape the emitters consume.
///
/// Distinct from [`RawColumn`] on purpose: the wire shape and the emitter
/// shape are connected only by [`ColumnDescriptor::from_raw`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub db_type: String,
    pub is_nullable: NullableMarker,
    pub is_foreign_key: bool,
    pub referenced_table: Option<String>,
}

impl ColumnDescriptor {
    /// Rename the wire-format fields into the descriptor shape
    pub fn from_raw(raw: &RawColumn) -> Self {
        Self {
            name: raw.column_name.clone(),
            db_type: raw.data_type.clone(),
            is_nullable: raw.is_nullable.clone(),
            is_foreign_key: raw.is_foreign_key,
            referenced_table: raw.referenced_table_name.clone(),
        }
    }
}

/// Normalize a table's raw records, preserving declaration order
pub fn normalize_columns(raw: &[RawColumn]) -> Vec<ColumnDescriptor> {
    raw.iter().map(ColumnDescriptor::from_raw).collect()
}
