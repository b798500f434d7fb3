//! Declared tables and columns.

use std::collections::BTreeMap;

use enum_iterator::Sequence;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The scalar types a declared column can have.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Sequence, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum ScalarType {
    Boolean,
    Integer,
    Double,
    Decimal,
    String,
    Date,
    DateTime,
    Time,
    Guid,
}

impl ScalarType {
    /// The name of the type in the query option grammar's type system.
    pub fn edm_name(self) -> &'static str {
        match self {
            ScalarType::Boolean => "Edm.Boolean",
            ScalarType::Integer => "Edm.Int64",
            ScalarType::Double => "Edm.Double",
            ScalarType::Decimal => "Edm.Decimal",
            ScalarType::String => "Edm.String",
            ScalarType::Date => "Edm.Date",
            ScalarType::DateTime => "Edm.DateTimeOffset",
            ScalarType::Time => "Edm.TimeOfDay",
            ScalarType::Guid => "Edm.Guid",
        }
    }
}

/// Mapping from a "table" name to its information.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct TablesInfo(pub BTreeMap<String, TableInfo>);

impl TablesInfo {
    pub fn empty() -> Self {
        TablesInfo(BTreeMap::new())
    }
}

/// Information about a database table (or any other kind of relation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TableInfo {
    pub columns: BTreeMap<String, ColumnInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Can this column contain null values
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum Nullable {
    #[default]
    Nullable,
    NonNullable,
}

/// Information about a database column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnInfo {
    pub name: String,
    pub r#type: ScalarType,
    #[serde(default)]
    pub nullable: Nullable,
}
