//! Column model types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Naming-convention classification of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColumnPrefix {
    #[default]
    None,
    /// `eno_` - one-way (hashed) encryption
    OneWayEncryption,
    /// `ent_` - two-way (reversible) encryption
    TwoWayEncryption,
    /// `enm_` - value constrained to an enumeration
    Enumeration,
    /// `lkp_` - lookup-table reference
    Lookup,
    /// `loc_` - localized text
    Localization,
    /// `clc_` - calculated, read-only
    Calculated,
    /// `blg_` - maintained by business logic, read-only
    BusinessLogic,
    /// `agg_` - aggregated from other rows, read-only
    Aggregate,
    /// `spt_` - updated separately from the main row
    SeparateUpdate,
    /// `spl_` - listed separately from the main row
    SeparateList,
    /// `upl_` - uploaded file reference
    Upload,
    /// `fui_` - participates in a fake unique index
    FakeUniqueIndex,
    /// `scb_` - separate changed-by tracking
    SeparateChangedBy,
}

impl ColumnPrefix {
    /// The name prefix token for this classification, without the underscore
    pub fn token(&self) -> Option<&'static str> {
        match self {
            ColumnPrefix::None => None,
            ColumnPrefix::OneWayEncryption => Some("eno"),
            ColumnPrefix::TwoWayEncryption => Some("ent"),
            ColumnPrefix::Enumeration => Some("enm"),
            ColumnPrefix::Lookup => Some("lkp"),
            ColumnPrefix::Localization => Some("loc"),
            ColumnPrefix::Calculated => Some("clc"),
            ColumnPrefix::BusinessLogic => Some("blg"),
            ColumnPrefix::Aggregate => Some("agg"),
            ColumnPrefix::SeparateUpdate => Some("spt"),
            ColumnPrefix::SeparateList => Some("spl"),
            ColumnPrefix::Upload => Some("upl"),
            ColumnPrefix::FakeUniqueIndex => Some("fui"),
            ColumnPrefix::SeparateChangedBy => Some("scb"),
        }
    }
}

/// Canonical semantic type a declared SQL type collapses to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SemanticType {
    Bool,
    UInt8,
    Int16,
    Int32,
    Int64,
    Decimal,
    Float32,
    Float64,
    Date,
    Time,
    DateTime,
    DateTimeOffset,
    Uuid,
    String,
    Bytes,
    /// Unrecognized SQL types
    Object,
}

impl SemanticType {
    /// Map a SQL Server type name to its canonical semantic type.
    ///
    /// Matching is case-insensitive; unrecognized types map to `Object`.
    pub fn from_sql_type(sql_type: &str) -> Self {
        match sql_type.to_ascii_lowercase().as_str() {
            "bigint" => SemanticType::Int64,
            "int" => SemanticType::Int32,
            "smallint" => SemanticType::Int16,
            "tinyint" => SemanticType::UInt8,
            "bit" => SemanticType::Bool,
            "decimal" | "numeric" | "money" | "smallmoney" => SemanticType::Decimal,
            "float" => SemanticType::Float64,
            "real" => SemanticType::Float32,
            "date" => SemanticType::Date,
            "datetime" | "datetime2" | "smalldatetime" => SemanticType::DateTime,
            "time" => SemanticType::Time,
            "datetimeoffset" => SemanticType::DateTimeOffset,
            "char" | "varchar" | "text" | "nchar" | "nvarchar" | "ntext" | "xml" => {
                SemanticType::String
            }
            "uniqueidentifier" => SemanticType::Uuid,
            "binary" | "varbinary" | "image" => SemanticType::Bytes,
            _ => SemanticType::Object,
        }
    }
}

/// A physical table column with its convention classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Ordinal position reported by the engine
    pub column_id: i32,
    pub name: String,
    /// Declared SQL type name (e.g. `nvarchar`)
    pub sql_type: String,
    pub semantic_type: SemanticType,
    /// Storage length in bytes; -1 for max types
    pub max_length: i16,
    pub precision: u8,
    pub scale: u8,
    pub is_nullable: bool,
    pub is_identity: bool,
    pub is_computed: bool,
    pub is_primary_key: bool,
    pub default_value: Option<String>,
    pub computed_definition: Option<String>,
    /// `MS_Description` extended property, when present
    pub description: Option<String>,
    /// Extended properties other than `MS_Description`, keyed by name
    pub extended_properties: BTreeMap<String, String>,
    pub prefix: ColumnPrefix,
    /// Column name with any recognized prefix token stripped
    pub base_name: String,
    pub is_encrypted: bool,
    pub is_read_only: bool,
    pub do_not_audit: bool,
}
