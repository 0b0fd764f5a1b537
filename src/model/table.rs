//! Table and index model types

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Column;

/// An index on a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub is_unique: bool,
    pub is_primary_key: bool,
    /// Engine index kind (e.g. CLUSTERED, NONCLUSTERED)
    pub type_desc: String,
    /// Participating column names in key-ordinal order
    pub columns: Vec<String>,
}

/// A fully analyzed table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub schema: String,
    pub name: String,
    /// Stable engine handle used to join metadata queries
    pub object_id: i32,
    pub columns: Vec<Column>,
    /// Primary-key column names in key-ordinal order
    pub primary_key_columns: Vec<String>,
    pub indexes: Vec<Index>,
    pub create_date: Option<NaiveDateTime>,
    pub modify_date: Option<NaiveDateTime>,
    /// `MS_Description` extended property, when present
    pub description: Option<String>,
    /// Table-level extended properties other than `MS_Description`
    pub extended_properties: BTreeMap<String, String>,
}

impl Table {
    /// Full name in `schema.name` form
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Look up a column by name (case-insensitive)
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}
