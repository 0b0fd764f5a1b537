//! View metadata model types

use serde::{Deserialize, Serialize};

/// Name-pattern classification of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewKind {
    /// Hand-written view, name starts with `mn`
    Manual,
    /// Generated combo-list view, name starts with `ccvwComboList_`
    ComboList,
    Other,
}

/// A column of a database view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewColumn {
    pub name: String,
    pub sql_type: String,
    pub max_length: Option<i32>,
    pub is_nullable: bool,
    pub ordinal: i32,
}

/// A database view with its columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewInfo {
    pub schema: String,
    pub name: String,
    pub kind: ViewKind,
    pub columns: Vec<ViewColumn>,
}

impl ViewInfo {
    /// Full name in `schema.name` form
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}
