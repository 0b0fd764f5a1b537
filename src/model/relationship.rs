//! Foreign-key relationship model types

use serde::{Deserialize, Serialize};

/// Cardinality of a foreign-key relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RelationshipType {
    #[default]
    OneToMany,
    OneToOne,
    ManyToMany,
}

/// A foreign-key relationship between two tables.
///
/// Direction is fixed: `parent_table` holds the foreign key and references
/// `referenced_table`. Child views are derived by query, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub constraint_name: String,
    /// Table holding the foreign key, in `schema.name` form
    pub parent_table: String,
    pub referenced_table: String,
    pub parent_column: String,
    pub referenced_column: String,
    /// Referential action on delete (e.g. NO_ACTION, CASCADE)
    pub delete_action: String,
    pub update_action: String,
    pub is_disabled: bool,
    pub kind: RelationshipType,
}
