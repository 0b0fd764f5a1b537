//! Database schema model types

mod column;
mod enums;
mod relationship;
mod schema;
mod table;
mod views;

pub use column::{Column, ColumnPrefix, SemanticType};
pub use enums::EnumRecord;
pub use relationship::{Relationship, RelationshipType};
pub use schema::DatabaseSchema;
pub use table::{Index, Table};
pub use views::{ViewColumn, ViewInfo, ViewKind};
