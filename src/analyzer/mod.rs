//! Metadata analyzers
//!
//! Leaf analyzers (columns, tables, relationships) read one slice of the
//! catalog each; the schema analyzer orchestrates them into a full or
//! incremental `DatabaseSchema` snapshot. Enum and view loaders read side
//! metadata that degrades gracefully when absent.

mod column_analyzer;
mod enum_loader;
mod relationship_analyzer;
mod schema_analyzer;
mod table_analyzer;
mod view_analyzer;

pub use column_analyzer::ColumnAnalyzer;
pub use enum_loader::EnumLoader;
pub use relationship_analyzer::{
    build_graph, classify_cardinality, get_child_tables, get_parent_tables, RelationshipAnalyzer,
};
pub use schema_analyzer::{table_changed, SchemaAnalyzer};
pub use table_analyzer::{split_table_identifier, TableAnalyzer};
pub use view_analyzer::{classify_view_name, ViewAnalyzer};
