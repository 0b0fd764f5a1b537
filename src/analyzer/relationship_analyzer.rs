//! Foreign key relationship analysis
//!
//! Reads `sys.foreign_keys` into `Relationship` values, classifies their
//! cardinality from index metadata and offers pure graph helpers over the
//! result.

use std::collections::BTreeMap;

use tiberius::ToSql;
use tracing::debug;

use crate::error::SchemaAnalysisError;
use crate::model::{Relationship, RelationshipType, Table};
use crate::mssql::rows::ForeignKeyRow;
use crate::mssql::{connect, SqlClient};

const FOREIGN_KEY_QUERY_BASE: &str = "\
SELECT
    fk.name AS ConstraintName,
    SCHEMA_NAME(tp.schema_id) + '.' + tp.name AS ParentTable,
    SCHEMA_NAME(tr.schema_id) + '.' + tr.name AS ReferencedTable,
    cp.name AS ParentColumn,
    cr.name AS ReferencedColumn,
    fk.delete_referential_action_desc AS DeleteAction,
    fk.update_referential_action_desc AS UpdateAction,
    fk.is_disabled
FROM sys.foreign_keys fk
INNER JOIN sys.foreign_key_columns fkc ON fk.object_id = fkc.constraint_object_id
INNER JOIN sys.tables tp ON fkc.parent_object_id = tp.object_id
INNER JOIN sys.columns cp ON fkc.parent_object_id = cp.object_id AND fkc.parent_column_id = cp.column_id
INNER JOIN sys.tables tr ON fkc.referenced_object_id = tr.object_id
INNER JOIN sys.columns cr ON fkc.referenced_object_id = cr.object_id AND fkc.referenced_column_id = cr.column_id";

const FOREIGN_KEY_ORDER: &str = "ORDER BY ParentTable, fk.name";

/// Analyzes foreign key relationships between tables.
pub struct RelationshipAnalyzer {
    connection_string: String,
}

impl RelationshipAnalyzer {
    pub fn new(connection_string: &str) -> Self {
        RelationshipAnalyzer {
            connection_string: connection_string.to_string(),
        }
    }

    /// All foreign keys in the database, classified against `tables`.
    pub async fn analyze_all(
        &self,
        tables: &[Table],
    ) -> Result<Vec<Relationship>, SchemaAnalysisError> {
        let mut client = connect(&self.connection_string).await?;
        fetch_all_relationships(&mut client, tables).await
    }

    /// Foreign keys touching any of `table_names` on either side.
    ///
    /// Without table metadata to consult, every relationship keeps the
    /// one-to-many default. An empty list returns immediately without
    /// opening a connection.
    pub async fn analyze_for_tables(
        &self,
        table_names: &[String],
    ) -> Result<Vec<Relationship>, SchemaAnalysisError> {
        if table_names.is_empty() {
            return Ok(Vec::new());
        }
        let mut client = connect(&self.connection_string).await?;
        fetch_relationships_for_tables(&mut client, table_names, &[]).await
    }
}

pub(crate) async fn fetch_all_relationships(
    client: &mut SqlClient,
    tables: &[Table],
) -> Result<Vec<Relationship>, SchemaAnalysisError> {
    debug!("reading foreign key relationships");
    let query = format!("{FOREIGN_KEY_QUERY_BASE}\n{FOREIGN_KEY_ORDER}");
    let result_rows = client
        .query(query.as_str(), &[])
        .await
        .map_err(|source| SchemaAnalysisError::RelationshipQuery { source })?
        .into_first_result()
        .await
        .map_err(|source| SchemaAnalysisError::RelationshipQuery { source })?;

    let relationships = build_relationships(&result_rows, tables)?;
    debug!(relationships = relationships.len(), "relationships analyzed");
    Ok(relationships)
}

pub(crate) async fn fetch_relationships_for_tables(
    client: &mut SqlClient,
    table_names: &[String],
    tables: &[Table],
) -> Result<Vec<Relationship>, SchemaAnalysisError> {
    if table_names.is_empty() {
        return Ok(Vec::new());
    }
    debug!(tables = table_names.len(), "reading foreign keys for changed tables");

    let placeholders: Vec<String> = (1..=table_names.len()).map(|i| format!("@P{i}")).collect();
    let in_list = placeholders.join(", ");
    let query = format!(
        "{FOREIGN_KEY_QUERY_BASE}\n\
         WHERE SCHEMA_NAME(tp.schema_id) + '.' + tp.name IN ({in_list})\n\
             OR SCHEMA_NAME(tr.schema_id) + '.' + tr.name IN ({in_list})\n\
         {FOREIGN_KEY_ORDER}"
    );
    let params: Vec<&dyn ToSql> = table_names.iter().map(|name| name as &dyn ToSql).collect();

    let result_rows = client
        .query(query.as_str(), &params)
        .await
        .map_err(|source| SchemaAnalysisError::RelationshipQuery { source })?
        .into_first_result()
        .await
        .map_err(|source| SchemaAnalysisError::RelationshipQuery { source })?;

    build_relationships(&result_rows, tables)
}

fn build_relationships(
    result_rows: &[tiberius::Row],
    tables: &[Table],
) -> Result<Vec<Relationship>, SchemaAnalysisError> {
    let mut relationships = Vec::with_capacity(result_rows.len());
    for row in result_rows {
        let fk = ForeignKeyRow::from_row(row)?;
        let parent = tables
            .iter()
            .find(|table| table.full_name().eq_ignore_ascii_case(&fk.parent_table));
        let kind = classify_cardinality(parent, &fk.parent_column);
        relationships.push(Relationship {
            constraint_name: fk.constraint_name,
            parent_table: fk.parent_table,
            referenced_table: fk.referenced_table,
            parent_column: fk.parent_column,
            referenced_column: fk.referenced_column,
            delete_action: fk.delete_action,
            update_action: fk.update_action,
            is_disabled: fk.is_disabled,
            kind,
        });
    }
    Ok(relationships)
}

/// Decide the cardinality of a foreign key from the parent side.
///
/// A relationship is one-to-one when the parent table carries a
/// single-column unique index on the foreign key column, one-to-many
/// otherwise. Unknown parent tables keep the one-to-many default.
pub fn classify_cardinality(parent: Option<&Table>, parent_column: &str) -> RelationshipType {
    let Some(table) = parent else {
        return RelationshipType::OneToMany;
    };
    let unique_on_column = table.indexes.iter().any(|index| {
        index.is_unique
            && index.columns.len() == 1
            && index.columns[0].eq_ignore_ascii_case(parent_column)
    });
    if unique_on_column {
        RelationshipType::OneToOne
    } else {
        RelationshipType::OneToMany
    }
}

/// Tables referenced by `table` through its outgoing foreign keys.
///
/// Distinct, in first-seen order.
pub fn get_parent_tables(relationships: &[Relationship], table: &str) -> Vec<String> {
    let mut parents = Vec::new();
    for relationship in relationships {
        if relationship.parent_table.eq_ignore_ascii_case(table)
            && !parents.contains(&relationship.referenced_table)
        {
            parents.push(relationship.referenced_table.clone());
        }
    }
    parents
}

/// Tables holding foreign keys that reference `table`.
///
/// Distinct, in first-seen order.
pub fn get_child_tables(relationships: &[Relationship], table: &str) -> Vec<String> {
    let mut children = Vec::new();
    for relationship in relationships {
        if relationship.referenced_table.eq_ignore_ascii_case(table)
            && !children.contains(&relationship.parent_table)
        {
            children.push(relationship.parent_table.clone());
        }
    }
    children
}

/// Adjacency map from each table to the tables it references.
///
/// Tables that only appear on the referenced side get an empty entry, so
/// every table in the relationship set is a key.
pub fn build_graph(relationships: &[Relationship]) -> BTreeMap<String, Vec<String>> {
    let mut graph: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for relationship in relationships {
        let targets = graph.entry(relationship.parent_table.clone()).or_default();
        if !targets.contains(&relationship.referenced_table) {
            targets.push(relationship.referenced_table.clone());
        }
        graph.entry(relationship.referenced_table.clone()).or_default();
    }
    graph
}
