//! Table-level metadata analysis
//!
//! Assembles a complete `Table` from the catalog: identity and dates,
//! columns, primary key, indexes and table-level extended properties.

use tracing::debug;

use crate::error::SchemaAnalysisError;
use crate::model::{Column, Index, Table};
use crate::mssql::rows::{self, IndexRow, PropertyRow, TableInfoRow};
use crate::mssql::{connect, SqlClient};

use super::column_analyzer::fetch_columns;

use std::collections::BTreeMap;

/// Schema assumed when a table identifier has no schema part.
const DEFAULT_SCHEMA: &str = "dbo";

const TABLE_INFO_QUERY: &str = "\
SELECT
    t.object_id,
    t.create_date,
    t.modify_date,
    CAST(ep.value AS NVARCHAR(4000)) AS Description
FROM sys.tables t
LEFT JOIN sys.extended_properties ep ON ep.class = 1
    AND ep.major_id = t.object_id
    AND ep.minor_id = 0
    AND ep.name = 'MS_Description'
WHERE SCHEMA_NAME(t.schema_id) = @P1 AND t.name = @P2";

const PRIMARY_KEY_QUERY: &str = "\
SELECT c.name AS ColumnName
FROM sys.indexes i
INNER JOIN sys.index_columns ic ON i.object_id = ic.object_id AND i.index_id = ic.index_id
INNER JOIN sys.columns c ON ic.object_id = c.object_id AND ic.column_id = c.column_id
WHERE i.object_id = @P1 AND i.is_primary_key = 1
ORDER BY ic.key_ordinal";

const INDEX_QUERY: &str = "\
SELECT
    i.name AS IndexName,
    i.is_unique,
    i.is_primary_key,
    i.type_desc AS TypeDescription,
    STRING_AGG(c.name, ',') WITHIN GROUP (ORDER BY ic.key_ordinal) AS ColumnNames
FROM sys.indexes i
INNER JOIN sys.index_columns ic ON i.object_id = ic.object_id AND i.index_id = ic.index_id
INNER JOIN sys.columns c ON ic.object_id = c.object_id AND ic.column_id = c.column_id
WHERE i.object_id = @P1 AND i.type > 0 AND ic.is_included_column = 0
GROUP BY i.name, i.is_unique, i.is_primary_key, i.type_desc
ORDER BY i.is_primary_key DESC, i.is_unique DESC, i.name";

const TABLE_PROPERTY_QUERY: &str = "\
SELECT ep.name AS PropertyName, CAST(ep.value AS NVARCHAR(4000)) AS PropertyValue
FROM sys.extended_properties ep
WHERE ep.class = 1 AND ep.major_id = @P1 AND ep.minor_id = 0 AND ep.name <> 'MS_Description'
ORDER BY ep.name";

/// Analyzes single tables into fully populated `Table` values.
pub struct TableAnalyzer {
    connection_string: String,
}

impl TableAnalyzer {
    pub fn new(connection_string: &str) -> Self {
        TableAnalyzer {
            connection_string: connection_string.to_string(),
        }
    }

    /// Analyze one table identified by `schema.name` or a bare name.
    ///
    /// Returns `TableNotFound` when the identifier does not resolve to a
    /// user table.
    pub async fn analyze_table(&self, identifier: &str) -> Result<Table, SchemaAnalysisError> {
        let mut client = connect(&self.connection_string).await?;
        fetch_table(&mut client, identifier).await
    }
}

/// Split a table identifier into its schema and name parts.
///
/// Identifiers without a dot default to the `dbo` schema; anything that is
/// not exactly two dot-separated parts is treated as a bare table name.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(split_table_identifier("Sales.Order"), ("Sales".into(), "Order".into()));
/// assert_eq!(split_table_identifier("Customer"), ("dbo".into(), "Customer".into()));
/// ```
pub fn split_table_identifier(identifier: &str) -> (String, String) {
    let trimmed = identifier.trim();
    let parts: Vec<&str> = trimmed.split('.').collect();
    if parts.len() == 2 {
        (parts[0].trim().to_string(), parts[1].trim().to_string())
    } else {
        (DEFAULT_SCHEMA.to_string(), trimmed.to_string())
    }
}

pub(crate) async fn fetch_table(
    client: &mut SqlClient,
    identifier: &str,
) -> Result<Table, SchemaAnalysisError> {
    let (schema, name) = split_table_identifier(identifier);
    let full_name = format!("{schema}.{name}");
    debug!(table = %full_name, "analyzing table");

    let info = fetch_table_info(client, &schema, &name).await?;
    let mut columns = fetch_columns(client, &schema, &name).await?;

    let primary_key_columns = fetch_primary_key(client, info.object_id, &full_name).await?;
    mark_primary_key_columns(&mut columns, &primary_key_columns);

    let indexes = fetch_indexes(client, info.object_id, &full_name).await?;
    let extended_properties = fetch_table_properties(client, info.object_id, &full_name).await?;

    Ok(Table {
        schema,
        name,
        object_id: info.object_id,
        columns,
        primary_key_columns,
        indexes,
        create_date: info.create_date,
        modify_date: info.modify_date,
        description: info.description,
        extended_properties,
    })
}

async fn fetch_table_info(
    client: &mut SqlClient,
    schema: &str,
    name: &str,
) -> Result<TableInfoRow, SchemaAnalysisError> {
    let full_name = format!("{schema}.{name}");
    let row = client
        .query(TABLE_INFO_QUERY, &[&schema, &name])
        .await
        .map_err(|source| SchemaAnalysisError::TableInfoQuery {
            table: full_name.clone(),
            source,
        })?
        .into_row()
        .await
        .map_err(|source| SchemaAnalysisError::TableInfoQuery {
            table: full_name.clone(),
            source,
        })?;

    match row {
        Some(row) => TableInfoRow::from_row(&row),
        None => Err(SchemaAnalysisError::TableNotFound { table: full_name }),
    }
}

async fn fetch_primary_key(
    client: &mut SqlClient,
    object_id: i32,
    full_name: &str,
) -> Result<Vec<String>, SchemaAnalysisError> {
    let result_rows = client
        .query(PRIMARY_KEY_QUERY, &[&object_id])
        .await
        .map_err(|source| SchemaAnalysisError::PrimaryKeyQuery {
            table: full_name.to_string(),
            source,
        })?
        .into_first_result()
        .await
        .map_err(|source| SchemaAnalysisError::PrimaryKeyQuery {
            table: full_name.to_string(),
            source,
        })?;

    result_rows
        .iter()
        .map(|row| rows::required::<&str>(row, "primary key", "ColumnName").map(str::to_string))
        .collect()
}

fn mark_primary_key_columns(columns: &mut [Column], primary_key: &[String]) {
    for key_column in primary_key {
        if let Some(column) = columns
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(key_column))
        {
            column.is_primary_key = true;
        }
    }
}

async fn fetch_indexes(
    client: &mut SqlClient,
    object_id: i32,
    full_name: &str,
) -> Result<Vec<Index>, SchemaAnalysisError> {
    let result_rows = client
        .query(INDEX_QUERY, &[&object_id])
        .await
        .map_err(|source| SchemaAnalysisError::IndexQuery {
            table: full_name.to_string(),
            source,
        })?
        .into_first_result()
        .await
        .map_err(|source| SchemaAnalysisError::IndexQuery {
            table: full_name.to_string(),
            source,
        })?;

    let mut indexes = Vec::with_capacity(result_rows.len());
    for row in &result_rows {
        let index_row = IndexRow::from_row(row)?;
        indexes.push(Index {
            name: index_row.name,
            is_unique: index_row.is_unique,
            is_primary_key: index_row.is_primary_key,
            type_desc: index_row.type_desc,
            columns: index_row
                .column_names
                .split(',')
                .map(str::to_string)
                .collect(),
        });
    }
    Ok(indexes)
}

async fn fetch_table_properties(
    client: &mut SqlClient,
    object_id: i32,
    full_name: &str,
) -> Result<BTreeMap<String, String>, SchemaAnalysisError> {
    let result_rows = client
        .query(TABLE_PROPERTY_QUERY, &[&object_id])
        .await
        .map_err(|source| SchemaAnalysisError::PropertyQuery {
            table: full_name.to_string(),
            source,
        })?
        .into_first_result()
        .await
        .map_err(|source| SchemaAnalysisError::PropertyQuery {
            table: full_name.to_string(),
            source,
        })?;

    let mut properties = BTreeMap::new();
    for row in &result_rows {
        let property = PropertyRow::from_row(row)?;
        if let Some(value) = property.value {
            properties.insert(property.name, value);
        }
    }
    Ok(properties)
}
