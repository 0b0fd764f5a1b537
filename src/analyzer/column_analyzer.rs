//! Column-level metadata analysis
//!
//! Reads `sys.columns` joined against types, defaults, computed definitions
//! and extended properties, then applies the naming convention to each
//! column.

use std::collections::BTreeMap;

use tracing::debug;

use crate::convention::classify_column;
use crate::error::SchemaAnalysisError;
use crate::model::{Column, SemanticType};
use crate::mssql::rows::{ColumnPropertyRow, ColumnRow};
use crate::mssql::{connect, SqlClient};

const COLUMN_QUERY: &str = "\
SELECT
    c.column_id,
    c.name AS ColumnName,
    t.name AS DataType,
    c.max_length,
    c.[precision],
    c.[scale],
    c.is_nullable,
    c.is_identity,
    c.is_computed,
    dc.definition AS DefaultValue,
    cc.definition AS ComputedDefinition,
    CAST(ep.value AS NVARCHAR(4000)) AS Description
FROM sys.columns c
INNER JOIN sys.types t ON c.user_type_id = t.user_type_id
LEFT JOIN sys.default_constraints dc ON c.default_object_id = dc.object_id
LEFT JOIN sys.computed_columns cc ON c.object_id = cc.object_id AND c.column_id = cc.column_id
LEFT JOIN sys.extended_properties ep ON ep.class = 1
    AND ep.major_id = c.object_id
    AND ep.minor_id = c.column_id
    AND ep.name = 'MS_Description'
WHERE c.object_id = OBJECT_ID(@P1)
ORDER BY c.column_id";

const COLUMN_PROPERTY_QUERY: &str = "\
SELECT
    c.name AS ColumnName,
    ep.name AS PropertyName,
    CAST(ep.value AS NVARCHAR(4000)) AS PropertyValue
FROM sys.extended_properties ep
INNER JOIN sys.columns c ON ep.major_id = c.object_id AND ep.minor_id = c.column_id
WHERE ep.class = 1
    AND ep.major_id = OBJECT_ID(@P1)
    AND ep.minor_id > 0
    AND ep.name <> 'MS_Description'
ORDER BY c.column_id, ep.name";

/// Analyzes the columns of individual tables.
pub struct ColumnAnalyzer {
    connection_string: String,
}

impl ColumnAnalyzer {
    pub fn new(connection_string: &str) -> Self {
        ColumnAnalyzer {
            connection_string: connection_string.to_string(),
        }
    }

    /// Read every column of `schema.table` with convention metadata applied.
    ///
    /// Columns come back in `column_id` order. `is_primary_key` is always
    /// false here; the table analyzer marks key columns after reading the
    /// primary key index.
    pub async fn analyze_columns(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<Column>, SchemaAnalysisError> {
        let mut client = connect(&self.connection_string).await?;
        fetch_columns(&mut client, schema, table).await
    }
}

pub(crate) async fn fetch_columns(
    client: &mut SqlClient,
    schema: &str,
    table: &str,
) -> Result<Vec<Column>, SchemaAnalysisError> {
    let full_name = format!("{schema}.{table}");
    debug!(table = %full_name, "reading column metadata");

    let rows = client
        .query(COLUMN_QUERY, &[&full_name])
        .await
        .map_err(|source| SchemaAnalysisError::ColumnQuery {
            table: full_name.clone(),
            source,
        })?
        .into_first_result()
        .await
        .map_err(|source| SchemaAnalysisError::ColumnQuery {
            table: full_name.clone(),
            source,
        })?;

    let mut properties = fetch_column_properties(client, &full_name).await?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in &rows {
        let column_row = ColumnRow::from_row(row)?;
        let column_properties = properties.remove(&column_row.name).unwrap_or_default();
        columns.push(build_column(column_row, column_properties));
    }

    debug!(table = %full_name, columns = columns.len(), "columns analyzed");
    Ok(columns)
}

/// Extended properties other than `MS_Description`, keyed by column name.
async fn fetch_column_properties(
    client: &mut SqlClient,
    full_name: &str,
) -> Result<BTreeMap<String, BTreeMap<String, String>>, SchemaAnalysisError> {
    let rows = client
        .query(COLUMN_PROPERTY_QUERY, &[&full_name])
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

    let mut properties: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    for row in &rows {
        let property = ColumnPropertyRow::from_row(row)?;
        if let Some(value) = property.property_value {
            properties
                .entry(property.column_name)
                .or_default()
                .insert(property.property_name, value);
        }
    }
    Ok(properties)
}

fn build_column(row: ColumnRow, extended_properties: BTreeMap<String, String>) -> Column {
    let classification = classify_column(&row.name, &extended_properties);
    Column {
        column_id: row.column_id,
        semantic_type: SemanticType::from_sql_type(&row.sql_type),
        sql_type: row.sql_type,
        max_length: row.max_length,
        precision: row.precision,
        scale: row.scale,
        is_nullable: row.is_nullable,
        is_identity: row.is_identity,
        is_computed: row.is_computed,
        // marked later from the primary key index
        is_primary_key: false,
        default_value: row.default_value,
        computed_definition: row.computed_definition,
        description: row.description,
        extended_properties,
        prefix: classification.prefix,
        base_name: classification.base_name,
        is_encrypted: classification.is_encrypted,
        is_read_only: classification.is_read_only,
        do_not_audit: classification.do_not_audit,
        name: row.name,
    }
}
