//! Enumeration metadata loading
//!
//! Reads the `dbo.c_Enumeration` lookup table when it exists. Databases
//! without it simply yield no enumerations; loading never fails the caller.

use tiberius::ToSql;
use tracing::{debug, warn};

use crate::error::SchemaAnalysisError;
use crate::model::EnumRecord;
use crate::mssql::rows::{self, EnumRow};
use crate::mssql::{connect, SqlClient};

const ENUM_TABLE_EXISTS_QUERY: &str = "\
SELECT COUNT(*) AS TableCount
FROM INFORMATION_SCHEMA.TABLES
WHERE TABLE_SCHEMA = 'dbo' AND TABLE_NAME = 'c_Enumeration'";

const ENUM_ALL_QUERY: &str = "\
SELECT
    EnumType,
    EnumValue,
    locText AS EnumText,
    REPLACE(REPLACE(REPLACE(locText, ' ', ''), '-', ''), '''', '') AS EnumTextNS,
    ISNULL(OrdinalPosition, 0) AS OrderNum
FROM dbo.c_Enumeration
WHERE DeletedOn IS NULL
ORDER BY EnumType, ISNULL(OrdinalPosition, 0), EnumValue";

const ENUM_BY_TYPE_QUERY: &str = "\
SELECT
    EnumType,
    EnumValue,
    locText AS EnumText,
    REPLACE(REPLACE(REPLACE(locText, ' ', ''), '-', ''), '''', '') AS EnumTextNS,
    ISNULL(OrdinalPosition, 0) AS OrderNum
FROM dbo.c_Enumeration
WHERE DeletedOn IS NULL AND EnumType = @P1
ORDER BY ISNULL(OrdinalPosition, 0), EnumValue";

const ENUM_TYPES_QUERY: &str = "\
SELECT DISTINCT EnumType
FROM dbo.c_Enumeration
WHERE DeletedOn IS NULL
ORDER BY EnumType";

/// Loads enumeration values from the convention lookup table.
pub struct EnumLoader {
    connection_string: String,
}

impl EnumLoader {
    pub fn new(connection_string: &str) -> Self {
        EnumLoader {
            connection_string: connection_string.to_string(),
        }
    }

    /// Every live enumeration value, ordered by type then ordinal.
    pub async fn load_all(&self) -> Vec<EnumRecord> {
        match self.try_load_records(ENUM_ALL_QUERY, &[]).await {
            Ok(records) => records,
            Err(failure) => {
                warn!(error = %failure, "enumeration load failed");
                Vec::new()
            }
        }
    }

    /// Live values of a single enumeration type, ordered by ordinal.
    pub async fn load_by_type(&self, enum_type: &str) -> Vec<EnumRecord> {
        match self.try_load_records(ENUM_BY_TYPE_QUERY, &[&enum_type]).await {
            Ok(records) => records,
            Err(failure) => {
                warn!(enum_type, error = %failure, "enumeration load failed");
                Vec::new()
            }
        }
    }

    /// Distinct enumeration type names.
    pub async fn enum_types(&self) -> Vec<String> {
        match self.try_load_types().await {
            Ok(types) => types,
            Err(failure) => {
                warn!(error = %failure, "enumeration type listing failed");
                Vec::new()
            }
        }
    }

    async fn try_load_records(
        &self,
        query: &str,
        params: &[&dyn ToSql],
    ) -> Result<Vec<EnumRecord>, SchemaAnalysisError> {
        let mut client = connect(&self.connection_string).await?;
        if !enumeration_table_exists(&mut client).await? {
            debug!("c_Enumeration table not present, no enumerations to load");
            return Ok(Vec::new());
        }

        let result_rows = client
            .query(query, params)
            .await
            .map_err(|source| SchemaAnalysisError::EnumQuery { source })?
            .into_first_result()
            .await
            .map_err(|source| SchemaAnalysisError::EnumQuery { source })?;

        let mut records = Vec::with_capacity(result_rows.len());
        for row in &result_rows {
            let enum_row = EnumRow::from_row(row)?;
            records.push(EnumRecord {
                enum_type: enum_row.enum_type,
                value: enum_row.value,
                text: enum_row.text,
                text_normalized: enum_row.text_normalized,
                ordinal: enum_row.ordinal,
            });
        }
        Ok(records)
    }

    async fn try_load_types(&self) -> Result<Vec<String>, SchemaAnalysisError> {
        let mut client = connect(&self.connection_string).await?;
        if !enumeration_table_exists(&mut client).await? {
            debug!("c_Enumeration table not present, no enumeration types");
            return Ok(Vec::new());
        }

        let result_rows = client
            .simple_query(ENUM_TYPES_QUERY)
            .await
            .map_err(|source| SchemaAnalysisError::EnumQuery { source })?
            .into_first_result()
            .await
            .map_err(|source| SchemaAnalysisError::EnumQuery { source })?;

        result_rows
            .iter()
            .map(|row| rows::required::<&str>(row, "enumeration", "EnumType").map(str::to_string))
            .collect()
    }
}

async fn enumeration_table_exists(client: &mut SqlClient) -> Result<bool, SchemaAnalysisError> {
    let row = client
        .simple_query(ENUM_TABLE_EXISTS_QUERY)
        .await
        .map_err(|source| SchemaAnalysisError::EnumQuery { source })?
        .into_row()
        .await
        .map_err(|source| SchemaAnalysisError::EnumQuery { source })?;

    let count = match row {
        Some(row) => rows::required::<i32>(&row, "enumeration", "TableCount")?,
        None => 0,
    };
    Ok(count > 0)
}
