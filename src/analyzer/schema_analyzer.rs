//! Whole-database schema analysis
//!
//! Orchestrates the table and relationship analyzers into immutable
//! `DatabaseSchema` snapshots, either for the whole catalog or
//! incrementally for a set of changed tables.

use std::time::Instant;

use chrono::{NaiveDateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::error::SchemaAnalysisError;
use crate::model::DatabaseSchema;
use crate::mssql::{self, rows, SqlClient};

use super::relationship_analyzer::{fetch_all_relationships, fetch_relationships_for_tables};
use super::table_analyzer::fetch_table;

const DATABASE_NAME_QUERY: &str = "SELECT DB_NAME() AS DatabaseName";

const SERVER_NAME_QUERY: &str = "SELECT @@SERVERNAME AS ServerName";

const TABLE_LIST_QUERY: &str = "\
SELECT SCHEMA_NAME(t.schema_id) + '.' + t.name AS TableName
FROM sys.tables t
WHERE t.is_ms_shipped = 0
ORDER BY SCHEMA_NAME(t.schema_id), t.name";

const MODIFY_DATE_QUERY: &str = "\
SELECT t.modify_date
FROM sys.tables t
WHERE SCHEMA_NAME(t.schema_id) + '.' + t.name = @P1";

/// Entry point for full and incremental database analysis.
pub struct SchemaAnalyzer {
    connection_string: String,
}

impl SchemaAnalyzer {
    pub fn new(connection_string: &str) -> Self {
        SchemaAnalyzer {
            connection_string: connection_string.to_string(),
        }
    }

    /// Check that the connection string reaches a responsive server.
    ///
    /// Failures are logged and reported as `false`, never raised.
    pub async fn connect(&self) -> bool {
        match self.verify_connection().await {
            Ok(()) => true,
            Err(error) => {
                warn!(error = %error, "connectivity check failed");
                false
            }
        }
    }

    /// List all user tables as `schema.name` identifiers, ordered by schema
    /// then name.
    pub async fn list_tables(&self) -> Result<Vec<String>, SchemaAnalysisError> {
        let mut client = mssql::connect(&self.connection_string).await?;
        fetch_table_names(&mut client).await
    }

    /// Analyze every user table and relationship in the database.
    ///
    /// The returned snapshot is complete or the call fails; a table that
    /// cannot be analyzed aborts the whole operation.
    pub async fn analyze_full(&self) -> Result<DatabaseSchema, SchemaAnalysisError> {
        let started = Instant::now();
        let mut client = mssql::connect(&self.connection_string).await?;

        let analysis_date = Utc::now();
        let database_name = fetch_database_name(&mut client).await?;
        let server_name = fetch_server_name(&mut client).await?;
        info!(database = %database_name, server = %server_name, "starting full schema analysis");

        let table_names = fetch_table_names(&mut client).await?;
        info!(tables = table_names.len(), "user tables discovered");

        let mut tables = Vec::with_capacity(table_names.len());
        for name in &table_names {
            let table = fetch_table(&mut client, name).await.map_err(|failure| {
                error!(table = %name, error = %failure, "table analysis failed");
                failure
            })?;
            tables.push(table);
        }

        let relationships = fetch_all_relationships(&mut client, &tables).await?;

        info!(
            tables = tables.len(),
            relationships = relationships.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "full schema analysis complete"
        );

        Ok(DatabaseSchema {
            database_name,
            server_name,
            analysis_date,
            tables,
            relationships,
            is_incremental: false,
        })
    }

    /// Re-analyze only the given tables.
    ///
    /// Relationships touching any of the tables are re-read; cardinality is
    /// classified against the re-analyzed tables where possible. An empty
    /// list yields an empty non-incremental snapshot without touching any
    /// table metadata.
    pub async fn analyze_incremental(
        &self,
        changed_tables: &[String],
    ) -> Result<DatabaseSchema, SchemaAnalysisError> {
        let mut client = mssql::connect(&self.connection_string).await?;

        let analysis_date = Utc::now();
        let database_name = fetch_database_name(&mut client).await?;
        let server_name = fetch_server_name(&mut client).await?;

        if changed_tables.is_empty() {
            info!("no changed tables, nothing to re-analyze");
            return Ok(DatabaseSchema {
                database_name,
                server_name,
                analysis_date,
                tables: Vec::new(),
                relationships: Vec::new(),
                is_incremental: false,
            });
        }

        info!(
            database = %database_name,
            tables = changed_tables.len(),
            "starting incremental schema analysis"
        );

        let mut tables = Vec::with_capacity(changed_tables.len());
        for name in changed_tables {
            let table = fetch_table(&mut client, name).await.map_err(|failure| {
                error!(table = %name, error = %failure, "table analysis failed");
                failure
            })?;
            tables.push(table);
        }

        let relationships =
            fetch_relationships_for_tables(&mut client, changed_tables, &tables).await?;

        info!(
            tables = tables.len(),
            relationships = relationships.len(),
            "incremental schema analysis complete"
        );

        Ok(DatabaseSchema {
            database_name,
            server_name,
            analysis_date,
            tables,
            relationships,
            is_incremental: true,
        })
    }

    /// Compare catalog modification dates against a previous snapshot.
    ///
    /// Returns the full names of tables that are new or modified since the
    /// previous analysis. A table whose change check fails is reported as
    /// changed rather than silently skipped.
    pub async fn detect_changed_tables(
        &self,
        previous: &DatabaseSchema,
    ) -> Result<Vec<String>, SchemaAnalysisError> {
        let mut client = mssql::connect(&self.connection_string).await?;
        let current_names = fetch_table_names(&mut client).await?;

        let mut changed = Vec::new();
        for name in current_names {
            match fetch_modify_date(&mut client, &name).await {
                Ok(modify_date) => {
                    if table_changed(previous, &name, modify_date) {
                        debug!(table = %name, "table changed since previous analysis");
                        changed.push(name);
                    }
                }
                Err(failure) => {
                    warn!(table = %name, error = %failure, "change check failed, treating table as changed");
                    changed.push(name);
                }
            }
        }

        info!(changed = changed.len(), "change detection complete");
        Ok(changed)
    }

    async fn verify_connection(&self) -> Result<(), SchemaAnalysisError> {
        let mut client = mssql::connect(&self.connection_string).await?;
        client
            .simple_query("SELECT 1")
            .await
            .map_err(|source| SchemaAnalysisError::ConnectionFailed { source })?
            .into_row()
            .await
            .map_err(|source| SchemaAnalysisError::ConnectionFailed { source })?;
        Ok(())
    }
}

/// Decide whether a table must be re-analyzed.
///
/// Tables missing from the previous snapshot are always changed. A table
/// with no readable modification date is treated as unchanged; otherwise it
/// is changed when the catalog timestamp is newer than the previous
/// analysis date.
pub fn table_changed(
    previous: &DatabaseSchema,
    table: &str,
    modify_date: Option<NaiveDateTime>,
) -> bool {
    if previous.table(table).is_none() {
        return true;
    }
    match modify_date {
        Some(modified) => modified > previous.analysis_date.naive_utc(),
        None => false,
    }
}

async fn fetch_database_name(client: &mut SqlClient) -> Result<String, SchemaAnalysisError> {
    let row = client
        .simple_query(DATABASE_NAME_QUERY)
        .await
        .map_err(|source| SchemaAnalysisError::IdentityQuery { source })?
        .into_row()
        .await
        .map_err(|source| SchemaAnalysisError::IdentityQuery { source })?
        .ok_or(SchemaAnalysisError::MissingValue {
            context: "database identity",
            column: "DatabaseName",
        })?;
    Ok(rows::required::<&str>(&row, "database identity", "DatabaseName")?.to_string())
}

async fn fetch_server_name(client: &mut SqlClient) -> Result<String, SchemaAnalysisError> {
    let row = client
        .simple_query(SERVER_NAME_QUERY)
        .await
        .map_err(|source| SchemaAnalysisError::IdentityQuery { source })?
        .into_row()
        .await
        .map_err(|source| SchemaAnalysisError::IdentityQuery { source })?
        .ok_or(SchemaAnalysisError::MissingValue {
            context: "database identity",
            column: "ServerName",
        })?;
    // @@SERVERNAME is null on servers renamed without sp_addserver
    let server = rows::optional::<&str>(&row, "database identity", "ServerName")?;
    Ok(server.unwrap_or_default().to_string())
}

pub(crate) async fn fetch_table_names(
    client: &mut SqlClient,
) -> Result<Vec<String>, SchemaAnalysisError> {
    let result_rows = client
        .simple_query(TABLE_LIST_QUERY)
        .await
        .map_err(|source| SchemaAnalysisError::TableListQuery { source })?
        .into_first_result()
        .await
        .map_err(|source| SchemaAnalysisError::TableListQuery { source })?;

    result_rows
        .iter()
        .map(|row| rows::required::<&str>(row, "table list", "TableName").map(str::to_string))
        .collect()
}

async fn fetch_modify_date(
    client: &mut SqlClient,
    full_name: &str,
) -> Result<Option<NaiveDateTime>, SchemaAnalysisError> {
    let row = client
        .query(MODIFY_DATE_QUERY, &[&full_name])
        .await
        .map_err(|source| SchemaAnalysisError::TableInfoQuery {
            table: full_name.to_string(),
            source,
        })?
        .into_row()
        .await
        .map_err(|source| SchemaAnalysisError::TableInfoQuery {
            table: full_name.to_string(),
            source,
        })?;

    match row {
        Some(row) => rows::optional(&row, "table info", "modify_date"),
        None => Ok(None),
    }
}
