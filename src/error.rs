//! Error types for mssql-schema-analyzer

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during schema analysis
#[derive(Error, Debug)]
pub enum SchemaAnalysisError {
    #[error("Invalid connection string")]
    InvalidConnectionString {
        #[source]
        source: tiberius::error::Error,
    },

    #[error("Failed to connect to SQL Server")]
    ConnectionFailed {
        #[source]
        source: tiberius::error::Error,
    },

    #[error("Failed to read database identity")]
    IdentityQuery {
        #[source]
        source: tiberius::error::Error,
    },

    #[error("Failed to list user tables")]
    TableListQuery {
        #[source]
        source: tiberius::error::Error,
    },

    #[error("Table not found: {table}")]
    TableNotFound { table: String },

    #[error("Failed to read table metadata for {table}")]
    TableInfoQuery {
        table: String,
        #[source]
        source: tiberius::error::Error,
    },

    #[error("Failed to read columns for {table}")]
    ColumnQuery {
        table: String,
        #[source]
        source: tiberius::error::Error,
    },

    #[error("Failed to read primary key for {table}")]
    PrimaryKeyQuery {
        table: String,
        #[source]
        source: tiberius::error::Error,
    },

    #[error("Failed to read indexes for {table}")]
    IndexQuery {
        table: String,
        #[source]
        source: tiberius::error::Error,
    },

    #[error("Failed to read extended properties for {table}")]
    PropertyQuery {
        table: String,
        #[source]
        source: tiberius::error::Error,
    },

    #[error("Failed to read foreign key constraints")]
    RelationshipQuery {
        #[source]
        source: tiberius::error::Error,
    },

    #[error("Failed to read enumeration values")]
    EnumQuery {
        #[source]
        source: tiberius::error::Error,
    },

    #[error("Failed to read view metadata")]
    ViewQuery {
        #[source]
        source: tiberius::error::Error,
    },

    #[error("Failed to decode {column} in {context} row")]
    RowDecode {
        context: &'static str,
        column: &'static str,
        #[source]
        source: tiberius::error::Error,
    },

    #[error("Unexpected null {column} in {context} row")]
    MissingValue {
        context: &'static str,
        column: &'static str,
    },

    #[error("Failed to read schema snapshot: {path}")]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write schema snapshot: {path}")]
    SnapshotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid schema snapshot format: {path}")]
    SnapshotFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
