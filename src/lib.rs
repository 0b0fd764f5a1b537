//! mssql-schema-analyzer: Schema and naming convention analysis for SQL Server
//!
//! This library reads live catalog metadata into immutable schema snapshots,
//! classifying columns by the cc naming prefix convention and foreign keys
//! by cardinality, with incremental re-analysis driven by catalog
//! modification dates.

pub mod analyzer;
pub mod convention;
pub mod error;
pub mod model;
pub mod mssql;
pub mod snapshot;

use std::path::PathBuf;

use anyhow::{bail, Result};

use analyzer::SchemaAnalyzer;
use model::DatabaseSchema;

pub use error::SchemaAnalysisError;

/// Options for analyzing a database
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// ADO.NET style connection string
    pub connection_string: String,
    /// Snapshot of a previous analysis; enables incremental analysis
    pub previous_snapshot: Option<PathBuf>,
    /// Enable verbose output
    pub verbose: bool,
}

/// Analyze a database, incrementally when a previous snapshot is given
pub async fn analyze_database(options: AnalyzeOptions) -> Result<DatabaseSchema> {
    let schema_analyzer = SchemaAnalyzer::new(&options.connection_string);

    // Step 1: Verify connectivity
    if !schema_analyzer.connect().await {
        bail!("could not connect to the database");
    }

    if options.verbose {
        println!("Connection verified");
    }

    // Step 2: Load the previous snapshot when one is given
    let previous = match &options.previous_snapshot {
        Some(path) => snapshot::load_snapshot(path)?,
        None => None,
    };

    if options.verbose {
        if let Some(previous) = &previous {
            println!(
                "Loaded previous snapshot of {} ({} tables)",
                previous.database_name,
                previous.tables.len()
            );
        }
    }

    // Step 3: Analyze, incrementally against the previous snapshot
    let schema = match previous {
        Some(previous) => {
            let changed = schema_analyzer.detect_changed_tables(&previous).await?;

            if options.verbose {
                println!("Detected {} changed tables", changed.len());
            }

            schema_analyzer.analyze_incremental(&changed).await?
        }
        None => schema_analyzer.analyze_full().await?,
    };

    if options.verbose {
        println!(
            "Analyzed {} tables and {} relationships",
            schema.tables.len(),
            schema.relationships.len()
        );
    }

    Ok(schema)
}
