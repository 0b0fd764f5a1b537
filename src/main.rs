use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mssql_schema_analyzer::analyzer::SchemaAnalyzer;
use mssql_schema_analyzer::snapshot;
use mssql_schema_analyzer::{analyze_database, AnalyzeOptions};

#[derive(Parser)]
#[command(name = "mssql-schema-analyzer")]
#[command(author, version, about = "Schema and naming convention analyzer for SQL Server databases")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a database into a schema snapshot
    Analyze {
        /// ADO.NET style connection string
        #[arg(short, long)]
        connection: String,

        /// Output path for the snapshot JSON (prints a summary when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Snapshot of a previous analysis; enables incremental analysis
        #[arg(short, long)]
        previous: Option<PathBuf>,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
    /// List tables changed since a previous snapshot
    DetectChanges {
        /// ADO.NET style connection string
        #[arg(short, long)]
        connection: String,

        /// Snapshot of the previous analysis
        #[arg(short, long)]
        snapshot: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            connection,
            output,
            previous,
            verbose,
        } => {
            let options = AnalyzeOptions {
                connection_string: connection,
                previous_snapshot: previous,
                verbose,
            };

            let schema = analyze_database(options).await?;

            match output {
                Some(path) => {
                    snapshot::save_snapshot(&schema, &path)?;
                    println!("Saved snapshot: {}", path.display());
                }
                None => println!(
                    "Analyzed {}: {} tables, {} relationships",
                    schema.database_name,
                    schema.tables.len(),
                    schema.relationships.len()
                ),
            }
        }
        Commands::DetectChanges {
            connection,
            snapshot: snapshot_path,
        } => {
            let previous = snapshot::load_snapshot(&snapshot_path)?
                .ok_or_else(|| anyhow!("no snapshot at {}", snapshot_path.display()))?;

            let schema_analyzer = SchemaAnalyzer::new(&connection);
            let changed = schema_analyzer.detect_changed_tables(&previous).await?;

            if changed.is_empty() {
                println!("No tables changed since {}", previous.analysis_date);
            } else {
                for table in &changed {
                    println!("{table}");
                }
            }
        }
    }

    Ok(())
}
