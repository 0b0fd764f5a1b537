//! Aggregate database schema snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Relationship, Table};

/// The complete result of one analysis run.
///
/// A fresh instance is produced on every analysis. Incremental runs yield a
/// snapshot containing only the re-analyzed tables, flagged
/// `is_incremental`; merging into a previously retained full snapshot is the
/// caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSchema {
    pub database_name: String,
    pub server_name: String,
    /// UTC timestamp captured before table analysis began, used as the
    /// watermark for change detection
    pub analysis_date: DateTime<Utc>,
    pub tables: Vec<Table>,
    pub relationships: Vec<Relationship>,
    pub is_incremental: bool,
}

impl DatabaseSchema {
    /// Look up a table by its `schema.name` identifier (case-insensitive)
    pub fn table(&self, full_name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| t.full_name().eq_ignore_ascii_case(full_name))
    }

    /// Identifiers of all tables in this snapshot, in analysis order
    pub fn table_names(&self) -> Vec<String> {
        self.tables.iter().map(Table::full_name).collect()
    }
}
