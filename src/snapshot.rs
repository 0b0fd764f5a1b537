//! Snapshot persistence and structural fingerprints
//!
//! Snapshots are pretty-printed JSON renderings of a `DatabaseSchema`,
//! saved between runs so the next analysis can be incremental. Fingerprints
//! hash a table's structure for comparisons that outlive catalog
//! timestamps.

use std::fs;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::SchemaAnalysisError;
use crate::model::{DatabaseSchema, Table};

/// Write a schema snapshot as pretty-printed JSON.
///
/// Missing parent directories are created.
pub fn save_snapshot(schema: &DatabaseSchema, path: &Path) -> Result<(), SchemaAnalysisError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| SchemaAnalysisError::SnapshotWrite {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    let json = serde_json::to_string_pretty(schema).map_err(|source| {
        SchemaAnalysisError::SnapshotFormat {
            path: path.to_path_buf(),
            source,
        }
    })?;
    fs::write(path, json).map_err(|source| SchemaAnalysisError::SnapshotWrite {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), "snapshot saved");
    Ok(())
}

/// Read a schema snapshot back from disk.
///
/// A missing file is not an error; it means no previous analysis exists.
pub fn load_snapshot(path: &Path) -> Result<Option<DatabaseSchema>, SchemaAnalysisError> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SchemaAnalysisError::SnapshotRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let schema =
        serde_json::from_str(&json).map_err(|source| SchemaAnalysisError::SnapshotFormat {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(schema))
}

/// Hash a table's structural identity.
///
/// Covers columns, primary key, indexes and extended properties. Catalog
/// timestamps and descriptions are excluded, so re-creating an identical
/// table or editing its documentation does not change the fingerprint.
pub fn table_fingerprint(table: &Table) -> String {
    let mut hasher = Sha256::new();
    hasher.update(table.schema.as_bytes());
    hasher.update([0]);
    hasher.update(table.name.as_bytes());
    hasher.update([0]);

    for column in &table.columns {
        hasher.update(column.name.as_bytes());
        hasher.update([1]);
        hasher.update(column.sql_type.as_bytes());
        hasher.update(column.max_length.to_le_bytes());
        hasher.update(column.precision.to_le_bytes());
        hasher.update(column.scale.to_le_bytes());
        hasher.update([
            column.is_nullable as u8,
            column.is_identity as u8,
            column.is_computed as u8,
            column.is_primary_key as u8,
        ]);
        if let Some(default_value) = &column.default_value {
            hasher.update(default_value.as_bytes());
        }
        hasher.update([2]);
        if let Some(definition) = &column.computed_definition {
            hasher.update(definition.as_bytes());
        }
        hasher.update([2]);
        for (key, value) in &column.extended_properties {
            hasher.update(key.as_bytes());
            hasher.update([3]);
            hasher.update(value.as_bytes());
            hasher.update([3]);
        }
        hasher.update([1]);
    }

    for key_column in &table.primary_key_columns {
        hasher.update(key_column.as_bytes());
        hasher.update([4]);
    }

    for index in &table.indexes {
        hasher.update(index.name.as_bytes());
        hasher.update([index.is_unique as u8, index.is_primary_key as u8]);
        hasher.update(index.type_desc.as_bytes());
        for column in &index.columns {
            hasher.update(column.as_bytes());
            hasher.update([5]);
        }
        hasher.update([4]);
    }

    for (key, value) in &table.extended_properties {
        hasher.update(key.as_bytes());
        hasher.update([6]);
        hasher.update(value.as_bytes());
        hasher.update([6]);
    }

    hex::encode(hasher.finalize())
}

/// Names of tables whose structure differs between two snapshots.
///
/// Tables present only in `current` count as changed; tables dropped since
/// `previous` do not appear since there is nothing left to re-analyze.
pub fn changed_fingerprints(previous: &DatabaseSchema, current: &DatabaseSchema) -> Vec<String> {
    let mut changed = Vec::new();
    for table in &current.tables {
        let full_name = table.full_name();
        match previous.table(&full_name) {
            Some(previous_table) => {
                if table_fingerprint(previous_table) != table_fingerprint(table) {
                    changed.push(full_name);
                }
            }
            None => changed.push(full_name),
        }
    }
    changed
}
