//! Unit tests for snapshot persistence
//!
//! These tests verify saving and loading schema snapshots on disk,
//! including the missing-file and malformed-file cases.

use std::collections::BTreeMap;
use std::fs;

use chrono::{TimeZone, Utc};
use tempfile::tempdir;

use mssql_schema_analyzer::model::{DatabaseSchema, Table};
use mssql_schema_analyzer::snapshot::{load_snapshot, save_snapshot};
use mssql_schema_analyzer::SchemaAnalysisError;

fn sample_schema() -> DatabaseSchema {
    let customer = Table {
        schema: "dbo".to_string(),
        name: "Customer".to_string(),
        object_id: 101,
        columns: Vec::new(),
        primary_key_columns: vec!["CustomerID".to_string()],
        indexes: Vec::new(),
        create_date: None,
        modify_date: Some(
            Utc.with_ymd_and_hms(2024, 5, 30, 8, 15, 0)
                .single()
                .unwrap()
                .naive_utc(),
        ),
        description: Some("Customer master data".to_string()),
        extended_properties: BTreeMap::new(),
    };
    DatabaseSchema {
        database_name: "Shop".to_string(),
        server_name: "sql01".to_string(),
        analysis_date: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().unwrap(),
        tables: vec![customer],
        relationships: Vec::new(),
        is_incremental: false,
    }
}

#[test]
fn test_snapshot_round_trips_through_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("schema.json");

    let schema = sample_schema();
    save_snapshot(&schema, &path).unwrap();

    let restored = load_snapshot(&path).unwrap().expect("snapshot should exist");
    assert_eq!(restored, schema);
}

#[test]
fn test_loading_a_missing_snapshot_yields_none() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("never-written.json");
    assert!(load_snapshot(&path).unwrap().is_none());
}

#[test]
fn test_saving_creates_missing_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("schema.json");

    save_snapshot(&sample_schema(), &path).unwrap();
    assert!(path.exists());
    assert!(load_snapshot(&path).unwrap().is_some());
}

#[test]
fn test_malformed_snapshot_reports_a_format_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("schema.json");
    fs::write(&path, "{ not valid json").unwrap();

    let result = load_snapshot(&path);
    assert!(matches!(
        result,
        Err(SchemaAnalysisError::SnapshotFormat { .. })
    ));
}

#[test]
fn test_snapshot_file_is_readable_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("schema.json");
    save_snapshot(&sample_schema(), &path).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    // Pretty-printed with one field per line
    assert!(raw.contains("\"database_name\": \"Shop\""));
    assert!(raw.lines().count() > 10);
}

#[test]
fn test_saving_over_an_existing_snapshot_replaces_it() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("schema.json");

    save_snapshot(&sample_schema(), &path).unwrap();

    let mut second = sample_schema();
    second.database_name = "ShopArchive".to_string();
    save_snapshot(&second, &path).unwrap();

    let restored = load_snapshot(&path).unwrap().unwrap();
    assert_eq!(restored.database_name, "ShopArchive");
}
