//! Unit tests for change detection
//!
//! These tests cover the modify-date decision used by incremental analysis
//! and the structural fingerprints used to compare snapshots.

use std::collections::BTreeMap;

use chrono::{Duration, TimeZone, Utc};

use mssql_schema_analyzer::analyzer::table_changed;
use mssql_schema_analyzer::model::{
    Column, ColumnPrefix, DatabaseSchema, Index, SemanticType, Table,
};
use mssql_schema_analyzer::snapshot::{changed_fingerprints, table_fingerprint};

/// Helper to build a plain column
fn column(column_id: i32, name: &str, sql_type: &str, semantic_type: SemanticType) -> Column {
    Column {
        column_id,
        name: name.to_string(),
        sql_type: sql_type.to_string(),
        semantic_type,
        max_length: 4,
        precision: 10,
        scale: 0,
        is_nullable: false,
        is_identity: false,
        is_computed: false,
        is_primary_key: false,
        default_value: None,
        computed_definition: None,
        description: None,
        extended_properties: BTreeMap::new(),
        prefix: ColumnPrefix::None,
        base_name: name.to_string(),
        is_encrypted: false,
        is_read_only: false,
        do_not_audit: false,
    }
}

fn customer_table() -> Table {
    Table {
        schema: "dbo".to_string(),
        name: "Customer".to_string(),
        object_id: 101,
        columns: vec![
            column(1, "CustomerID", "int", SemanticType::Int32),
            column(2, "Name", "nvarchar", SemanticType::String),
        ],
        primary_key_columns: vec!["CustomerID".to_string()],
        indexes: vec![Index {
            name: "PK_Customer".to_string(),
            is_unique: true,
            is_primary_key: true,
            type_desc: "CLUSTERED".to_string(),
            columns: vec!["CustomerID".to_string()],
        }],
        create_date: None,
        modify_date: None,
        description: None,
        extended_properties: BTreeMap::new(),
    }
}

fn schema_with(tables: Vec<Table>) -> DatabaseSchema {
    DatabaseSchema {
        database_name: "Shop".to_string(),
        server_name: "sql01".to_string(),
        analysis_date: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().unwrap(),
        tables,
        relationships: Vec::new(),
        is_incremental: false,
    }
}

// ============================================================================
// Modify-Date Decision Tests
// ============================================================================

#[test]
fn test_table_missing_from_previous_snapshot_is_changed() {
    let previous = schema_with(vec![customer_table()]);
    assert!(table_changed(&previous, "dbo.Order", None));

    let just_created = previous.analysis_date.naive_utc() - Duration::days(30);
    assert!(table_changed(&previous, "dbo.Order", Some(just_created)));
}

#[test]
fn test_known_table_without_modify_date_is_unchanged() {
    let previous = schema_with(vec![customer_table()]);
    assert!(!table_changed(&previous, "dbo.Customer", None));
}

#[test]
fn test_modify_date_is_compared_against_the_analysis_date() {
    let previous = schema_with(vec![customer_table()]);
    let watermark = previous.analysis_date.naive_utc();

    assert!(table_changed(
        &previous,
        "dbo.Customer",
        Some(watermark + Duration::seconds(1))
    ));
    assert!(!table_changed(&previous, "dbo.Customer", Some(watermark)));
    assert!(!table_changed(
        &previous,
        "dbo.Customer",
        Some(watermark - Duration::seconds(1))
    ));
}

// ============================================================================
// Fingerprint Tests
// ============================================================================

#[test]
fn test_fingerprint_is_stable_for_equal_structure() {
    assert_eq!(
        table_fingerprint(&customer_table()),
        table_fingerprint(&customer_table())
    );
}

#[test]
fn test_fingerprint_ignores_timestamps_and_descriptions() {
    let mut redeployed = customer_table();
    redeployed.create_date = Some(Utc::now().naive_utc());
    redeployed.modify_date = Some(Utc::now().naive_utc());
    redeployed.description = Some("Customer master data".to_string());
    redeployed.columns[1].description = Some("Display name".to_string());

    assert_eq!(
        table_fingerprint(&customer_table()),
        table_fingerprint(&redeployed)
    );
}

#[test]
fn test_fingerprint_sees_added_columns() {
    let mut altered = customer_table();
    altered
        .columns
        .push(column(3, "Balance", "decimal", SemanticType::Decimal));
    assert_ne!(table_fingerprint(&customer_table()), table_fingerprint(&altered));
}

#[test]
fn test_fingerprint_sees_type_and_nullability_changes() {
    let mut retyped = customer_table();
    retyped.columns[1].sql_type = "varchar".to_string();
    assert_ne!(table_fingerprint(&customer_table()), table_fingerprint(&retyped));

    let mut relaxed = customer_table();
    relaxed.columns[1].is_nullable = true;
    assert_ne!(table_fingerprint(&customer_table()), table_fingerprint(&relaxed));
}

#[test]
fn test_fingerprint_sees_index_changes() {
    let mut reindexed = customer_table();
    reindexed.indexes.push(Index {
        name: "IX_Customer_Name".to_string(),
        is_unique: false,
        is_primary_key: false,
        type_desc: "NONCLUSTERED".to_string(),
        columns: vec!["Name".to_string()],
    });
    assert_ne!(
        table_fingerprint(&customer_table()),
        table_fingerprint(&reindexed)
    );
}

#[test]
fn test_fingerprint_sees_extended_property_changes() {
    let mut reclassified = customer_table();
    reclassified.columns[1]
        .extended_properties
        .insert("ccType".to_string(), "clc".to_string());
    assert_ne!(
        table_fingerprint(&customer_table()),
        table_fingerprint(&reclassified)
    );
}

// ============================================================================
// Snapshot Comparison Tests
// ============================================================================

#[test]
fn test_changed_fingerprints_reports_new_and_altered_tables() {
    let previous = schema_with(vec![customer_table()]);

    let mut altered_customer = customer_table();
    altered_customer
        .columns
        .push(column(3, "Balance", "decimal", SemanticType::Decimal));
    let mut order = customer_table();
    order.name = "Order".to_string();
    let current = schema_with(vec![altered_customer, order]);

    assert_eq!(
        changed_fingerprints(&previous, &current),
        vec!["dbo.Customer".to_string(), "dbo.Order".to_string()]
    );
}

#[test]
fn test_changed_fingerprints_is_empty_for_identical_snapshots() {
    let previous = schema_with(vec![customer_table()]);
    let current = schema_with(vec![customer_table()]);
    assert!(changed_fingerprints(&previous, &current).is_empty());
}

#[test]
fn test_dropped_tables_do_not_appear_in_changed_fingerprints() {
    let previous = schema_with(vec![customer_table()]);
    let current = schema_with(Vec::new());
    assert!(changed_fingerprints(&previous, &current).is_empty());
}
