//! Unit tests for relationship graph helpers
//!
//! These tests verify cardinality classification and the derived
//! parent/child views over a set of foreign keys.

use std::collections::BTreeMap;

use mssql_schema_analyzer::analyzer::{
    build_graph, classify_cardinality, get_child_tables, get_parent_tables, RelationshipAnalyzer,
};
use mssql_schema_analyzer::model::{Index, Relationship, RelationshipType, Table};

/// Helper to build a relationship with the default cardinality
fn relationship(constraint: &str, parent: &str, referenced: &str, parent_column: &str) -> Relationship {
    Relationship {
        constraint_name: constraint.to_string(),
        parent_table: parent.to_string(),
        referenced_table: referenced.to_string(),
        parent_column: parent_column.to_string(),
        referenced_column: "ID".to_string(),
        delete_action: "NO_ACTION".to_string(),
        update_action: "NO_ACTION".to_string(),
        is_disabled: false,
        kind: RelationshipType::OneToMany,
    }
}

/// Helper to build a table carrying the given indexes
fn table(name: &str, indexes: Vec<Index>) -> Table {
    Table {
        schema: "dbo".to_string(),
        name: name.to_string(),
        object_id: 7,
        columns: Vec::new(),
        primary_key_columns: Vec::new(),
        indexes,
        create_date: None,
        modify_date: None,
        description: None,
        extended_properties: BTreeMap::new(),
    }
}

fn index(name: &str, is_unique: bool, is_primary_key: bool, columns: &[&str]) -> Index {
    Index {
        name: name.to_string(),
        is_unique,
        is_primary_key,
        type_desc: if is_primary_key { "CLUSTERED" } else { "NONCLUSTERED" }.to_string(),
        columns: columns.iter().map(|c| c.to_string()).collect(),
    }
}

/// A typical order/customer/product set of foreign keys
fn shop_relationships() -> Vec<Relationship> {
    vec![
        relationship("FK_Order_Customer", "dbo.Order", "dbo.Customer", "CustomerID"),
        relationship("FK_Order_Product", "dbo.Order", "dbo.Product", "ProductID"),
        relationship("FK_Invoice_Order", "dbo.Invoice", "dbo.Order", "OrderID"),
        relationship("FK_Invoice_Customer", "dbo.Invoice", "dbo.Customer", "CustomerID"),
    ]
}

// ============================================================================
// Cardinality Classification Tests
// ============================================================================

#[test]
fn test_realistic_profile_table_classifies_one_to_one() {
    // Primary key on its own column plus a unique constraint on the FK column
    let profile = table(
        "CustomerProfile",
        vec![
            index("PK_CustomerProfile", true, true, &["ProfileID"]),
            index("UQ_CustomerProfile_Customer", true, false, &["CustomerID"]),
        ],
    );
    assert_eq!(
        classify_cardinality(Some(&profile), "CustomerID"),
        RelationshipType::OneToOne
    );
}

#[test]
fn test_plain_lookup_index_classifies_one_to_many() {
    let order = table(
        "Order",
        vec![
            index("PK_Order", true, true, &["OrderID"]),
            index("IX_Order_CustomerID", false, false, &["CustomerID"]),
        ],
    );
    assert_eq!(
        classify_cardinality(Some(&order), "CustomerID"),
        RelationshipType::OneToMany
    );
}

#[test]
fn test_unique_index_on_other_columns_does_not_apply() {
    let order = table(
        "Order",
        vec![index("UQ_Order_Number", true, false, &["OrderNumber"])],
    );
    assert_eq!(
        classify_cardinality(Some(&order), "CustomerID"),
        RelationshipType::OneToMany
    );
}

#[test]
fn test_one_to_many_is_the_default_cardinality() {
    assert_eq!(RelationshipType::default(), RelationshipType::OneToMany);
    assert_eq!(
        classify_cardinality(None, "CustomerID"),
        RelationshipType::OneToMany
    );
}

// ============================================================================
// Graph Helper Tests
// ============================================================================

#[test]
fn test_parent_tables_for_a_fact_table() {
    let relationships = shop_relationships();
    assert_eq!(
        get_parent_tables(&relationships, "dbo.Order"),
        vec!["dbo.Customer".to_string(), "dbo.Product".to_string()]
    );
    assert_eq!(
        get_parent_tables(&relationships, "dbo.Invoice"),
        vec!["dbo.Order".to_string(), "dbo.Customer".to_string()]
    );
    assert!(get_parent_tables(&relationships, "dbo.Customer").is_empty());
}

#[test]
fn test_child_tables_for_a_dimension_table() {
    let relationships = shop_relationships();
    assert_eq!(
        get_child_tables(&relationships, "dbo.Customer"),
        vec!["dbo.Order".to_string(), "dbo.Invoice".to_string()]
    );
    assert_eq!(
        get_child_tables(&relationships, "dbo.Product"),
        vec!["dbo.Order".to_string()]
    );
}

#[test]
fn test_duplicate_foreign_keys_between_a_pair_are_reported_once() {
    let relationships = vec![
        relationship("FK_Order_BillTo", "dbo.Order", "dbo.Customer", "BillToID"),
        relationship("FK_Order_ShipTo", "dbo.Order", "dbo.Customer", "ShipToID"),
    ];
    assert_eq!(
        get_parent_tables(&relationships, "dbo.Order"),
        vec!["dbo.Customer".to_string()]
    );
    let graph = build_graph(&relationships);
    assert_eq!(graph["dbo.Order"], vec!["dbo.Customer".to_string()]);
}

#[test]
fn test_graph_covers_every_table_in_the_relationship_set() {
    let graph = build_graph(&shop_relationships());
    assert_eq!(graph.len(), 4);
    assert_eq!(
        graph["dbo.Order"],
        vec!["dbo.Customer".to_string(), "dbo.Product".to_string()]
    );
    assert_eq!(
        graph["dbo.Invoice"],
        vec!["dbo.Order".to_string(), "dbo.Customer".to_string()]
    );
    assert!(graph["dbo.Customer"].is_empty());
    assert!(graph["dbo.Product"].is_empty());
}

#[test]
fn test_self_referencing_table_appears_on_both_sides() {
    let relationships = vec![relationship(
        "FK_Employee_Manager",
        "dbo.Employee",
        "dbo.Employee",
        "ManagerID",
    )];
    assert_eq!(
        get_parent_tables(&relationships, "dbo.Employee"),
        vec!["dbo.Employee".to_string()]
    );
    assert_eq!(
        get_child_tables(&relationships, "dbo.Employee"),
        vec!["dbo.Employee".to_string()]
    );
    let graph = build_graph(&relationships);
    assert_eq!(graph["dbo.Employee"], vec!["dbo.Employee".to_string()]);
}

#[tokio::test]
async fn test_empty_table_filter_returns_without_connecting() {
    // The host below does not resolve, so this only passes if the empty
    // filter short-circuits before a connection is opened.
    let analyzer = RelationshipAnalyzer::new("Server=host.invalid,1;User Id=sa;Password=x;");
    let relationships = analyzer.analyze_for_tables(&[]).await.unwrap();
    assert!(relationships.is_empty());
}
