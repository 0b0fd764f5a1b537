//! Unit tests for the column naming convention
//!
//! These tests verify classification of column names and `ccType` /
//! `ccDNA` extended property overrides through the public API.

use std::collections::BTreeMap;

use mssql_schema_analyzer::convention::{classify_column, classify_name};
use mssql_schema_analyzer::model::ColumnPrefix;

/// Helper to build an extended property map
fn properties(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ============================================================================
// Name Prefix Tests
// ============================================================================

#[test]
fn test_every_prefix_token_round_trips_through_classify_name() {
    let prefixes = [
        ColumnPrefix::OneWayEncryption,
        ColumnPrefix::TwoWayEncryption,
        ColumnPrefix::Enumeration,
        ColumnPrefix::Lookup,
        ColumnPrefix::Localization,
        ColumnPrefix::Calculated,
        ColumnPrefix::BusinessLogic,
        ColumnPrefix::Aggregate,
        ColumnPrefix::SeparateUpdate,
        ColumnPrefix::SeparateList,
        ColumnPrefix::Upload,
        ColumnPrefix::FakeUniqueIndex,
        ColumnPrefix::SeparateChangedBy,
    ];

    for prefix in prefixes {
        let token = prefix.token().expect("every prefix has a token");
        let name = format!("{}_Value", token);
        assert_eq!(
            classify_name(&name),
            (prefix, "Value"),
            "token {} should classify",
            token
        );
    }
}

#[test]
fn test_none_has_no_token() {
    assert_eq!(ColumnPrefix::None.token(), None);
}

#[test]
fn test_unprefixed_names_keep_their_full_base_name() {
    assert_eq!(
        classify_name("CustomerID"),
        (ColumnPrefix::None, "CustomerID")
    );
    assert_eq!(classify_name("Name"), (ColumnPrefix::None, "Name"));
}

#[test]
fn test_prefix_requires_the_underscore_delimiter() {
    assert_eq!(
        classify_name("enoPassword"),
        (ColumnPrefix::None, "enoPassword")
    );
}

#[test]
fn test_base_name_keeps_later_underscores() {
    assert_eq!(
        classify_name("lkp_Country_Code"),
        (ColumnPrefix::Lookup, "Country_Code")
    );
}

// ============================================================================
// Extended Property Override Tests
// ============================================================================

#[test]
fn test_cc_type_overrides_a_name_derived_prefix() {
    let classification = classify_column("lkp_Status", &properties(&[("ccType", "clc")]));
    assert_eq!(classification.prefix, ColumnPrefix::Calculated);
    assert_eq!(classification.base_name, "Status");
    assert!(classification.is_read_only);
}

#[test]
fn test_cc_type_token_order_does_not_matter() {
    let forward = classify_column("Balance", &properties(&[("ccType", "blg,clc")]));
    let reverse = classify_column("Balance", &properties(&[("ccType", "clc,blg")]));
    assert_eq!(forward, reverse);
    assert_eq!(forward.prefix, ColumnPrefix::Calculated);
    assert!(forward.is_read_only);
}

#[test]
fn test_spt_leaves_an_earlier_read_only_flag_in_place() {
    let classification = classify_column("Total", &properties(&[("ccType", "blg,spt")]));
    assert_eq!(classification.prefix, ColumnPrefix::SeparateUpdate);
    assert!(
        classification.is_read_only,
        "read-only set by blg should survive spt"
    );
}

#[test]
fn test_spt_alone_is_writable() {
    let classification = classify_column("Total", &properties(&[("ccType", "spt")]));
    assert_eq!(classification.prefix, ColumnPrefix::SeparateUpdate);
    assert!(!classification.is_read_only);
}

#[test]
fn test_cc_dna_marks_do_not_audit() {
    let audited = classify_column("LastSeen", &properties(&[]));
    assert!(!audited.do_not_audit);

    let excluded = classify_column("LastSeen", &properties(&[("ccDNA", "1")]));
    assert!(excluded.do_not_audit);

    let other_value = classify_column("LastSeen", &properties(&[("ccDNA", "0")]));
    assert!(!other_value.do_not_audit);
}

// ============================================================================
// Derived Flag Tests
// ============================================================================

#[test]
fn test_encryption_prefixes_set_is_encrypted() {
    let one_way = classify_column("eno_Password", &properties(&[]));
    assert!(one_way.is_encrypted);
    assert!(!one_way.is_read_only);

    let two_way = classify_column("ent_CardNumber", &properties(&[]));
    assert!(two_way.is_encrypted);
}

#[test]
fn test_read_only_prefixes_set_is_read_only() {
    for name in ["clc_Total", "blg_Score", "agg_OrderCount"] {
        let classification = classify_column(name, &properties(&[]));
        assert!(classification.is_read_only, "{} should be read-only", name);
        assert!(!classification.is_encrypted);
    }
}

#[test]
fn test_neutral_prefixes_set_no_flags() {
    for name in ["lkp_Country", "loc_Title", "spl_Tags", "upl_Avatar"] {
        let classification = classify_column(name, &properties(&[]));
        assert!(!classification.is_read_only, "{} is writable", name);
        assert!(!classification.is_encrypted, "{} is not encrypted", name);
        assert!(!classification.do_not_audit, "{} is audited", name);
    }
}
