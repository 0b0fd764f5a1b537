//! Naming-convention classification for columns.
//!
//! Column names carry an optional three-letter prefix token separated from
//! the base name by an underscore (`eno_Password`, `clc_Total`). The prefix
//! encodes non-default handling such as encryption or read-only state.
//! Extended properties can override the name-derived classification: `ccType`
//! holds a comma-separated token list applied through a fixed rule order, and
//! `ccDNA = "1"` excludes the column from auditing.
//!
//! Everything here is a pure function of its inputs; no database access and
//! no mutable state.

use std::collections::BTreeMap;

use crate::model::ColumnPrefix;

/// Recognized name prefix tokens and their classifications
const PREFIX_TOKENS: [(&str, ColumnPrefix); 13] = [
    ("eno", ColumnPrefix::OneWayEncryption),
    ("ent", ColumnPrefix::TwoWayEncryption),
    ("enm", ColumnPrefix::Enumeration),
    ("lkp", ColumnPrefix::Lookup),
    ("loc", ColumnPrefix::Localization),
    ("clc", ColumnPrefix::Calculated),
    ("blg", ColumnPrefix::BusinessLogic),
    ("agg", ColumnPrefix::Aggregate),
    ("spt", ColumnPrefix::SeparateUpdate),
    ("spl", ColumnPrefix::SeparateList),
    ("upl", ColumnPrefix::Upload),
    ("fui", ColumnPrefix::FakeUniqueIndex),
    ("scb", ColumnPrefix::SeparateChangedBy),
];

/// `ccType` tokens in their fixed evaluation order. Each entry is
/// (token, classification, forces read-only). A later rule overwrites the
/// classification set by an earlier one, so this order is the precedence:
/// `"blg,clc"` and `"clc,blg"` both end at `Calculated`.
const CC_TYPE_RULES: [(&str, ColumnPrefix, bool); 4] = [
    ("blg", ColumnPrefix::BusinessLogic, true),
    ("clc", ColumnPrefix::Calculated, true),
    ("spt", ColumnPrefix::SeparateUpdate, false),
    ("agg", ColumnPrefix::Aggregate, true),
];

/// Derived classification of a column name plus its extended properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub prefix: ColumnPrefix,
    pub base_name: String,
    pub is_encrypted: bool,
    pub is_read_only: bool,
    pub do_not_audit: bool,
}

/// Split a column name into its prefix classification and base name.
///
/// Matching is case-insensitive and requires the underscore delimiter:
/// `eno_Password` classifies as one-way encryption with base name
/// `Password`, while `enoPassword` does not classify at all.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(classify_name("clc_Total"), (ColumnPrefix::Calculated, "Total"));
/// assert_eq!(classify_name("CustomerID"), (ColumnPrefix::None, "CustomerID"));
/// ```
pub fn classify_name(name: &str) -> (ColumnPrefix, &str) {
    if let Some((token, rest)) = name.split_once('_') {
        for (candidate, prefix) in PREFIX_TOKENS {
            if token.eq_ignore_ascii_case(candidate) {
                return (prefix, rest);
            }
        }
    }
    (ColumnPrefix::None, name)
}

/// Classify a column from its name and extended properties.
///
/// The name-derived classification is applied first, then `ccType` tokens in
/// their fixed rule order, then `ccDNA`. `ccType` therefore always overrides
/// a name-derived prefix.
pub fn classify_column(name: &str, properties: &BTreeMap<String, String>) -> Classification {
    let (prefix, base_name) = classify_name(name);

    let mut classification = Classification {
        prefix,
        base_name: base_name.to_string(),
        is_encrypted: matches!(
            prefix,
            ColumnPrefix::OneWayEncryption | ColumnPrefix::TwoWayEncryption
        ),
        is_read_only: matches!(
            prefix,
            ColumnPrefix::Calculated | ColumnPrefix::BusinessLogic | ColumnPrefix::Aggregate
        ),
        do_not_audit: false,
    };

    if let Some(cc_type) = properties.get("ccType") {
        apply_cc_type(&mut classification, cc_type);
    }

    if properties.get("ccDNA").map(String::as_str) == Some("1") {
        classification.do_not_audit = true;
    }

    classification
}

/// Apply `ccType` tokens through the ordered rule table
fn apply_cc_type(classification: &mut Classification, cc_type: &str) {
    let tokens: Vec<&str> = cc_type.split(',').map(str::trim).collect();

    for (token, prefix, read_only) in CC_TYPE_RULES {
        if tokens.iter().any(|t| t.eq_ignore_ascii_case(token)) {
            classification.prefix = prefix;
            if read_only {
                classification.is_read_only = true;
            }
        }
    }
}
