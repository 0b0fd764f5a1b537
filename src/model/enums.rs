//! Enumeration values loaded from the `c_Enumeration` convention table

use serde::{Deserialize, Serialize};

/// One enumeration value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumRecord {
    pub enum_type: String,
    pub value: i32,
    /// Display text
    pub text: String,
    /// Display text with spaces, dashes and apostrophes removed
    pub text_normalized: String,
    pub ordinal: i32,
}
