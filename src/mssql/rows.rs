//! Typed rows for catalog metadata queries.
//!
//! Every query maps its result rows into one of these structs immediately
//! after the data access call, so untyped rows never reach the analyzers.
//! Decode failures carry the query context and column name.

use chrono::NaiveDateTime;
use tiberius::Row;

use crate::error::SchemaAnalysisError;

/// Pull a non-null value out of a row column
pub(crate) fn required<'a, T>(
    row: &'a Row,
    context: &'static str,
    column: &'static str,
) -> Result<T, SchemaAnalysisError>
where
    T: tiberius::FromSql<'a>,
{
    match row.try_get::<T, _>(column) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(SchemaAnalysisError::MissingValue { context, column }),
        Err(source) => Err(SchemaAnalysisError::RowDecode {
            context,
            column,
            source,
        }),
    }
}

/// Pull a nullable value out of a row column
pub(crate) fn optional<'a, T>(
    row: &'a Row,
    context: &'static str,
    column: &'static str,
) -> Result<Option<T>, SchemaAnalysisError>
where
    T: tiberius::FromSql<'a>,
{
    row.try_get::<T, _>(column)
        .map_err(|source| SchemaAnalysisError::RowDecode {
            context,
            column,
            source,
        })
}

/// One row of the column metadata query
#[derive(Debug)]
pub(crate) struct ColumnRow {
    pub column_id: i32,
    pub name: String,
    pub sql_type: String,
    pub max_length: i16,
    pub precision: u8,
    pub scale: u8,
    pub is_nullable: bool,
    pub is_identity: bool,
    pub is_computed: bool,
    pub default_value: Option<String>,
    pub computed_definition: Option<String>,
    pub description: Option<String>,
}

impl ColumnRow {
    const CONTEXT: &'static str = "column metadata";

    pub(crate) fn from_row(row: &Row) -> Result<Self, SchemaAnalysisError> {
        Ok(ColumnRow {
            column_id: required(row, Self::CONTEXT, "column_id")?,
            name: required::<&str>(row, Self::CONTEXT, "ColumnName")?.to_string(),
            sql_type: required::<&str>(row, Self::CONTEXT, "DataType")?.to_string(),
            max_length: required(row, Self::CONTEXT, "max_length")?,
            precision: required(row, Self::CONTEXT, "precision")?,
            scale: required(row, Self::CONTEXT, "scale")?,
            is_nullable: required(row, Self::CONTEXT, "is_nullable")?,
            is_identity: required(row, Self::CONTEXT, "is_identity")?,
            is_computed: required(row, Self::CONTEXT, "is_computed")?,
            default_value: optional::<&str>(row, Self::CONTEXT, "DefaultValue")?
                .map(str::to_string),
            computed_definition: optional::<&str>(row, Self::CONTEXT, "ComputedDefinition")?
                .map(str::to_string),
            description: optional::<&str>(row, Self::CONTEXT, "Description")?.map(str::to_string),
        })
    }
}

/// One row of the per-column extended property query
#[derive(Debug)]
pub(crate) struct ColumnPropertyRow {
    pub column_name: String,
    pub property_name: String,
    pub property_value: Option<String>,
}

impl ColumnPropertyRow {
    const CONTEXT: &'static str = "column property";

    pub(crate) fn from_row(row: &Row) -> Result<Self, SchemaAnalysisError> {
        Ok(ColumnPropertyRow {
            column_name: required::<&str>(row, Self::CONTEXT, "ColumnName")?.to_string(),
            property_name: required::<&str>(row, Self::CONTEXT, "PropertyName")?.to_string(),
            property_value: optional::<&str>(row, Self::CONTEXT, "PropertyValue")?
                .map(str::to_string),
        })
    }
}

/// One row of the table info query
#[derive(Debug)]
pub(crate) struct TableInfoRow {
    pub object_id: i32,
    pub create_date: Option<NaiveDateTime>,
    pub modify_date: Option<NaiveDateTime>,
    pub description: Option<String>,
}

impl TableInfoRow {
    const CONTEXT: &'static str = "table info";

    pub(crate) fn from_row(row: &Row) -> Result<Self, SchemaAnalysisError> {
        Ok(TableInfoRow {
            object_id: required(row, Self::CONTEXT, "object_id")?,
            create_date: optional(row, Self::CONTEXT, "create_date")?,
            modify_date: optional(row, Self::CONTEXT, "modify_date")?,
            description: optional::<&str>(row, Self::CONTEXT, "Description")?.map(str::to_string),
        })
    }
}

/// One row of the index query; `column_names` is a comma-joined list in
/// key-ordinal order
#[derive(Debug)]
pub(crate) struct IndexRow {
    pub name: String,
    pub is_unique: bool,
    pub is_primary_key: bool,
    pub type_desc: String,
    pub column_names: String,
}

impl IndexRow {
    const CONTEXT: &'static str = "index";

    pub(crate) fn from_row(row: &Row) -> Result<Self, SchemaAnalysisError> {
        Ok(IndexRow {
            name: required::<&str>(row, Self::CONTEXT, "IndexName")?.to_string(),
            is_unique: required(row, Self::CONTEXT, "is_unique")?,
            is_primary_key: required(row, Self::CONTEXT, "is_primary_key")?,
            type_desc: required::<&str>(row, Self::CONTEXT, "TypeDescription")?.to_string(),
            column_names: required::<&str>(row, Self::CONTEXT, "ColumnNames")?.to_string(),
        })
    }
}

/// One row of the table-level extended property query
#[derive(Debug)]
pub(crate) struct PropertyRow {
    pub name: String,
    pub value: Option<String>,
}

impl PropertyRow {
    const CONTEXT: &'static str = "table property";

    pub(crate) fn from_row(row: &Row) -> Result<Self, SchemaAnalysisError> {
        Ok(PropertyRow {
            name: required::<&str>(row, Self::CONTEXT, "PropertyName")?.to_string(),
            value: optional::<&str>(row, Self::CONTEXT, "PropertyValue")?.map(str::to_string),
        })
    }
}

/// One row of the foreign key constraint query
#[derive(Debug)]
pub(crate) struct ForeignKeyRow {
    pub constraint_name: String,
    pub parent_table: String,
    pub referenced_table: String,
    pub parent_column: String,
    pub referenced_column: String,
    pub delete_action: String,
    pub update_action: String,
    pub is_disabled: bool,
}

impl ForeignKeyRow {
    const CONTEXT: &'static str = "foreign key";

    pub(crate) fn from_row(row: &Row) -> Result<Self, SchemaAnalysisError> {
        Ok(ForeignKeyRow {
            constraint_name: required::<&str>(row, Self::CONTEXT, "ConstraintName")?.to_string(),
            parent_table: required::<&str>(row, Self::CONTEXT, "ParentTable")?.to_string(),
            referenced_table: required::<&str>(row, Self::CONTEXT, "ReferencedTable")?.to_string(),
            parent_column: required::<&str>(row, Self::CONTEXT, "ParentColumn")?.to_string(),
            referenced_column: required::<&str>(row, Self::CONTEXT, "ReferencedColumn")?
                .to_string(),
            delete_action: required::<&str>(row, Self::CONTEXT, "DeleteAction")?.to_string(),
            update_action: required::<&str>(row, Self::CONTEXT, "UpdateAction")?.to_string(),
            is_disabled: required(row, Self::CONTEXT, "is_disabled")?,
        })
    }
}

/// One row of the enumeration value query
#[derive(Debug)]
pub(crate) struct EnumRow {
    pub enum_type: String,
    pub value: i32,
    pub text: String,
    pub text_normalized: String,
    pub ordinal: i32,
}

impl EnumRow {
    const CONTEXT: &'static str = "enumeration";

    pub(crate) fn from_row(row: &Row) -> Result<Self, SchemaAnalysisError> {
        Ok(EnumRow {
            enum_type: required::<&str>(row, Self::CONTEXT, "EnumType")?.to_string(),
            value: required(row, Self::CONTEXT, "EnumValue")?,
            text: required::<&str>(row, Self::CONTEXT, "EnumText")?.to_string(),
            text_normalized: required::<&str>(row, Self::CONTEXT, "EnumTextNS")?.to_string(),
            ordinal: required(row, Self::CONTEXT, "OrderNum")?,
        })
    }
}

/// One row of the view listing query
#[derive(Debug)]
pub(crate) struct ViewRow {
    pub schema: String,
    pub name: String,
}

impl ViewRow {
    const CONTEXT: &'static str = "view list";

    pub(crate) fn from_row(row: &Row) -> Result<Self, SchemaAnalysisError> {
        Ok(ViewRow {
            schema: required::<&str>(row, Self::CONTEXT, "TABLE_SCHEMA")?.to_string(),
            name: required::<&str>(row, Self::CONTEXT, "TABLE_NAME")?.to_string(),
        })
    }
}

/// One row of the view column query
#[derive(Debug)]
pub(crate) struct ViewColumnRow {
    pub name: String,
    pub sql_type: String,
    pub max_length: Option<i32>,
    pub is_nullable: String,
    pub ordinal: i32,
}

impl ViewColumnRow {
    const CONTEXT: &'static str = "view column";

    pub(crate) fn from_row(row: &Row) -> Result<Self, SchemaAnalysisError> {
        Ok(ViewColumnRow {
            name: required::<&str>(row, Self::CONTEXT, "COLUMN_NAME")?.to_string(),
            sql_type: required::<&str>(row, Self::CONTEXT, "DATA_TYPE")?.to_string(),
            max_length: optional(row, Self::CONTEXT, "CHARACTER_MAXIMUM_LENGTH")?,
            is_nullable: required::<&str>(row, Self::CONTEXT, "IS_NULLABLE")?.to_string(),
            ordinal: required(row, Self::CONTEXT, "ORDINAL_POSITION")?,
        })
    }
}
