//! View metadata analysis
//!
//! Lists user views through `INFORMATION_SCHEMA` and classifies them by the
//! naming convention for manually maintained and combo list views.

use tracing::{debug, warn};

use crate::error::SchemaAnalysisError;
use crate::model::{ViewColumn, ViewInfo, ViewKind};
use crate::mssql::rows::{ViewColumnRow, ViewRow};
use crate::mssql::{connect, SqlClient};

const VIEW_LIST_QUERY: &str = "\
SELECT TABLE_SCHEMA, TABLE_NAME
FROM INFORMATION_SCHEMA.VIEWS
WHERE TABLE_SCHEMA NOT IN ('sys', 'INFORMATION_SCHEMA')
ORDER BY TABLE_SCHEMA, TABLE_NAME";

const VIEW_COLUMN_QUERY: &str = "\
SELECT COLUMN_NAME, DATA_TYPE, CHARACTER_MAXIMUM_LENGTH, IS_NULLABLE, ORDINAL_POSITION
FROM INFORMATION_SCHEMA.COLUMNS
WHERE TABLE_SCHEMA = @P1 AND TABLE_NAME = @P2
ORDER BY ORDINAL_POSITION";

/// Lists and classifies the views of a database.
pub struct ViewAnalyzer {
    connection_string: String,
}

impl ViewAnalyzer {
    pub fn new(connection_string: &str) -> Self {
        ViewAnalyzer {
            connection_string: connection_string.to_string(),
        }
    }

    /// Every user view with its columns and convention classification.
    ///
    /// Failures are logged and reported as an empty list.
    pub async fn list_views(&self) -> Vec<ViewInfo> {
        match self.try_list_views().await {
            Ok(views) => views,
            Err(failure) => {
                warn!(error = %failure, "view analysis failed");
                Vec::new()
            }
        }
    }

    async fn try_list_views(&self) -> Result<Vec<ViewInfo>, SchemaAnalysisError> {
        let mut client = connect(&self.connection_string).await?;

        let result_rows = client
            .simple_query(VIEW_LIST_QUERY)
            .await
            .map_err(|source| SchemaAnalysisError::ViewQuery { source })?
            .into_first_result()
            .await
            .map_err(|source| SchemaAnalysisError::ViewQuery { source })?;

        let mut views = Vec::with_capacity(result_rows.len());
        for row in &result_rows {
            let view_row = ViewRow::from_row(row)?;
            let columns = fetch_view_columns(&mut client, &view_row.schema, &view_row.name).await?;
            views.push(ViewInfo {
                kind: classify_view_name(&view_row.name),
                schema: view_row.schema,
                name: view_row.name,
                columns,
            });
        }

        debug!(views = views.len(), "views analyzed");
        Ok(views)
    }
}

async fn fetch_view_columns(
    client: &mut SqlClient,
    schema: &str,
    name: &str,
) -> Result<Vec<ViewColumn>, SchemaAnalysisError> {
    let result_rows = client
        .query(VIEW_COLUMN_QUERY, &[&schema, &name])
        .await
        .map_err(|source| SchemaAnalysisError::ViewQuery { source })?
        .into_first_result()
        .await
        .map_err(|source| SchemaAnalysisError::ViewQuery { source })?;

    let mut columns = Vec::with_capacity(result_rows.len());
    for row in &result_rows {
        let column_row = ViewColumnRow::from_row(row)?;
        columns.push(ViewColumn {
            name: column_row.name,
            sql_type: column_row.sql_type,
            max_length: column_row.max_length,
            is_nullable: column_row.is_nullable.eq_ignore_ascii_case("YES"),
            ordinal: column_row.ordinal,
        });
    }
    Ok(columns)
}

/// Classify a view by its name.
///
/// `mn` prefixed views are manually maintained; `ccvwComboList_` views back
/// combo list lookups. Matching is case-insensitive.
pub fn classify_view_name(name: &str) -> ViewKind {
    let lower = name.to_ascii_lowercase();
    if lower.starts_with("mn") {
        ViewKind::Manual
    } else if lower.starts_with("ccvwcombolist_") {
        ViewKind::ComboList
    } else {
        ViewKind::Other
    }
}
