//! Builds the single SQL statement a fetch runs against the warehouse.

use crate::config::SourceConfig;
use crate::types::columns::{ColumnOrigin, MEASUREMENT_COLUMNS, UPLOAD_LOCAL_DATE_TIME};
use crate::types::request::FetchRequest;

const DATE_PREFIX_LEN: usize = 10;

/// Quotes `value` as a SQL string literal.
fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn date_prefix_expr() -> String {
    format!("LEFT({}, {})", UPLOAD_LOCAL_DATE_TIME, DATE_PREFIX_LEN)
}

/// Builds the query for `request` against the `OPENROWSET` source in `source`.
///
/// The statement selects the measurement columns in output order, keeps rows of
/// the requested account whose upload date falls inside the range (both ends
/// inclusive) and orders them by upload time.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use countprod::{build_query, FetchRequest, SourceConfig};
///
/// let request = FetchRequest::new(
///     76,
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
/// )?;
/// let sql = build_query(&SourceConfig::default(), &request);
/// assert!(sql.contains("AccountId = 76"));
/// assert!(sql.contains(">= '2024-01-01'"));
/// assert!(sql.contains("<= '2024-01-02'"));
/// # Ok::<(), countprod::CountProdError>(())
/// ```
pub fn build_query(source: &SourceConfig, request: &FetchRequest) -> String {
    let date_prefix = date_prefix_expr();

    let projection: Vec<String> = MEASUREMENT_COLUMNS
        .iter()
        .map(|def| match def.origin {
            ColumnOrigin::DatePrefix => format!("{} AS {}", date_prefix, def.name),
            ColumnOrigin::Document { .. } => def.name.to_string(),
        })
        .collect();

    let with_clause: Vec<String> = MEASUREMENT_COLUMNS
        .iter()
        .filter_map(|def| match def.origin {
            ColumnOrigin::Document { sql_type, path } => Some(format!(
                "{:<24}{:<12}{}",
                def.name,
                sql_type,
                sql_literal(path)
            )),
            ColumnOrigin::DatePrefix => None,
        })
        .collect();

    let mut sql = format!(
        "SELECT\n    {}\nFROM OPENROWSET(\n    PROVIDER = {},\n    CONNECTION = {},\n    OBJECT = {},\n    SERVER_CREDENTIAL = {}\n) WITH (\n    {}\n) AS meas\n",
        projection.join(",\n    "),
        sql_literal(&source.provider),
        sql_literal(&source.connection),
        sql_literal(&source.object),
        sql_literal(&source.server_credential),
        with_clause.join(",\n    "),
    );
    sql.push_str(&format!(
        "WHERE AccountId = {}\n    AND {} >= {}\n    AND {} <= {}\nORDER BY {} ASC;",
        request.account_id.get(),
        date_prefix,
        sql_literal(&request.range.start().format("%Y-%m-%d").to_string()),
        date_prefix,
        sql_literal(&request.range.end().format("%Y-%m-%d").to_string()),
        UPLOAD_LOCAL_DATE_TIME,
    ));
    sql
}
