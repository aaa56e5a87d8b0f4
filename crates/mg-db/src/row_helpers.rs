//! Helpers for reading DuckDB row columns as strings.

use crate::error::DbResult;
use crate::traits::Row;

/// Read a column value as a String, trying multiple DuckDB types.
///
/// DuckDB integer columns return `None` for `Option<String>`, so we try
/// String -> i64 -> f64 -> bool, falling back to `"null"`.
pub(crate) fn column_as_string(row: &duckdb::Row<'_>, idx: usize) -> String {
    if let Ok(Some(s)) = row.get::<_, Option<String>>(idx) {
        return s;
    }
    if let Ok(Some(n)) = row.get::<_, Option<i64>>(idx) {
        return n.to_string();
    }
    if let Ok(Some(f)) = row.get::<_, Option<f64>>(idx) {
        return f.to_string();
    }
    if let Ok(Some(b)) = row.get::<_, Option<bool>>(idx) {
        return b.to_string();
    }
    "null".to_string()
}

/// Run `sql` and collect every row.
pub(crate) fn collect_rows(conn: &duckdb::Connection, sql: &str) -> DbResult<Vec<Row>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| {
            let col_count = row.as_ref().column_count();
            Ok((0..col_count).map(|i| column_as_string(row, i)).collect())
        })?
        .collect::<Result<Vec<Row>, _>>()?;
    Ok(rows)
}
