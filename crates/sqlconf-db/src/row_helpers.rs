//! Shared helpers for reading DuckDB rows as strings.

use crate::error::{DbError, DbResult};
use crate::traits::RowSet;
use duckdb::types::ValueRef;

/// Read a column value as text, keeping SQL NULL distinct.
///
/// Text and NULL are read directly; other types fall back through
/// i64 -> f64 -> bool.
pub(crate) fn get_column_as_string(row: &duckdb::Row<'_>, idx: usize) -> Option<String> {
    match row.get_ref(idx) {
        Ok(ValueRef::Null) => return None,
        Ok(ValueRef::Text(bytes)) => return Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => {}
    }
    if let Ok(Some(n)) = row.get::<_, Option<i64>>(idx) {
        return Some(n.to_string());
    }
    if let Ok(Some(f)) = row.get::<_, Option<f64>>(idx) {
        return Some(f.to_string());
    }
    if let Ok(Some(b)) = row.get::<_, Option<bool>>(idx) {
        return Some(b.to_string());
    }
    if let Ok(Some(s)) = row.get::<_, Option<String>>(idx) {
        return Some(s);
    }
    log::warn!("column {} has a type that cannot be read as text; treating as NULL", idx);
    None
}

/// Execute a prepared statement and collect all results as strings.
///
/// DuckDB panics on `stmt.column_count()` before execution, so we collect
/// all rows via `query_map` first, then read column metadata.
pub(crate) fn execute_and_collect(stmt: &mut duckdb::Statement<'_>) -> DbResult<RowSet> {
    let rows: Vec<Vec<Option<String>>> = stmt
        .query_map([], |row| {
            let col_count = row.as_ref().column_count();
            Ok((0..col_count)
                .map(|i| get_column_as_string(row, i))
                .collect())
        })
        .map_err(|e| DbError::ExecutionError(format!("query failed: {e}")))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| DbError::ExecutionError(format!("row error: {e}")))?;

    Ok(RowSet::new(stmt.column_count(), rows))
}
