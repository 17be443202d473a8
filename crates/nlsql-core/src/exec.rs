//! Statement execution against SQLite

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::PipelineError;

/// Materialized result of one statement execution.
///
/// `columns` comes from the statement's descriptor and is empty for
/// statements that produce no result columns. Rows hold cells in column
/// order, so the pairing survives serialization.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub row_count: usize,
}

impl QueryResult {
    /// Rows as column-name-to-value mappings, preserving column order.
    pub fn rows_as_objects(&self) -> Vec<serde_json::Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }
}

/// Execute `sql` against the database at `path`, single attempt.
///
/// The connection lives only for this call. Open failures are `Connection`
/// errors; anything the engine rejects at prepare or step time becomes a
/// `Query` error carrying the offending statement for diagnosis.
pub fn execute<P: AsRef<Path>>(path: P, sql: &str) -> Result<QueryResult, PipelineError> {
    let conn = Connection::open(path.as_ref()).map_err(PipelineError::Connection)?;
    execute_on(&conn, sql)
}

fn execute_on(conn: &Connection, sql: &str) -> Result<QueryResult, PipelineError> {
    let mut stmt = conn.prepare(sql).map_err(|e| PipelineError::Query {
        sql: sql.to_string(),
        source: e,
    })?;

    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let column_count = columns.len();

    let mut result_rows = Vec::new();
    let mut rows = stmt.query([]).map_err(|e| PipelineError::Query {
        sql: sql.to_string(),
        source: e,
    })?;
    loop {
        let row = match rows.next() {
            Ok(Some(row)) => row,
            Ok(None) => break,
            Err(e) => {
                return Err(PipelineError::Query {
                    sql: sql.to_string(),
                    source: e,
                })
            }
        };

        let mut cells = Vec::with_capacity(column_count);
        for i in 0..column_count {
            let value = row.get_ref(i).map_err(|e| PipelineError::Query {
                sql: sql.to_string(),
                source: e,
            })?;
            cells.push(value_to_json(value));
        }
        result_rows.push(cells);
    }

    let row_count = result_rows.len();
    Ok(QueryResult {
        columns,
        rows: result_rows,
        row_count,
    })
}

fn value_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => json!(i),
        ValueRef::Real(f) => json!(f),
        ValueRef::Text(s) => Value::String(String::from_utf8_lossy(s).to_string()),
        ValueRef::Blob(b) => Value::String(format!("<blob {} bytes>", b.len())),
    }
}
