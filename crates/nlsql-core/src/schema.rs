//! Database schema introspection
//!
//! Reads table and column metadata from a SQLite database and renders it as
//! the compact one-line-per-table description the prompt builder embeds.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::error::PipelineError;

/// One column of a user table.
#[derive(Debug, Clone)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
    pub primary_key: bool,
}

/// One user table, columns in the engine's natural order.
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
}

/// Snapshot of all user tables in a database.
///
/// Built fresh per request and discarded once the prompt is assembled;
/// nothing here is cached across requests.
#[derive(Debug, Clone)]
pub struct DbSchema {
    pub tables: Vec<TableSchema>,
}

impl DbSchema {
    /// Introspect the database at `path`.
    ///
    /// Opens a short-lived read-only connection, enumerates user tables from
    /// `sqlite_master` (internal `sqlite_*` tables excluded) and their columns
    /// via `PRAGMA table_info`. The connection is closed before returning.
    pub fn introspect<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PipelineError::NotFound(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(PipelineError::Connection)?;

        let tables = Self::read_tables(&conn).map_err(PipelineError::Connection)?;
        Ok(DbSchema { tables })
    }

    fn read_tables(conn: &Connection) -> Result<Vec<TableSchema>, rusqlite::Error> {
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        )?;
        let names: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<_, _>>()?;

        let mut tables = Vec::with_capacity(names.len());
        for name in names {
            let columns = Self::read_columns(conn, &name)?;
            tables.push(TableSchema { name, columns });
        }
        Ok(tables)
    }

    fn read_columns(conn: &Connection, table: &str) -> Result<Vec<ColumnSchema>, rusqlite::Error> {
        // PRAGMA table_info yields (cid, name, type, notnull, dflt_value, pk)
        // in column order. Identifier quoting: double every embedded quote.
        let pragma = format!("PRAGMA table_info(\"{}\")", table.replace('"', "\"\""));
        let mut stmt = conn.prepare(&pragma)?;
        let columns = stmt
            .query_map([], |row| {
                Ok(ColumnSchema {
                    name: row.get(1)?,
                    data_type: row.get(2)?,
                    primary_key: row.get::<_, i64>(5)? > 0,
                })
            })?
            .collect::<Result<_, _>>()?;
        Ok(columns)
    }

    /// Render as `TABLE <name>: <col> <TYPE>[ PRIMARY KEY], ...`, one line
    /// per table.
    pub fn render(&self) -> String {
        let lines: Vec<String> = self
            .tables
            .iter()
            .map(|table| {
                let cols: Vec<String> = table
                    .columns
                    .iter()
                    .map(|col| {
                        let mut desc = format!("{} {}", col.name, col.data_type);
                        if col.primary_key {
                            desc.push_str(" PRIMARY KEY");
                        }
                        desc
                    })
                    .collect();
                format!("TABLE {}: {}", table.name, cols.join(", "))
            })
            .collect();
        lines.join("\n")
    }
}
