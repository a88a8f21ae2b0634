use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use tracing::debug;

use crate::error::BrowseError;

use super::{CellValue, DataSource, PageWindow, QuerySource};

/// SQLite-backed data source holding one long-lived read-only connection.
/// The browser is strictly single-threaded, so nothing else ever touches it.
pub struct SqliteSource {
    conn: Connection,
}

impl SqliteSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BrowseError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(BrowseError::startup)?;
        Ok(Self { conn })
    }

    fn run_window(&self, sql: &str, columns: Vec<String>) -> Result<Vec<Vec<CellValue>>, BrowseError> {
        let mut stmt = self.conn.prepare(sql).map_err(BrowseError::fetch)?;
        let ncols = columns.len();
        let mapped = stmt
            .query_map([], |row| {
                let mut values = Vec::with_capacity(ncols);
                for i in 0..ncols {
                    let value: rusqlite::types::Value = row.get(i)?;
                    values.push(cell_from_value(value));
                }
                Ok(values)
            })
            .map_err(BrowseError::fetch)?;

        let mut rows = Vec::new();
        for row in mapped {
            rows.push(row.map_err(BrowseError::fetch)?);
        }
        Ok(rows)
    }

    fn column_names(&self, sql: &str) -> Result<Vec<String>, BrowseError> {
        let stmt = self.conn.prepare(sql).map_err(BrowseError::fetch)?;
        Ok(stmt.column_names().iter().map(|s| s.to_string()).collect())
    }
}

impl DataSource for SqliteSource {
    fn list_tables(&self) -> Result<Vec<String>, BrowseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT name FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            )
            .map_err(BrowseError::startup)?;

        let mapped = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(BrowseError::startup)?;

        let mut tables = Vec::new();
        for name in mapped {
            tables.push(name.map_err(BrowseError::startup)?);
        }
        Ok(tables)
    }

    fn fetch_window(
        &self,
        source: &QuerySource,
        offset: usize,
        limit: usize,
    ) -> Result<PageWindow, BrowseError> {
        match source {
            QuerySource::Table(table) => {
                let ident = quote_ident(table);
                let sql = format!("SELECT * FROM {} LIMIT {} OFFSET {}", ident, limit, offset);
                debug!(table = %table, offset, limit, "fetching table window");

                let columns = self.column_names(&sql)?;
                let rows = self.run_window(&sql, columns.clone())?;
                let total_rows: i64 = self
                    .conn
                    .query_row(&format!("SELECT COUNT(*) FROM {}", ident), [], |row| {
                        row.get(0)
                    })
                    .map_err(BrowseError::fetch)?;

                Ok(PageWindow {
                    columns,
                    rows,
                    total_rows: total_rows as usize,
                })
            }
            QuerySource::Query(query) => {
                let query = query.trim();
                let sql = format!("{} LIMIT {} OFFSET {}", query, limit, offset);
                debug!(offset, limit, "fetching query window");

                let columns = self.column_names(&sql)?;
                let rows = self.run_window(&sql, columns.clone())?;

                // COUNT(*) over the wrapped query; when that fails (e.g. a
                // query SQLite refuses to nest) fall back to an estimate
                // from the window itself.
                let count_sql = format!("SELECT COUNT(*) FROM ({})", query);
                let total_rows = match self
                    .conn
                    .query_row(&count_sql, [], |row| row.get::<_, i64>(0))
                {
                    Ok(count) => count as usize,
                    Err(_) => offset + rows.len() + if rows.len() == limit { limit } else { 0 },
                };

                Ok(PageWindow {
                    columns,
                    rows,
                    total_rows,
                })
            }
        }
    }

    fn fetch_columns(&self, source: &QuerySource) -> Result<Vec<String>, BrowseError> {
        let sql = match source {
            QuerySource::Table(table) => format!("SELECT * FROM {}", quote_ident(table)),
            QuerySource::Query(query) => query.trim().to_string(),
        };
        // Preparing is enough to learn the shape; it also surfaces syntax
        // errors and missing tables without reading a single row.
        self.conn
            .prepare(&sql)
            .map(|stmt| stmt.column_names().iter().map(|s| s.to_string()).collect())
            .map_err(BrowseError::query)
    }
}

fn cell_from_value(value: rusqlite::types::Value) -> CellValue {
    match value {
        rusqlite::types::Value::Null => CellValue::Null,
        rusqlite::types::Value::Integer(i) => CellValue::Integer(i),
        rusqlite::types::Value::Real(f) => CellValue::Real(f),
        rusqlite::types::Value::Text(s) => CellValue::Text(s),
        rusqlite::types::Value::Blob(b) => CellValue::Blob(b.len()),
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(rows: usize) -> SqliteSource {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, score REAL);
             CREATE TABLE zz_empty (id INTEGER PRIMARY KEY, note TEXT);",
        )
        .unwrap();
        for i in 0..rows {
            conn.execute(
                "INSERT INTO users (name, score) VALUES (?1, ?2)",
                rusqlite::params![format!("user{}", i), i as f64 / 2.0],
            )
            .unwrap();
        }
        SqliteSource { conn }
    }

    #[test]
    fn test_list_tables_sorted() {
        let src = fixture(3);
        assert_eq!(src.list_tables().unwrap(), vec!["users", "zz_empty"]);
    }

    #[test]
    fn test_table_window_first_page() {
        let src = fixture(30);
        let w = src
            .fetch_window(&QuerySource::Table("users".into()), 0, 25)
            .unwrap();
        assert_eq!(w.columns, vec!["id", "name", "score"]);
        assert_eq!(w.rows.len(), 25);
        assert_eq!(w.total_rows, 30);
        assert_eq!(w.rows[0][1], CellValue::Text("user0".into()));
    }

    #[test]
    fn test_table_window_last_page() {
        let src = fixture(30);
        let w = src
            .fetch_window(&QuerySource::Table("users".into()), 25, 25)
            .unwrap();
        assert_eq!(w.rows.len(), 5);
        assert_eq!(w.total_rows, 30);
    }

    #[test]
    fn test_empty_table_window() {
        let src = fixture(0);
        let w = src
            .fetch_window(&QuerySource::Table("zz_empty".into()), 0, 25)
            .unwrap();
        assert_eq!(w.columns, vec!["id", "note"]);
        assert!(w.rows.is_empty());
        assert_eq!(w.total_rows, 0);
    }

    #[test]
    fn test_query_window_counts_behind_pagination() {
        let src = fixture(30);
        let w = src
            .fetch_window(
                &QuerySource::Query("SELECT name FROM users WHERE id <= 28".into()),
                0,
                25,
            )
            .unwrap();
        assert_eq!(w.columns, vec!["name"]);
        assert_eq!(w.rows.len(), 25);
        assert_eq!(w.total_rows, 28);
    }

    #[test]
    fn test_missing_table_is_fetch_error() {
        let src = fixture(1);
        let err = src
            .fetch_window(&QuerySource::Table("nope".into()), 0, 25)
            .unwrap_err();
        assert!(matches!(err, BrowseError::Fetch(_)));
    }

    #[test]
    fn test_fetch_columns_without_rows() {
        let src = fixture(0);
        let cols = src
            .fetch_columns(&QuerySource::Query("SELECT id, name FROM users".into()))
            .unwrap();
        assert_eq!(cols, vec!["id", "name"]);
    }

    #[test]
    fn test_fetch_columns_rejects_bad_sql() {
        let src = fixture(1);
        let err = src
            .fetch_columns(&QuerySource::Query("SELEC * FROM users".into()))
            .unwrap_err();
        assert!(matches!(err, BrowseError::Query(_)));
    }

    #[test]
    fn test_cell_values_cover_storage_classes() {
        let src = fixture(0);
        src.conn
            .execute_batch("CREATE TABLE misc (a); INSERT INTO misc VALUES (NULL), (7), (1.5), ('x'), (x'010203');")
            .unwrap();
        let w = src
            .fetch_window(&QuerySource::Table("misc".into()), 0, 25)
            .unwrap();
        assert_eq!(w.rows[0][0], CellValue::Null);
        assert_eq!(w.rows[1][0], CellValue::Integer(7));
        assert_eq!(w.rows[2][0], CellValue::Real(1.5));
        assert_eq!(w.rows[3][0], CellValue::Text("x".into()));
        assert_eq!(w.rows[4][0], CellValue::Blob(3));
    }

    #[test]
    fn test_quoted_identifier() {
        let src = fixture(0);
        src.conn
            .execute_batch("CREATE TABLE \"odd name\" (v TEXT); INSERT INTO \"odd name\" VALUES ('ok');")
            .unwrap();
        let w = src
            .fetch_window(&QuerySource::Table("odd name".into()), 0, 25)
            .unwrap();
        assert_eq!(w.total_rows, 1);
    }
}
