use crate::error::BrowseError;

/// What a window is fetched from: a plain table scan or a raw user query.
#[derive(Debug, Clone, PartialEq)]
pub enum QuerySource {
    Table(String),
    Query(String),
}

/// One page of data plus the total row count behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct PageWindow {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    pub total_rows: usize,
}

impl PageWindow {
    pub fn empty() -> Self {
        Self {
            columns: vec![],
            rows: vec![],
            total_rows: 0,
        }
    }
}

/// A single cell, one variant per SQLite storage class. Blobs keep only
/// their length; the viewer never shows blob content.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(usize),
}

impl CellValue {
    pub fn display(&self) -> String {
        match self {
            CellValue::Null => "NULL".to_string(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Real(f) => f.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Blob(len) => format!("[BLOB {} bytes]", len),
        }
    }

    pub fn display_width(&self) -> usize {
        unicode_width::UnicodeWidthStr::width(self.display().as_str())
    }
}

/// Read-only access to the underlying database.
///
/// The navigation state machine is written against this trait so its
/// transitions can be driven by a stub in tests.
pub trait DataSource {
    /// All table names, fetched once at startup.
    fn list_tables(&self) -> Result<Vec<String>, BrowseError>;

    /// One page of rows plus the total count behind the source.
    fn fetch_window(
        &self,
        source: &QuerySource,
        offset: usize,
        limit: usize,
    ) -> Result<PageWindow, BrowseError>;

    /// Column shape of a source without fetching any rows. Used to validate
    /// a submitted query before it replaces the default view.
    fn fetch_columns(&self, source: &QuerySource) -> Result<Vec<String>, BrowseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_display() {
        assert_eq!(CellValue::Null.display(), "NULL");
    }

    #[test]
    fn test_integer_display() {
        assert_eq!(CellValue::Integer(42).display(), "42");
        assert_eq!(CellValue::Integer(-100).display(), "-100");
    }

    #[test]
    fn test_real_display() {
        assert_eq!(CellValue::Real(3.14).display(), "3.14");
    }

    #[test]
    fn test_text_display() {
        assert_eq!(CellValue::Text("hello".into()).display(), "hello");
    }

    #[test]
    fn test_blob_display() {
        assert_eq!(CellValue::Blob(3).display(), "[BLOB 3 bytes]");
    }

    #[test]
    fn test_display_width() {
        assert_eq!(CellValue::Null.display_width(), 4); // "NULL"
        assert_eq!(CellValue::Text("hello".into()).display_width(), 5);
        assert_eq!(CellValue::Integer(100).display_width(), 3);
    }

    #[test]
    fn test_empty_window() {
        let w = PageWindow::empty();
        assert!(w.columns.is_empty());
        assert!(w.rows.is_empty());
        assert_eq!(w.total_rows, 0);
    }
}
