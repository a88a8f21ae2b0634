use crate::db::{CellValue, PageWindow};

pub fn to_csv(window: &PageWindow) -> String {
    let mut output = String::new();

    // Header
    let headers: Vec<String> = window.columns.iter().map(|c| csv_escape(c)).collect();
    output.push_str(&headers.join(","));
    output.push('\n');

    // Rows
    for row in &window.rows {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| csv_escape(&cell_to_csv(cell)))
            .collect();
        output.push_str(&cells.join(","));
        output.push('\n');
    }

    output
}

pub fn to_json(window: &PageWindow) -> String {
    let mut rows_json: Vec<serde_json::Value> = Vec::new();

    for row in &window.rows {
        let mut obj = serde_json::Map::new();
        for (i, cell) in row.iter().enumerate() {
            let col_name = window
                .columns
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("column_{}", i));
            obj.insert(col_name, cell_to_json(cell));
        }
        rows_json.push(serde_json::Value::Object(obj));
    }

    serde_json::to_string_pretty(&rows_json).unwrap_or_else(|_| "[]".to_string())
}

pub fn to_tsv(window: &PageWindow) -> String {
    let mut output = String::new();

    // Header
    let headers: Vec<&str> = window.columns.iter().map(|c| c.as_str()).collect();
    output.push_str(&headers.join("\t"));
    output.push('\n');

    // Rows
    for row in &window.rows {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| cell_to_csv(cell).replace('\t', " "))
            .collect();
        output.push_str(&cells.join("\t"));
        output.push('\n');
    }

    output
}

fn cell_to_csv(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => String::new(),
        other => other.display(),
    }
}

fn cell_to_json(cell: &CellValue) -> serde_json::Value {
    match cell {
        CellValue::Null => serde_json::Value::Null,
        CellValue::Integer(i) => serde_json::json!(*i),
        CellValue::Real(f) => serde_json::json!(*f),
        CellValue::Text(s) => serde_json::Value::String(s.clone()),
        CellValue::Blob(len) => serde_json::Value::String(format!("[BLOB {} bytes]", len)),
    }
}

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_window() -> PageWindow {
        PageWindow {
            columns: vec!["id".to_string(), "name".to_string(), "score".to_string()],
            rows: vec![
                vec![
                    CellValue::Integer(1),
                    CellValue::Text("Alice".to_string()),
                    CellValue::Real(4.5),
                ],
                vec![
                    CellValue::Integer(2),
                    CellValue::Text("Bob".to_string()),
                    CellValue::Null,
                ],
            ],
            total_rows: 2,
        }
    }

    #[test]
    fn test_csv_export() {
        let csv = to_csv(&make_window());
        assert!(csv.starts_with("id,name,score\n"));
        assert!(csv.contains("1,Alice,4.5\n"));
        assert!(csv.contains("2,Bob,\n"));
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(csv_escape("hello"), "hello");
        assert_eq!(csv_escape("hello,world"), "\"hello,world\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_json_export() {
        let json = to_json(&make_window());
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["id"], 1);
        assert_eq!(parsed[0]["name"], "Alice");
        assert_eq!(parsed[0]["score"], 4.5);
        assert!(parsed[1]["score"].is_null());
    }

    #[test]
    fn test_tsv_export() {
        let tsv = to_tsv(&make_window());
        assert!(tsv.starts_with("id\tname\tscore\n"));
        assert!(tsv.contains("1\tAlice\t4.5\n"));
    }

    #[test]
    fn test_blob_as_json_string() {
        let json = cell_to_json(&CellValue::Blob(8));
        assert_eq!(json, serde_json::json!("[BLOB 8 bytes]"));
    }

    #[test]
    fn test_empty_window_has_header_only() {
        let w = PageWindow {
            columns: vec!["a".to_string()],
            rows: vec![],
            total_rows: 0,
        };
        assert_eq!(to_csv(&w), "a\n");
    }
}
