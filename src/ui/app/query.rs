use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::db::{DataSource, QuerySource};

use super::{App, Mode, StatusType};

impl App {
    pub(super) fn handle_query_key(&mut self, key: KeyEvent, source: &dyn DataSource) {
        match key.code {
            KeyCode::Esc => {
                // Discard the draft; the active query is untouched
                self.mode = Mode::RowBrowse;
                self.query_draft.clear();
            }
            KeyCode::Enter => {
                if !self.query_draft.trim().is_empty() {
                    self.submit_draft(source);
                }
                self.mode = Mode::RowBrowse;
                self.query_draft.clear();
            }
            KeyCode::Backspace => {
                self.query_draft.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.query_draft.push(c);
            }
            _ => {}
        }
    }

    /// Validate the draft through the adapter; only a draft that passes
    /// replaces the default view. A rejected draft changes nothing except
    /// the status message.
    fn submit_draft(&mut self, source: &dyn DataSource) {
        let Some(table) = self.current_table().map(str::to_string) else {
            return;
        };
        let rewritten = with_table_context(&self.query_draft, &table);
        debug!(query = %rewritten, "submitting custom query");

        match source.fetch_columns(&QuerySource::Query(rewritten)) {
            Ok(_) => {
                self.active_query = Some(self.query_draft.clone());
                self.selected_row = 0;
                self.page_offset = 0;
                self.set_status("Query applied".to_string(), StatusType::Success);
                self.load_window(source);
            }
            Err(e) => {
                self.set_status(e.to_string(), StatusType::Error);
            }
        }
    }
}

/// Append `FROM <table>` when the query names no source of its own.
///
/// The check is a literal scan for `"FROM"` or `"from"`, exactly as the
/// browser has always done it; mixed case such as `"From"` matches neither
/// token, so the table gets appended even when a source clause exists. A
/// known limitation, kept instead of parsing SQL.
pub fn with_table_context(query: &str, table: &str) -> String {
    if query.contains("FROM") || query.contains("from") {
        query.to_string()
    } else {
        format!("{} FROM {}", query, table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_table_when_no_from() {
        assert_eq!(
            with_table_context("SELECT id, name", "users"),
            "SELECT id, name FROM users"
        );
    }

    #[test]
    fn test_uppercase_from_passes_verbatim() {
        assert_eq!(
            with_table_context("SELECT * FROM orders", "users"),
            "SELECT * FROM orders"
        );
    }

    #[test]
    fn test_lowercase_from_passes_verbatim() {
        assert_eq!(
            with_table_context("select * from orders", "users"),
            "select * from orders"
        );
    }

    #[test]
    fn test_mixed_case_from_is_mis_detected() {
        // Documented limitation: "From" matches neither literal token, so
        // the table gets appended even though a source clause exists.
        assert_eq!(
            with_table_context("SELECT * From orders", "users"),
            "SELECT * From orders FROM users"
        );
    }
}
