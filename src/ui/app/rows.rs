use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

use crate::db::{DataSource, QuerySource};
use crate::export;
use crate::pager::PAGE_SIZE;
use crate::ui::app::with_table_context;

use super::{App, ExportFormat, Mode, StatusType, EXPORT_FORMATS};

impl App {
    pub(super) fn handle_row_key(&mut self, key: KeyEvent, source: &dyn DataSource) {
        match key.code {
            KeyCode::Up => {
                if self.selected_row > 0 {
                    self.selected_row -= 1;
                } else if self.page_offset > 0 {
                    // Scroll up across the page boundary: land on the last
                    // row of the previous page, then re-clamp against the
                    // freshly fetched window (it may hold fewer rows).
                    self.page_offset = self.page_offset.saturating_sub(PAGE_SIZE);
                    self.selected_row = PAGE_SIZE - 1;
                    self.load_window(source);
                    if let Some(window) = &self.window {
                        if self.selected_row >= window.rows.len() {
                            self.selected_row = window.rows.len().saturating_sub(1);
                        }
                    }
                }
            }
            KeyCode::Down => {
                if let Some(window) = &self.window {
                    if self.selected_row + 1 < window.rows.len() {
                        self.selected_row += 1;
                    } else if self.page_offset + window.rows.len() < window.total_rows {
                        self.page_offset += PAGE_SIZE;
                        self.selected_row = 0;
                        self.load_window(source);
                    }
                }
            }
            KeyCode::PageUp => {
                if self.page_offset > 0 {
                    self.page_offset = self.page_offset.saturating_sub(PAGE_SIZE);
                    self.selected_row = 0;
                    self.load_window(source);
                }
            }
            KeyCode::PageDown => {
                if let Some(window) = &self.window {
                    if self.page_offset + window.rows.len() < window.total_rows {
                        self.page_offset = (self.page_offset + PAGE_SIZE)
                            .min(window.total_rows.saturating_sub(PAGE_SIZE));
                        self.selected_row = 0;
                        self.load_window(source);
                    }
                }
            }
            KeyCode::Home => {
                self.page_offset = 0;
                self.selected_row = 0;
                self.load_window(source);
            }
            KeyCode::End => {
                if let Some(window) = &self.window {
                    self.page_offset = window.total_rows.saturating_sub(PAGE_SIZE);
                    self.selected_row = 0;
                    self.load_window(source);
                }
            }
            KeyCode::Left => {
                self.mode = Mode::TableSelect;
                self.reset_view();
                self.load_window(source);
            }
            KeyCode::Char('i') => {
                self.mode = Mode::QueryEdit;
                self.query_draft.clear();
            }
            KeyCode::Enter | KeyCode::Char('r') => {
                // Refresh: back to the first page, active query kept
                self.selected_row = 0;
                self.page_offset = 0;
                self.load_window(source);
            }
            KeyCode::Char('e') => {
                if self.window.is_some() {
                    self.export_picker = Some(0);
                }
            }
            KeyCode::Char('h') => {
                self.show_help = true;
            }
            KeyCode::Esc => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    pub(super) fn handle_export_key(&mut self, key: KeyEvent, source: &dyn DataSource) {
        let Some(selected) = self.export_picker else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.export_picker = None;
            }
            KeyCode::Up => {
                if selected > 0 {
                    self.export_picker = Some(selected - 1);
                }
            }
            KeyCode::Down => {
                if selected + 1 < EXPORT_FORMATS.len() {
                    self.export_picker = Some(selected + 1);
                }
            }
            KeyCode::Enter => {
                self.export_picker = None;
                self.perform_export(EXPORT_FORMATS[selected], source);
            }
            KeyCode::Char(c @ '1'..='3') => {
                let idx = (c as usize) - ('1' as usize);
                if idx < EXPORT_FORMATS.len() {
                    self.export_picker = None;
                    self.perform_export(EXPORT_FORMATS[idx], source);
                }
            }
            _ => {}
        }
    }

    /// Export the full current table or active query, not just the window.
    fn perform_export(&mut self, format: ExportFormat, source: &dyn DataSource) {
        let Some(total) = self.window.as_ref().map(|w| w.total_rows) else {
            return;
        };
        let Some(table) = self.current_table().map(str::to_string) else {
            return;
        };

        let query_source = match &self.active_query {
            Some(q) => QuerySource::Query(with_table_context(q, &table)),
            None => QuerySource::Table(table.clone()),
        };

        let full = match source.fetch_window(&query_source, 0, total.max(1)) {
            Ok(window) => window,
            Err(e) => {
                self.set_status(format!("Export failed: {}", e), StatusType::Error);
                return;
            }
        };

        let content = match format {
            ExportFormat::Csv => export::to_csv(&full),
            ExportFormat::Json => export::to_json(&full),
            ExportFormat::Tsv => export::to_tsv(&full),
        };

        let stem = if self.active_query.is_some() {
            "query"
        } else {
            table.as_str()
        };
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let filename = format!("sqlview_{}_{}.{}", stem, timestamp, format.extension());

        match std::fs::write(&filename, &content) {
            Ok(()) => {
                debug!(rows = full.rows.len(), file = %filename, "exported");
                self.set_status(
                    format!("Exported {} rows to {}", full.rows.len(), filename),
                    StatusType::Success,
                );
            }
            Err(e) => {
                self.set_status(format!("Export failed: {}", e), StatusType::Error);
            }
        }
    }
}
