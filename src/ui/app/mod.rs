mod query;
mod rows;
mod tables;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::db::{DataSource, PageWindow, QuerySource};
use crate::error::BrowseError;
use crate::pager::{clamp_offset, PAGE_SIZE};
use crate::ui::Theme;

pub use query::with_table_context;

/// Mutually exclusive interaction contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    TableSelect,
    RowBrowse,
    QueryEdit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusType {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Tsv,
}

pub const EXPORT_FORMATS: &[ExportFormat] =
    &[ExportFormat::Csv, ExportFormat::Json, ExportFormat::Tsv];

impl ExportFormat {
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV (.csv)",
            ExportFormat::Json => "JSON (.json)",
            ExportFormat::Tsv => "TSV (.tsv)",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Tsv => "tsv",
        }
    }
}

/// The whole session: table list, navigation cursor, active query, and the
/// cached page window. Mutated exclusively by the key handlers below, one
/// event at a time.
pub struct App {
    pub theme: Theme,
    pub db_name: String,
    pub should_quit: bool,

    // Navigation state
    pub tables: Vec<String>,
    pub selected_table: usize,
    pub mode: Mode,
    pub selected_row: usize,
    pub page_offset: usize,
    pub active_query: Option<String>,
    pub query_draft: String,

    // Last committed window, refreshed by the handlers (never by the renderer)
    pub window: Option<PageWindow>,
    pub fetch_error: Option<String>,

    // Transient UI
    pub status: Option<(String, StatusType)>,
    pub show_help: bool,
    pub export_picker: Option<usize>,
}

impl App {
    pub fn new(db_name: String, tables: Vec<String>) -> Self {
        Self {
            theme: Theme::dark(),
            db_name,
            should_quit: false,

            tables,
            selected_table: 0,
            mode: Mode::TableSelect,
            selected_row: 0,
            page_offset: 0,
            active_query: None,
            query_draft: String::new(),

            window: None,
            fetch_error: None,

            status: None,
            show_help: false,
            export_picker: None,
        }
    }

    pub fn current_table(&self) -> Option<&str> {
        self.tables.get(self.selected_table).map(|s| s.as_str())
    }

    /// Advance the session by one key event. Fetch and query failures are
    /// absorbed here; nothing propagates back into the event loop.
    pub fn handle_key(&mut self, key: KeyEvent, source: &dyn DataSource) {
        // Interrupt quits from any mode
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            self.handle_help_key(key);
            return;
        }
        if self.export_picker.is_some() {
            self.handle_export_key(key, source);
            return;
        }

        match self.mode {
            Mode::TableSelect => self.handle_table_key(key, source),
            Mode::RowBrowse => self.handle_row_key(key, source),
            Mode::QueryEdit => self.handle_query_key(key, source),
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('q')
        ) {
            self.show_help = false;
        }
    }

    pub(crate) fn set_status(&mut self, message: String, status_type: StatusType) {
        self.status = Some((message, status_type));
    }

    /// Re-fetch the window for the current table or active query. On failure
    /// the previous window is kept and an inline error panel takes its place.
    pub fn load_window(&mut self, source: &dyn DataSource) {
        let Some(table) = self.current_table().map(str::to_string) else {
            return;
        };
        let query_source = match &self.active_query {
            Some(q) => QuerySource::Query(with_table_context(q, &table)),
            None => QuerySource::Table(table),
        };

        match self.fetch_clamped(&query_source, source) {
            Ok(window) => {
                self.fetch_error = None;
                self.window = Some(window);
            }
            Err(e) => {
                warn!(error = %e, "window fetch failed");
                self.fetch_error = Some(e.to_string());
            }
        }
    }

    /// Fetch at the current offset; if the source has shrunk underneath it
    /// (the offset now points past the end), pull the offset back to the
    /// last non-empty page and fetch once more. An in-range offset is left
    /// alone even when it is not page-aligned, as End can leave it.
    fn fetch_clamped(
        &mut self,
        query_source: &QuerySource,
        source: &dyn DataSource,
    ) -> Result<PageWindow, BrowseError> {
        let window = source.fetch_window(query_source, self.page_offset, PAGE_SIZE)?;
        if self.page_offset == 0 || self.page_offset < window.total_rows {
            return Ok(window);
        }
        self.page_offset = clamp_offset(self.page_offset, window.total_rows, PAGE_SIZE);
        self.selected_row = 0;
        source.fetch_window(query_source, self.page_offset, PAGE_SIZE)
    }

    /// Back to the default view of the current table: first page, first row,
    /// no custom query.
    pub(crate) fn reset_view(&mut self) {
        self.selected_row = 0;
        self.page_offset = 0;
        self.active_query = None;
        self.fetch_error = None;
    }
}
