use crossterm::event::{KeyCode, KeyEvent};

use crate::db::DataSource;

use super::{App, Mode};

impl App {
    pub(super) fn handle_table_key(&mut self, key: KeyEvent, source: &dyn DataSource) {
        match key.code {
            KeyCode::Up => {
                if self.selected_table > 0 {
                    self.selected_table -= 1;
                    self.reset_view();
                    self.load_window(source);
                }
            }
            KeyCode::Down => {
                if self.selected_table + 1 < self.tables.len() {
                    self.selected_table += 1;
                    self.reset_view();
                    self.load_window(source);
                }
            }
            KeyCode::Right => {
                // Keeps any active query from a previous visit
                self.mode = Mode::RowBrowse;
                self.selected_row = 0;
                self.page_offset = 0;
                self.load_window(source);
            }
            KeyCode::Enter => {
                self.mode = Mode::RowBrowse;
                self.reset_view();
                self.load_window(source);
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
}
