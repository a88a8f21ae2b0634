use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::db::{CellValue, PageWindow};
use crate::pager::{current_page, page_count, row_range, PAGE_SIZE};
use crate::ui::{App, Mode, StatusType, EXPORT_FORMATS};

const SIDEBAR_WIDTH: u16 = 28;
const MAX_CELL_WIDTH: usize = 40;

/// Pure projection of the last committed session state. Never mutates `App`
/// and never talks to the data source.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(chunks[1]);

    draw_sidebar(frame, app, main_chunks[0]);
    draw_main_panel(frame, app, main_chunks[1]);

    draw_status_bar(frame, app, chunks[2]);

    // Overlays
    if app.mode == Mode::QueryEdit {
        draw_query_popup(frame, app);
    }
    if app.export_picker.is_some() {
        draw_export_picker(frame, app);
    }
    if app.show_help {
        draw_help_overlay(frame, app);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let text = format!(" sqlview | {} ", app.db_name);
    let header_text = format!(
        "{}{}",
        text,
        " ".repeat(area.width.saturating_sub(text.len() as u16) as usize)
    );
    let header = Paragraph::new(header_text).style(theme.header());
    frame.render_widget(header, area);
}

fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let focused = app.mode == Mode::TableSelect;

    let items: Vec<ListItem> = app
        .tables
        .iter()
        .enumerate()
        .map(|(i, table)| {
            let selected = i == app.selected_table;
            let marker = if selected { "▶ " } else { "  " };
            let style = if selected && focused {
                Style::default()
                    .fg(theme.text_accent)
                    .add_modifier(Modifier::BOLD)
            } else if selected {
                Style::default().fg(theme.text_secondary)
            } else {
                Style::default().fg(theme.text_primary)
            };
            ListItem::new(format!("{}{}", marker, table)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(focused))
            .title(" Tables "),
    );
    frame.render_widget(list, area);
}

fn draw_main_panel(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let focused = app.mode == Mode::RowBrowse;

    let title = main_panel_title(app);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(focused))
        .title(title)
        .title_style(if focused {
            Style::default().fg(theme.text_accent)
        } else {
            Style::default().fg(theme.text_secondary)
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(error) = &app.fetch_error {
        let error_text = Paragraph::new(error.as_str())
            .style(theme.status_error())
            .wrap(Wrap { trim: true });
        frame.render_widget(error_text, inner);
        return;
    }

    match &app.window {
        Some(window) if window.columns.is_empty() => {
            let text = Paragraph::new("No columns to show").style(theme.muted());
            frame.render_widget(text, inner);
        }
        Some(window) => draw_window_grid(frame, app, window, inner),
        None => {
            let text = Paragraph::new("Select a table to view its contents").style(theme.muted());
            frame.render_widget(text, inner);
        }
    }
}

fn main_panel_title(app: &App) -> String {
    let Some(window) = &app.window else {
        return " Table Contents ".to_string();
    };
    let table = app.current_table().unwrap_or("?");

    let mut title = format!(
        " {} | {} rows | {} cols ",
        table,
        window.total_rows,
        window.columns.len()
    );

    let pages = page_count(window.total_rows, PAGE_SIZE);
    if pages > 1 {
        let (start, end) = row_range(app.page_offset, window.rows.len(), window.total_rows);
        title.push_str(&format!(
            "| Page {}/{} | Rows {}-{} ",
            current_page(app.page_offset, PAGE_SIZE),
            pages,
            start,
            end
        ));
    }

    if app.active_query.is_some() {
        title.push_str("| Custom Query ");
    }

    title
}

fn draw_window_grid(frame: &mut Frame, app: &App, window: &PageWindow, area: Rect) {
    let theme = &app.theme;

    let widths: Vec<Constraint> = column_widths(window)
        .into_iter()
        .map(|w| Constraint::Length(w as u16))
        .collect();

    let header_cells: Vec<Cell> = window
        .columns
        .iter()
        .map(|name| {
            Cell::from(name.clone()).style(
                Style::default()
                    .fg(theme.text_primary)
                    .add_modifier(Modifier::BOLD),
            )
        })
        .collect();
    let header = Row::new(header_cells)
        .style(Style::default().bg(theme.bg_secondary))
        .height(1);

    let rows: Vec<Row> = window
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let cells: Vec<Cell> = row
                .iter()
                .map(|cell| {
                    let style = if matches!(cell, CellValue::Null) {
                        Style::default().fg(theme.text_muted)
                    } else {
                        Style::default().fg(theme.text_primary)
                    };
                    Cell::from(truncate_cell(&cell.display())).style(style)
                })
                .collect();

            if app.mode == Mode::RowBrowse && i == app.selected_row {
                Row::new(cells).style(theme.selected())
            } else {
                Row::new(cells)
            }
        })
        .collect();

    let table = Table::new(rows, widths).header(header);
    frame.render_widget(table, area);
}

fn column_widths(window: &PageWindow) -> Vec<usize> {
    window
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let data_width = window
                .rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(CellValue::display_width)
                .max()
                .unwrap_or(0);
            data_width.max(name.width()).min(MAX_CELL_WIDTH) + 2
        })
        .collect()
}

fn truncate_cell(display: &str) -> String {
    if display.chars().count() > MAX_CELL_WIDTH {
        let head: String = display.chars().take(MAX_CELL_WIDTH - 3).collect();
        format!("{}...", head)
    } else {
        display.to_string()
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let (left_text, left_style) = match &app.status {
        Some((message, StatusType::Error)) => (
            format!(" {}", message),
            theme.status_error().bg(theme.bg_secondary),
        ),
        Some((message, StatusType::Success)) => (
            format!(" {}", message),
            theme.status_success().bg(theme.bg_secondary),
        ),
        None => (
            format!(" {}", app.db_name),
            theme.muted().bg(theme.bg_secondary),
        ),
    };

    let right_text = match app.mode {
        Mode::TableSelect => "↑↓ Tables | →/Enter Browse | h Help | Esc Quit ",
        Mode::RowBrowse => {
            "↑↓ Rows | PgUp/PgDn | Home/End | ← Back | i Query | e Export | h Help | Esc Quit "
        }
        Mode::QueryEdit => "Type query | Enter Execute | Esc Cancel ",
    };

    let left_len = left_text.width() as u16;
    let right_len = right_text.width() as u16;
    let padding = area.width.saturating_sub(left_len + right_len);

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::styled(
            " ".repeat(padding as usize),
            Style::default().bg(theme.bg_secondary),
        ),
        Span::styled(
            right_text.to_string(),
            Style::default().fg(theme.text_muted).bg(theme.bg_secondary),
        ),
    ]);

    frame.render_widget(Paragraph::new(status_line), area);
}

fn draw_query_popup(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = frame.area();

    let popup_width = (area.width * 2 / 3).max(20).min(area.width.saturating_sub(2));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = area.height / 2;
    let popup_area = Rect::new(popup_x, popup_y.saturating_sub(2), popup_width, 3);

    frame.render_widget(Clear, popup_area);

    let input = Paragraph::new(format!("{}█", app.query_draft))
        .style(Style::default().fg(theme.text_primary))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_focused))
                .title(" SQL Query (Esc to cancel) ")
                .style(Style::default().bg(theme.bg_primary)),
        );
    frame.render_widget(input, popup_area);
}

fn draw_export_picker(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = frame.area();
    let selected = app.export_picker.unwrap_or(0);

    let row_count = app.window.as_ref().map(|w| w.total_rows).unwrap_or(0);

    let picker_width = 36.min(area.width.saturating_sub(4));
    let picker_height = (EXPORT_FORMATS.len() as u16 + 4).min(area.height.saturating_sub(4));
    let picker_x = (area.width.saturating_sub(picker_width)) / 2;
    let picker_y = (area.height.saturating_sub(picker_height)) / 2;
    let picker_area = Rect::new(picker_x, picker_y, picker_width, picker_height);

    frame.render_widget(Clear, picker_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .title(format!(" Export ({} rows) ", row_count))
        .title_style(
            Style::default()
                .fg(theme.text_accent)
                .add_modifier(Modifier::BOLD),
        )
        .style(Style::default().bg(theme.bg_primary));

    let inner = block.inner(picker_area);
    frame.render_widget(block, picker_area);

    let items: Vec<ListItem> = EXPORT_FORMATS
        .iter()
        .enumerate()
        .map(|(i, fmt)| {
            let style = if i == selected {
                Style::default()
                    .fg(theme.text_accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text_primary)
            };
            ListItem::new(format!("  {}. {}", i + 1, fmt.label())).style(style)
        })
        .collect();

    let list_area = Rect::new(
        inner.x,
        inner.y,
        inner.width,
        inner.height.saturating_sub(1),
    );
    frame.render_widget(List::new(items), list_area);

    let hint_area = Rect::new(
        inner.x,
        inner.y + inner.height.saturating_sub(1),
        inner.width,
        1,
    );
    let hint = Paragraph::new(" Enter: Export | 1-3 | Esc: Cancel").style(theme.muted());
    frame.render_widget(hint, hint_area);
}

fn draw_help_overlay(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = frame.area();

    let help_width = 46.min(area.width.saturating_sub(4));
    let help_height = 24.min(area.height.saturating_sub(4));
    let help_x = (area.width.saturating_sub(help_width)) / 2;
    let help_y = (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(help_x, help_y, help_width, help_height);

    frame.render_widget(Clear, help_area);

    let help_text = vec![
        "",
        " TABLE LIST",
        "   ↑/↓            Select table",
        "   →/Enter        Browse rows",
        "",
        " ROW BROWSER",
        "   ↑/↓            Move row, scroll pages",
        "   PgUp/PgDn      Previous/next page",
        "   Home/End       First/last page",
        "   ←              Back to table list",
        "   i              Enter a custom query",
        "   e              Export table or query",
        "   r/Enter        Refresh",
        "",
        " QUERY INPUT",
        "   Enter          Execute",
        "   Esc            Cancel",
        "",
        " GLOBAL",
        "   h              Toggle this help",
        "   Esc/Ctrl+C     Quit",
        "",
    ];

    let text: Vec<Line> = help_text
        .iter()
        .map(|s| Line::from(Span::styled(*s, Style::default().fg(theme.text_primary))))
        .collect();

    let help = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_focused))
                .title(" Help ")
                .title_style(
                    Style::default()
                        .fg(theme.text_accent)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .style(Style::default().bg(theme.bg_primary));

    frame.render_widget(help, help_area);
}
