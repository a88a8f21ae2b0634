use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use sqlview::db::{DataSource, SqliteSource};
use sqlview::ui::{self, App};

/// A full-screen TUI browser for SQLite database files
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the SQLite database file
    db_path: PathBuf,
}

fn main() -> Result<()> {
    setup_logging();

    // Parse CLI args and validate the database before entering raw mode so
    // errors print normally. Every startup failure exits 1, including bad
    // argument counts, so clap's usage message is printed by hand.
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        // Help and version are not errors; everything else exits 1 like
        // the rest of the startup checks.
        std::process::exit(if e.use_stderr() { 1 } else { 0 });
    });

    if !cli.db_path.exists() {
        eprintln!("Error: database file '{}' not found", cli.db_path.display());
        std::process::exit(1);
    }

    let source = match SqliteSource::open(&cli.db_path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let tables = match source.list_tables() {
        Ok(tables) => tables,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if tables.is_empty() {
        eprintln!("No tables found in database");
        std::process::exit(1);
    }

    let db_name = cli
        .db_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("database")
        .to_string();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(db_name, tables);
    app.load_window(&source);

    let res = run_app(&mut terminal, &mut app, &source);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    source: &SqliteSource,
) -> Result<()> {
    loop {
        // Redraw on a fixed cadence; a key event falls straight through to
        // the next iteration's draw, so changes render immediately.
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore release/repeat)
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                app.handle_key(key, source);

                if app.should_quit {
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_argument_is_a_usage_error() {
        let err = Cli::try_parse_from(["sqlview"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn test_surplus_arguments_are_a_usage_error() {
        let err = Cli::try_parse_from(["sqlview", "a.db", "b.db"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn test_single_path_parses() {
        let cli = Cli::try_parse_from(["sqlview", "test.db"]).unwrap();
        assert_eq!(cli.db_path, PathBuf::from("test.db"));
    }

    #[test]
    fn test_help_is_not_an_error_exit() {
        let err = Cli::try_parse_from(["sqlview", "--help"]).unwrap_err();
        assert!(!err.use_stderr());
    }
}

/// Logging goes to a file, and only when asked for: stdout belongs to the
/// TUI while the app runs.
fn setup_logging() {
    if std::env::var_os("SQLVIEW_LOG").is_none() {
        return;
    }
    if let Ok(file) = std::fs::File::create("sqlview.log") {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .init();
    }
}
