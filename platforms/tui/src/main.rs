mod app;
mod snapshot;

use action::Action;
use app::App;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::Read;
use std::path::PathBuf;
use std::{error::Error, io, time::Duration};

/// Step-by-step terminal visualizer of a binary increment Turing machine.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  bincr-tui
  bincr-tui _111___
  echo _1011___ | bincr-tui
  bincr-tui --snapshot /tmp/frames")]
struct Cli {
    /// Initial tape, one symbol (0, 1 or _) per cell.
    /// If not provided, the built-in inputs are loaded.
    /// Can also pipe the tape via stdin.
    tape: Option<String>,

    /// Initial head position for a custom tape.
    #[clap(long, default_value_t = 1)]
    head: usize,

    /// Render frames as text files into this directory instead of opening the UI.
    #[clap(long)]
    snapshot: Option<PathBuf>,
}

/// Represents the state of the application loop.
#[derive(PartialEq)]
enum AppState {
    Running,
    ShouldQuit,
}

/// A wrapper around the terminal to ensure it's restored on drop.
struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl Tui {
    /// Creates a new TUI.
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Restore the terminal to its original state.
        // The results are ignored as we can't do much about errors during drop.
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Load the tape before initializing the TUI, so errors reach stderr
    // without interfering with the terminal's alternate screen.
    let mut app = match load_app(&cli) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(dir) = &cli.snapshot {
        for path in snapshot::write_snapshots(&mut app, dir)? {
            println!("Saved {}", path.display());
        }
        return Ok(());
    }

    // Initialize the TUI. The `Tui` struct will handle cleanup on drop.
    let mut tui = Tui::new()?;

    run_app(&mut tui.terminal, app)?;

    Ok(())
}

/// Builds the application from a tape argument, then from stdin, and finally
/// falls back to the built-in inputs.
fn load_app(cli: &Cli) -> Result<App, String> {
    if let Some(tape) = &cli.tape {
        App::new_from_tape_string(tape, cli.head)
    } else if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))
            .and_then(|_| App::new_from_tape_string(&buffer, cli.head))
    } else {
        App::new_default()
    }
}

/// Runs the main application loop.
fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        let timeout = if app.is_auto_playing() {
            Duration::from_millis(500) // Two steps per second during auto-run
        } else {
            Duration::from_millis(100)
        };

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if handle_key_event(&mut app, key) == AppState::ShouldQuit {
                    return Ok(());
                }
            }
        }

        if app.is_auto_playing() {
            app.step_machine();
        }
    }
}

/// Handles key events and updates the application state.
fn handle_key_event(app: &mut App, key: KeyEvent) -> AppState {
    if let Some(action) = app.keymap.get(&key) {
        match action {
            Action::Quit => return AppState::ShouldQuit,
            Action::Reset => app.reset_machine(),
            Action::Step => app.step_machine(),
            Action::ToggleAutoPlay => app.toggle_auto_play(),
            Action::ToggleHelp => app.toggle_help(),
            Action::PreviousProgram => app.previous_program(),
            Action::NextProgram => app.next_program(),
        }
    }
    AppState::Running
}
