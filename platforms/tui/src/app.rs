use action::Action;
use bincr::{tape, Direction as Move, Program, ProgramManager, Step, TuringMachine};
use keymap::{Config, KeyMapConfig};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap},
    Frame,
};

const BLOCK_PADDING: Padding = Padding::new(1, 1, 0, 0);
/// Number of tape cells drawn at once.
const VISIBLE_CELLS: usize = 15;
/// Number of cells kept visible to the left of the head.
const CELLS_BEFORE_HEAD: usize = 7;

pub struct App {
    machine: TuringMachine,
    current_program_index: usize,
    auto_play: bool,
    message: String,
    show_help: bool,
    pub(crate) keymap: Config<Action>,
    // Indicates if the tape was given on the command line or stdin, disabling preset switching
    program_loaded_from_source: bool,
}

impl App {
    pub fn new_default() -> Result<Self, String> {
        let program = ProgramManager::get_program_by_index(0)
            .map_err(|e| format!("Failed to load preset: {}", e))?;

        Ok(Self::with_program(
            program,
            "Press 'h' for help.".to_string(),
            false,
        ))
    }

    pub fn new_from_tape_string(tape_content: &str, head: usize) -> Result<Self, String> {
        let cells = tape::parse(tape_content).map_err(|e| format!("Failed to load tape: {}", e))?;
        let program = Program::binary_increment("Custom tape", cells, head)
            .map_err(|e| format!("Failed to load tape: {}", e))?;

        Ok(Self::with_program(
            program,
            "Tape loaded from source. Press 'h' for help.".to_string(),
            true,
        ))
    }

    fn with_program(program: Program, message: String, from_source: bool) -> Self {
        Self {
            machine: TuringMachine::new(program),
            keymap: Action::keymap_config(),
            current_program_index: 0,
            // The visualizer starts running, like a demo.
            auto_play: true,
            message,
            show_help: false,
            program_loaded_from_source: from_source,
        }
    }

    pub fn machine(&self) -> &TuringMachine {
        &self.machine
    }

    pub fn render(&self, f: &mut Frame) {
        let inner_area = f.area().inner(Margin::new(1, 0));

        // Main vertical chunks: Title, Tape, Lower (State + Table + Controls), Status
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Title and description
                Constraint::Length(7), // Tape, head marker and indices
                Constraint::Min(0),    // Lower section (flexible height)
                Constraint::Length(3), // Status
            ])
            .split(inner_area);

        self.render_title(f, main_chunks[0]);
        self.render_tape(f, main_chunks[1]);

        let lower_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30), // Machine state
                Constraint::Percentage(40), // Transition table or help
                Constraint::Percentage(30), // Controls
            ])
            .split(main_chunks[2]);

        self.render_machine_state(f, lower_chunks[0]);

        if self.show_help {
            self.render_help(f, lower_chunks[1]);
        } else {
            self.render_transitions(f, lower_chunks[1]);
        }

        self.render_controls(f, lower_chunks[2]);
        self.render_status(f, main_chunks[3]);
    }

    fn render_title(&self, f: &mut Frame, area: Rect) {
        let program = self.machine.program();
        let input = tape::digit_run(program.tape());
        let output = tape::decimal(&input)
            .and_then(|n| n.checked_add(1))
            .map(|n| format!("{n:b}"))
            .unwrap_or_else(|| "?".to_string());

        let name = if self.program_loaded_from_source {
            format!("{} (Custom)", program.name)
        } else {
            format!(
                "{} ({}/{})",
                program.name,
                self.current_program_index + 1,
                ProgramManager::count()
            )
        };

        let text = vec![
            Line::from(Span::styled(
                "Turing Machine Simulator",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("Example: Binary Increment (Input: {input} → Output: {output})"),
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(block(&name).title_alignment(Alignment::Center));

        f.render_widget(paragraph, area);
    }

    fn render_tape(&self, f: &mut Frame, area: Rect) {
        let cells = self.machine.tape();
        let head = self.machine.head();

        let start = head.saturating_sub(CELLS_BEFORE_HEAD);
        let end = cells.len().min(start + VISIBLE_CELLS);

        let mut marker_spans = Vec::new();
        let mut tape_spans = Vec::new();
        let mut index_spans = Vec::new();

        for (i, symbol) in cells.iter().enumerate().take(end).skip(start) {
            if i == head {
                marker_spans.push(Span::styled(
                    " ▼ ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ));
                tape_spans.push(Span::styled(
                    format!(" {symbol} "),
                    Style::default()
                        .bg(Color::Yellow)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD),
                ));
            } else {
                marker_spans.push(Span::raw("   "));
                tape_spans.push(Span::styled(format!(" {symbol} "), Style::default()));
            }

            index_spans.push(Span::styled(
                format!("{i:^3}"),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let text = vec![
            Line::from(marker_spans),
            Line::from(tape_spans),
            Line::from(index_spans),
            Line::from(Span::styled(
                format!(
                    "Head at position: {} (symbol: '{}')",
                    head,
                    self.machine.symbol()
                ),
                Style::default().fg(Color::Cyan),
            )),
        ];

        f.render_widget(section("Tape", text), area);
    }

    fn render_machine_state(&self, f: &mut Frame, area: Rect) {
        let (state_text, state_color) = if self.machine.is_halted() {
            (format!("{} (HALTED)", self.machine.state()), Color::Red)
        } else {
            (self.machine.state().to_string(), Color::Green)
        };

        let mut text = vec![
            Line::from(vec![
                Span::styled("State: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state_text,
                    Style::default()
                        .fg(state_color)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Steps: ", Style::default().fg(Color::Yellow)),
                Span::raw(self.machine.step_count().to_string()),
            ]),
            Line::from(vec![
                Span::styled("Reading: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("'{}'", self.machine.symbol()),
                    Style::default().fg(Color::Blue),
                ),
            ]),
            Line::from(vec![
                Span::styled("Value: ", Style::default().fg(Color::Yellow)),
                Span::raw(self.value_text()),
            ]),
        ];

        if let Some(reason) = self.machine.halt_reason() {
            text.push(Line::from(Span::styled(
                format!("Halted: {reason}"),
                Style::default().fg(Color::Red),
            )));
        }

        let paragraph = section("Machine State", text).wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn value_text(&self) -> String {
        let digits = self.machine.digits();
        match tape::decimal(&digits) {
            Some(n) => format!("{digits} ({n})"),
            None => digits,
        }
    }

    fn render_transitions(&self, f: &mut Frame, area: Rect) {
        let state = self.machine.state();
        let symbol = self.machine.symbol();
        let halted = self.machine.is_halted();

        let lines: Vec<Line> = self
            .machine
            .program()
            .table()
            .iter()
            .map(|(from, read, t)| {
                let row = format!(
                    "{from} + {read} → {}, write {}, {}",
                    t.next_state,
                    t.write,
                    describe_move(t.direction)
                );

                // Highlight the rule the next step will apply.
                if !halted && from == state && read == symbol {
                    Line::from(Span::styled(
                        row,
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(Span::raw(row))
                }
            })
            .collect();

        let paragraph = section("State Transitions", lines).wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let help_text = vec![
            Line::from("The machine adds one to the binary number on the tape."),
            Line::from(""),
            Line::from("  start  - walk right to the end of the number"),
            Line::from("  carry  - turn 1s into 0s moving left"),
            Line::from("  write1 - write the final 1"),
            Line::from("  halt   - done"),
            Line::from(""),
            Line::from("  '_' is a blank cell; the tape grows to the right."),
            Line::from("  The machine also halts when no rule matches."),
        ];

        let paragraph = section("Help", help_text).wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn render_controls(&self, f: &mut Frame, area: Rect) {
        let controls = vec![
            Line::from("Space - Step forward"),
            Line::from("r - Reset"),
            Line::from("p - Pause/Resume auto-run"),
            Line::from(if self.program_loaded_from_source {
                "← → - Switching disabled"
            } else {
                "← → - Switch input"
            }),
            Line::from("h - Toggle help"),
            Line::from("q - Quit"),
        ];

        f.render_widget(section("Controls", controls), area);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let repo = "@rezigned/bincr";
        let outer = block("Status");
        let inner = outer.inner(area);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Fill(1), Constraint::Length(repo.len() as u16)])
            .split(inner);

        let auto_play_status = if self.auto_play { "ON" } else { "OFF" };
        let status = Line::from(vec![
            Span::raw("Auto-run: "),
            Span::styled(auto_play_status, Style::default().fg(Color::Yellow)),
            Span::raw(format!(" | {}", self.message)),
        ]);

        let social = Text::from(
            Line::from(Span::styled(repo, Style::default().fg(Color::Yellow))).right_aligned(),
        );

        f.render_widget(outer, area);
        f.render_widget(status, chunks[0]);
        f.render_widget(social, chunks[1]);
    }

    pub fn step_machine(&mut self) {
        match self.machine.advance() {
            Step::Continue => {
                self.message = format!("Step {} completed", self.machine.step_count());
            }
            Step::Halt(halt) => {
                self.message = format!("Machine halted: {halt}. Press 'r' to reset.");
            }
        }
    }

    pub fn reset_machine(&mut self) {
        self.machine.reset();
        self.message = "Machine reset".to_string();
    }

    pub fn toggle_auto_play(&mut self) {
        self.auto_play = !self.auto_play;
        self.message = format!(
            "Auto-run {}",
            if self.auto_play { "resumed" } else { "paused" }
        );
    }

    pub fn is_auto_playing(&self) -> bool {
        self.auto_play && !self.machine.is_halted()
    }

    pub fn next_program(&mut self) {
        if self.program_loaded_from_source {
            self.message = "Cannot switch inputs when loaded from source.".to_string();
            return;
        }
        let count = ProgramManager::count();
        self.current_program_index = (self.current_program_index + 1) % count;
        self.load_current_program();
    }

    pub fn previous_program(&mut self) {
        if self.program_loaded_from_source {
            self.message = "Cannot switch inputs when loaded from source.".to_string();
            return;
        }
        let count = ProgramManager::count();
        self.current_program_index = if self.current_program_index == 0 {
            count - 1
        } else {
            self.current_program_index - 1
        };
        self.load_current_program();
    }

    fn load_current_program(&mut self) {
        match ProgramManager::get_program_by_index(self.current_program_index) {
            Ok(program) => {
                self.message = format!("Loaded {}", program.name);
                self.machine = TuringMachine::new(program);
            }
            Err(e) => self.message = e.to_string(),
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }
}

fn describe_move(direction: Move) -> &'static str {
    match direction {
        Move::Left => "move L",
        Move::Right => "move R",
        Move::Stay => "stay",
    }
}

fn section<'a>(title: &'a str, content: Vec<Line<'a>>) -> Paragraph<'a> {
    Paragraph::new(content).block(block(title))
}

fn block(title: &str) -> Block {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" {title} "))
        .padding(BLOCK_PADDING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_app_runs_reference_preset() {
        let mut app = App::new_default().unwrap();
        assert!(app.is_auto_playing());

        while app.is_auto_playing() {
            app.step_machine();
        }

        assert!(app.machine().is_halted());
        assert_eq!(app.machine().digits(), "1100");
    }

    #[test]
    fn test_reset_keeps_auto_run() {
        let mut app = App::new_default().unwrap();
        for _ in 0..20 {
            app.step_machine();
        }
        assert!(!app.is_auto_playing());

        app.reset_machine();
        assert!(app.is_auto_playing());
        assert_eq!(app.machine().step_count(), 0);
    }

    #[test]
    fn test_program_switching_wraps() {
        let mut app = App::new_default().unwrap();

        app.previous_program();
        assert_eq!(app.current_program_index, ProgramManager::count() - 1);

        app.next_program();
        assert_eq!(app.current_program_index, 0);
        assert_eq!(app.machine().digits(), "1011");
    }

    #[test]
    fn test_custom_tape_disables_switching() {
        let mut app = App::new_from_tape_string("_111___", 1).unwrap();
        app.next_program();

        assert_eq!(app.machine().digits(), "111");
        assert!(app.message.contains("Cannot switch"));
    }

    #[test]
    fn test_invalid_tape_is_rejected() {
        assert!(App::new_from_tape_string("_12_", 1).is_err());
        assert!(App::new_from_tape_string("_1_", 9).is_err());
    }
}
