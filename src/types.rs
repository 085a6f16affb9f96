//! This module defines the core data structures and types used throughout the binary increment
//! machine, including tape symbols, head directions, step outcomes, snapshots, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::table::{TransitionTable, HALT_STATE, START_STATE};

/// The character used to write the blank symbol on a tape.
pub const BLANK_CHAR: char = '_';
/// The step ceiling drivers apply to detect runaway execution.
pub const DEFAULT_STEP_LIMIT: usize = 100;

/// A single tape cell. The alphabet is closed: binary digits plus the blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Symbol {
    /// The digit `0`.
    Zero,
    /// The digit `1`.
    One,
    /// The blank cell, written as `_`.
    Blank,
}

impl Symbol {
    /// All symbols of the alphabet, in display order.
    pub const ALL: [Symbol; 3] = [Symbol::Zero, Symbol::One, Symbol::Blank];

    /// Returns the character written on the tape for this symbol.
    pub fn as_char(self) -> char {
        match self {
            Symbol::Zero => '0',
            Symbol::One => '1',
            Symbol::Blank => BLANK_CHAR,
        }
    }

    /// Checks whether the symbol is a binary digit.
    pub fn is_digit(self) -> bool {
        !self.is_blank()
    }

    pub fn is_blank(self) -> bool {
        self == Symbol::Blank
    }
}

impl TryFrom<char> for Symbol {
    type Error = TuringMachineError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '0' => Ok(Symbol::Zero),
            '1' => Ok(Symbol::One),
            BLANK_CHAR => Ok(Symbol::Blank),
            other => Err(TuringMachineError::InvalidSymbol(other)),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Represents the possible directions the head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left (clamped at index 0).
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'S',
        };
        write!(f, "{c}")
    }
}

/// The right-hand side of a transition rule: what to do after reading a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The state the machine enters.
    pub next_state: String,
    /// The symbol written under the head.
    pub write: Symbol,
    /// Where the head moves after writing.
    pub direction: Direction,
}

/// The construction-time configuration of a machine.
///
/// A program is what `reset` returns the machine to, so it is never mutated once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// A human readable name, shown by frontends.
    pub name: String,
    tape: Vec<Symbol>,
    head: usize,
    initial_state: String,
    terminal_state: String,
    table: TransitionTable,
}

impl Program {
    /// Creates a program, checking that the head indexes into a non-empty tape.
    pub fn new(
        name: impl Into<String>,
        tape: Vec<Symbol>,
        head: usize,
        initial_state: impl Into<String>,
        terminal_state: impl Into<String>,
        table: TransitionTable,
    ) -> Result<Self, TuringMachineError> {
        if tape.is_empty() {
            return Err(TuringMachineError::EmptyTape);
        }
        if head >= tape.len() {
            return Err(TuringMachineError::InvalidHead(head, tape.len()));
        }

        Ok(Self {
            name: name.into(),
            tape,
            head,
            initial_state: initial_state.into(),
            terminal_state: terminal_state.into(),
            table,
        })
    }

    /// Creates a binary increment program over `tape`, starting at `head` in `start`.
    pub fn binary_increment(
        name: impl Into<String>,
        tape: Vec<Symbol>,
        head: usize,
    ) -> Result<Self, TuringMachineError> {
        Self::new(
            name,
            tape,
            head,
            START_STATE,
            HALT_STATE,
            TransitionTable::binary_increment(),
        )
    }

    pub fn tape(&self) -> &[Symbol] {
        &self.tape
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    pub fn terminal_state(&self) -> &str {
        &self.terminal_state
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    /// The machine performed a transition and may continue.
    Continue,
    /// The machine has halted.
    Halt(Halt),
}

/// Why a machine stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Halt {
    /// Reached the designated terminal state.
    Terminal,
    /// No transition exists for the current state and symbol.
    Stuck,
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Halt::Terminal => write!(f, "reached terminal state"),
            Halt::Stuck => write!(f, "no transition defined"),
        }
    }
}

/// The result of running a machine under a step ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The machine halted on its own.
    Halted(Halt),
    /// The ceiling was reached before the machine halted.
    StepLimit,
}

/// A read-only view of a machine, as consumed by renderers and traces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tape: Vec<Symbol>,
    pub head: usize,
    pub state: String,
    pub halted: bool,
    pub step_count: usize,
}

/// Represents the errors that can occur while constructing or configuring a machine.
///
/// Execution itself never fails: undefined transitions halt and boundary moves clamp.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// A character outside the `0`, `1`, `_` alphabet.
    #[error("Invalid tape symbol: {0:?}")]
    InvalidSymbol(char),
    /// Two rules share the same (state, symbol) key.
    #[error("Duplicate transition for state {0} and symbol '{1}'")]
    DuplicateTransition(String, Symbol),
    /// The head position does not index into the initial tape.
    #[error("Head position {0} is outside a tape of length {1}")]
    InvalidHead(usize, usize),
    /// The initial tape has no cells.
    #[error("Tape must contain at least one cell")]
    EmptyTape,
    /// Indicates an error during validation of a program or lookup of a preset.
    #[error("Program validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_from_char() {
        assert_eq!(Symbol::try_from('0'), Ok(Symbol::Zero));
        assert_eq!(Symbol::try_from('1'), Ok(Symbol::One));
        assert_eq!(Symbol::try_from('_'), Ok(Symbol::Blank));
        assert_eq!(
            Symbol::try_from('x'),
            Err(TuringMachineError::InvalidSymbol('x'))
        );
    }

    #[test]
    fn test_symbol_display() {
        let rendered: String = Symbol::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(rendered, "01_");
        assert!(Symbol::One.is_digit());
        assert!(Symbol::Blank.is_blank());
    }

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(left_json, "\"Left\"");

        let stay: Direction = serde_json::from_str("\"Stay\"").unwrap();
        assert_eq!(stay, Direction::Stay);
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = Snapshot {
            tape: vec![Symbol::Blank, Symbol::One],
            head: 1,
            state: "start".to_string(),
            halted: false,
            step_count: 0,
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["tape"], serde_json::json!(["Blank", "One"]));
        assert_eq!(json["state"], "start");

        let back: Snapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_program_validation() {
        let table = TransitionTable::binary_increment();

        let empty = Program::new("empty", Vec::new(), 0, "start", "halt", table.clone());
        assert_eq!(empty, Err(TuringMachineError::EmptyTape));

        let tape = vec![Symbol::Blank, Symbol::One];
        let outside = Program::new("outside", tape.clone(), 2, "start", "halt", table);
        assert_eq!(outside, Err(TuringMachineError::InvalidHead(2, 2)));

        let program = Program::binary_increment("ok", tape, 1).unwrap();
        assert_eq!(program.initial_state(), "start");
        assert_eq!(program.terminal_state(), "halt");
        assert_eq!(program.table().len(), 9);
    }

    #[test]
    fn test_every_error_variant_has_a_message() {
        let errors = [
            TuringMachineError::InvalidSymbol('x'),
            TuringMachineError::DuplicateTransition("start".to_string(), Symbol::Zero),
            TuringMachineError::InvalidHead(3, 2),
            TuringMachineError::EmptyTape,
            TuringMachineError::ValidationError("bad".to_string()),
        ];

        for error in errors {
            // No wildcard arm.
            let expected = match &error {
                TuringMachineError::InvalidSymbol(_) => "Invalid tape symbol",
                TuringMachineError::DuplicateTransition(..) => "Duplicate transition",
                TuringMachineError::InvalidHead(..) => "Head position",
                TuringMachineError::EmptyTape => "at least one cell",
                TuringMachineError::ValidationError(_) => "Program validation error",
            };
            assert!(error.to_string().contains(expected), "{error}");
        }
    }

    #[test]
    fn test_error_display() {
        let error = TuringMachineError::DuplicateTransition("carry".to_string(), Symbol::One);

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Duplicate transition"));
        assert!(error_msg.contains("carry"));
        assert!(error_msg.contains("'1'"));
    }
}
