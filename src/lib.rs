//! This crate provides the execution engine for a binary increment Turing Machine.
//! It includes modules for the transition table, stepping the machine, analyzing a table
//! for missing or unreachable rules, converting tapes to and from numbers, and a set of
//! built-in programs.

pub mod analyzer;
pub mod machine;
pub mod programs;
pub mod table;
pub mod tape;
pub mod types;

/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports `ProgramManager` and `PROGRAMS` from the programs module.
pub use programs::{ProgramManager, PROGRAMS};
/// Re-exports the transition table and the reference state names.
pub use table::{TransitionTable, HALT_STATE, START_STATE};
/// Re-exports the types used to configure and observe a machine.
pub use types::{
    Direction, Halt, Outcome, Program, Snapshot, Step, Symbol, Transition, TuringMachineError,
    DEFAULT_STEP_LIMIT,
};
