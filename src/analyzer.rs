//! This module provides functions for analyzing a program's transition table before execution.
//! It detects states that would leave the machine stuck, states that can never run, and states
//! that do not handle every symbol of the alphabet.

use crate::types::{Program, Symbol, TuringMachineError};
use std::collections::{BTreeSet, VecDeque};

/// Represents the problems that can be found while analyzing a program.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The initial state has no transitions and is not the terminal state.
    InvalidStartState(String),
    /// Transitions lead to states that have no rules and are not terminal.
    UndefinedNextStates(Vec<String>),
    /// States with rules that cannot be reached from the initial state.
    UnreachableStates(Vec<String>),
    /// States that do not handle every symbol; reading one of these halts the machine.
    UnhandledSymbols(Vec<(String, Symbol)>),
}

impl From<AnalysisError> for TuringMachineError {
    /// Converts an `AnalysisError` into a `TuringMachineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::InvalidStartState(state) => {
                TuringMachineError::ValidationError(format!("Invalid start state: {}", state))
            }
            AnalysisError::UndefinedNextStates(states) => TuringMachineError::ValidationError(
                format!("Transitions reference undefined states: {:?}", states),
            ),
            AnalysisError::UnreachableStates(states) => TuringMachineError::ValidationError(
                format!("Unreachable states detected: {:?}", states),
            ),
            AnalysisError::UnhandledSymbols(missing) => {
                let pairs = missing
                    .iter()
                    .map(|(state, symbol)| format!("({state}, '{symbol}')"))
                    .collect::<Vec<_>>()
                    .join(", ");
                TuringMachineError::ValidationError(format!("No transition defined for {pairs}"))
            }
        }
    }
}

/// Analyzes a `Program` for configuration mistakes.
///
/// # Returns
///
/// * `Ok(())` if no problems are found.
/// * `Err(TuringMachineError::ValidationError)` describing the first failed check.
pub fn analyze(program: &Program) -> Result<(), TuringMachineError> {
    let checks = [
        check_valid_start_state,
        check_undefined_next_states,
        check_unreachable_states,
        check_unhandled_symbols,
    ];

    for check in checks {
        check(program)?;
    }

    Ok(())
}

fn is_terminal(program: &Program, state: &str) -> bool {
    state == program.terminal_state()
}

/// Checks that the initial state can take at least one transition.
fn check_valid_start_state(program: &Program) -> Result<(), AnalysisError> {
    let start = program.initial_state();
    if is_terminal(program, start) || program.table().has_state(start) {
        return Ok(());
    }

    Err(AnalysisError::InvalidStartState(start.to_string()))
}

/// Checks that every target state is either terminal or has rules of its own.
fn check_undefined_next_states(program: &Program) -> Result<(), AnalysisError> {
    let table = program.table();
    let undefined: Vec<String> = table
        .iter()
        .map(|(_, _, t)| t.next_state.as_str())
        .filter(|next| !is_terminal(program, next) && !table.has_state(next))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    if undefined.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::UndefinedNextStates(undefined))
    }
}

/// Checks that every state with rules is reachable from the initial state.
fn check_unreachable_states(program: &Program) -> Result<(), AnalysisError> {
    let table = program.table();

    let mut reachable = BTreeSet::new();
    let mut queue = VecDeque::from([program.initial_state()]);

    while let Some(state) = queue.pop_front() {
        if !reachable.insert(state) {
            continue;
        }
        for (from, _, transition) in table.iter() {
            if from == state && !reachable.contains(transition.next_state.as_str()) {
                queue.push_back(transition.next_state.as_str());
            }
        }
    }

    let unreachable: Vec<String> = table
        .iter()
        .map(|(state, _, _)| state)
        .filter(|state| !reachable.contains(state))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    if unreachable.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::UnreachableStates(unreachable))
    }
}

/// Checks that every non-terminal state with rules covers the whole alphabet.
fn check_unhandled_symbols(program: &Program) -> Result<(), AnalysisError> {
    let table = program.table();
    let states: BTreeSet<&str> = table.iter().map(|(state, _, _)| state).collect();

    let missing: Vec<(String, Symbol)> = states
        .into_iter()
        .filter(|state| !is_terminal(program, state))
        .flat_map(|state| {
            Symbol::ALL
                .into_iter()
                .filter(move |&symbol| table.get(state, symbol).is_none())
                .map(move |symbol| (state.to_string(), symbol))
        })
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::UnhandledSymbols(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Rule, TransitionTable};
    use crate::types::Direction::*;
    use crate::types::Symbol::*;

    fn create_test_program(initial_state: &str, rules: Vec<Rule<'static>>) -> Program {
        Program::new(
            "Test Program",
            vec![Blank, One, Blank],
            1,
            initial_state,
            "halt",
            TransitionTable::new(rules).unwrap(),
        )
        .unwrap()
    }

    fn full_rules(state: &'static str, next: &'static str) -> Vec<Rule<'static>> {
        Symbol::ALL
            .into_iter()
            .map(|s| (state, s, next, s, Right))
            .collect()
    }

    #[test]
    fn test_reference_program_is_valid() {
        let program = Program::binary_increment("increment", vec![Blank, One, Blank], 1).unwrap();
        assert!(analyze(&program).is_ok());
    }

    #[test]
    fn test_invalid_start_state() {
        let program = create_test_program("missing", full_rules("start", "halt"));
        assert_eq!(
            check_valid_start_state(&program),
            Err(AnalysisError::InvalidStartState("missing".to_string()))
        );
    }

    #[test]
    fn test_terminal_start_state_is_valid() {
        let program = create_test_program("halt", Vec::new());
        assert!(check_valid_start_state(&program).is_ok());
    }

    #[test]
    fn test_undefined_next_states() {
        let program = create_test_program("start", full_rules("start", "nowhere"));
        assert_eq!(
            check_undefined_next_states(&program),
            Err(AnalysisError::UndefinedNextStates(vec!["nowhere".to_string()]))
        );
    }

    #[test]
    fn test_unreachable_states() {
        let mut rules = full_rules("start", "halt");
        rules.extend(full_rules("other", "halt"));

        let program = create_test_program("start", rules);
        assert_eq!(
            check_unreachable_states(&program),
            Err(AnalysisError::UnreachableStates(vec!["other".to_string()]))
        );
    }

    #[test]
    fn test_unhandled_symbols() {
        let program = create_test_program("start", vec![("start", One, "halt", One, Stay)]);
        assert_eq!(
            check_unhandled_symbols(&program),
            Err(AnalysisError::UnhandledSymbols(vec![
                ("start".to_string(), Zero),
                ("start".to_string(), Blank),
            ]))
        );
    }

    #[test]
    fn test_analysis_error_conversion() {
        let error: TuringMachineError =
            AnalysisError::UnhandledSymbols(vec![("carry".to_string(), Blank)]).into();

        match error {
            TuringMachineError::ValidationError(msg) => assert!(msg.contains("(carry, '_')")),
            other => panic!("Expected a ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_analyze_reports_first_error() {
        let program = create_test_program("missing", vec![("start", One, "halt", One, Stay)]);
        let result = analyze(&program);

        assert_eq!(
            result,
            Err(TuringMachineError::ValidationError(
                "Invalid start state: missing".to_string()
            ))
        );
    }
}
