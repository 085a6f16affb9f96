use crate::tape;
use crate::types::{Program, TuringMachineError};

/// Built-in inputs: a name and the initial tape. Every preset starts on the first digit.
const PRESET_TAPES: [(&str, &str); 5] = [
    ("Binary increment 1011", "_1011___"),
    ("Binary increment 1", "_1___"),
    ("Binary increment 10", "_10___"),
    ("Binary increment 11", "_11___"),
    ("Binary increment 111", "_111___"),
];

/// Head position of every preset: the most significant digit.
const PRESET_HEAD: usize = 1;

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<Program> = PRESET_TAPES
        .iter()
        .filter_map(|(name, text)| match preset(name, text) {
            Ok(program) => Some(program),
            Err(e) => {
                log::error!("Failed to build preset '{}': {}", name, e);
                None
            }
        })
        .collect();
}

fn preset(name: &str, text: &str) -> Result<Program, TuringMachineError> {
    Program::binary_increment(name, tape::parse(text)?, PRESET_HEAD)
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<Program, TuringMachineError> {
        PROGRAMS.get(index).cloned().ok_or_else(|| {
            TuringMachineError::ValidationError(format!("Program index {} out of range", index))
        })
    }

    /// Get a program by its name
    pub fn get_program_by_name(name: &str) -> Result<Program, TuringMachineError> {
        PROGRAMS
            .iter()
            .find(|program| program.name == name)
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program '{}' not found", name))
            })
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        PROGRAMS.iter().map(|program| program.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::machine::TuringMachine;
    use crate::types::{Halt, Outcome, DEFAULT_STEP_LIMIT};

    #[test]
    fn test_all_presets_are_built() {
        assert_eq!(ProgramManager::count(), PRESET_TAPES.len());
    }

    #[test]
    fn test_reference_preset_comes_first() {
        let program = ProgramManager::get_program_by_index(0).unwrap();
        assert_eq!(tape::render(program.tape()), "_1011___");
        assert_eq!(program.head(), 1);
        assert_eq!(program.initial_state(), "start");
    }

    #[test]
    fn test_all_presets_are_valid() {
        for program in PROGRAMS.iter() {
            assert!(analyze(program).is_ok(), "Program '{}' is invalid", program.name);
        }
    }

    #[test]
    fn test_presets_increment_their_input() {
        for program in PROGRAMS.iter() {
            let before = tape::decimal(&tape::digit_run(program.tape())).unwrap();
            let mut machine = TuringMachine::new(program.clone());

            assert_eq!(
                machine.run(DEFAULT_STEP_LIMIT),
                Outcome::Halted(Halt::Terminal)
            );
            assert_eq!(tape::decimal(&machine.digits()), Some(before + 1));
        }
    }

    #[test]
    fn test_get_program_by_index() {
        assert!(ProgramManager::get_program_by_index(0).is_ok());
        assert!(ProgramManager::get_program_by_index(999).is_err());
    }

    #[test]
    fn test_get_program_by_name() {
        let program = ProgramManager::get_program_by_name("Binary increment 111").unwrap();
        assert_eq!(tape::render(program.tape()), "_111___");

        let result = ProgramManager::get_program_by_name("Nonexistent");
        assert!(result.is_err());
    }

    #[test]
    fn test_list_program_names() {
        let names = ProgramManager::list_program_names();
        assert_eq!(names.len(), 5);
        assert!(names.contains(&"Binary increment 1011".to_string()));
        assert!(names.contains(&"Binary increment 1".to_string()));
    }
}
