//! This module defines the `TuringMachine` struct, which executes a binary increment program
//! one transition at a time. It owns the tape, the head position, the current state, and the
//! halting bookkeeping, and exposes them read-only for renderers.

use log::{debug, info};

use crate::tape;
use crate::types::{Direction, Halt, Outcome, Program, Snapshot, Step, Symbol, Transition};

/// A single-tape Turing Machine.
///
/// The tape grows to the right on demand and is never shrunk, so the head always
/// indexes a valid cell.
pub struct TuringMachine {
    state: String,
    tape: Vec<Symbol>,
    head: usize,
    halted: Option<Halt>,
    step_count: usize,
    program: Program,
}

impl TuringMachine {
    /// Creates a new `TuringMachine` positioned at the program's initial configuration.
    pub fn new(program: Program) -> Self {
        Self {
            state: program.initial_state().to_string(),
            tape: program.tape().to_vec(),
            head: program.head(),
            halted: None,
            step_count: 0,
            program,
        }
    }

    /// Executes a single step and reports whether the machine can continue.
    ///
    /// Returns `false` once the machine has halted, either by reaching the terminal
    /// state or by finding no transition. Calling it again after that is a no-op.
    pub fn step(&mut self) -> bool {
        self.advance() == Step::Continue
    }

    /// Executes a single step, reporting why the machine halted if it did.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a transition was applied.
    /// * `Step::Halt(Halt::Terminal)` if the machine is in its terminal state.
    /// * `Step::Halt(Halt::Stuck)` if no transition matches the current state and symbol.
    pub fn advance(&mut self) -> Step {
        if let Some(halt) = self.halted {
            return Step::Halt(halt);
        }

        if self.state == self.program.terminal_state() {
            return self.halt(Halt::Terminal);
        }

        let Some(transition) = self.transition().cloned() else {
            return self.halt(Halt::Stuck);
        };

        debug!(
            "step {}: ({}, {}) -> ({}, {}, {}) at {}",
            self.step_count + 1,
            self.state,
            self.symbol(),
            transition.next_state,
            transition.write,
            transition.direction,
            self.head
        );

        self.tape[self.head] = transition.write;
        self.state = transition.next_state;

        match transition.direction {
            Direction::Left => {
                self.head = self.head.saturating_sub(1);
            }
            Direction::Right => {
                self.head = (self.head + 1).min(self.tape.len() - 1);
                // Keep a blank available beyond the rightmost reachable cell.
                if self.head == self.tape.len() - 1 {
                    self.tape.push(Symbol::Blank);
                }
            }
            Direction::Stay => {}
        }

        self.step_count += 1;

        Step::Continue
    }

    /// Reports whether the next step would halt, without applying it.
    fn pending_halt(&self) -> Option<Halt> {
        if self.state == self.program.terminal_state() {
            Some(Halt::Terminal)
        } else if self.transition().is_none() {
            Some(Halt::Stuck)
        } else {
            None
        }
    }

    fn halt(&mut self, reason: Halt) -> Step {
        info!(
            "machine halted in state {} after {} steps: {}",
            self.state, self.step_count, reason
        );
        self.halted = Some(reason);
        Step::Halt(reason)
    }

    /// Runs the machine until it halts or `max_steps` transitions have been applied.
    pub fn run(&mut self, max_steps: usize) -> Outcome {
        for _ in 0..max_steps {
            if let Step::Halt(halt) = self.advance() {
                return Outcome::Halted(halt);
            }
        }

        if let Some(reason) = self.halted {
            return Outcome::Halted(reason);
        }
        // The ceiling may land exactly on the last transition.
        if let Some(reason) = self.pending_halt() {
            self.halt(reason);
            return Outcome::Halted(reason);
        }

        Outcome::StepLimit
    }

    /// Resets the machine to the configuration it was constructed with.
    pub fn reset(&mut self) {
        self.state = self.program.initial_state().to_string();
        self.tape = self.program.tape().to_vec();
        self.head = self.program.head();
        self.halted = None;
        self.step_count = 0;
        info!("machine reset to state {}", self.state);
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn tape(&self) -> &[Symbol] {
        &self.tape
    }

    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the total number of transitions applied since construction or reset.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Checks whether a previous step halted the machine.
    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    /// Returns why the machine halted, if it has.
    pub fn halt_reason(&self) -> Option<Halt> {
        self.halted
    }

    /// Returns the symbol under the head.
    pub fn symbol(&self) -> Symbol {
        self.tape[self.head]
    }

    /// Finds the transition that the next step would apply, if any.
    pub fn transition(&self) -> Option<&Transition> {
        self.program.table().get(&self.state, self.symbol())
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Returns the first contiguous run of digits on the tape.
    pub fn digits(&self) -> String {
        tape::digit_run(&self.tape)
    }

    /// Captures the current configuration for rendering.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tape: self.tape.clone(),
            head: self.head,
            state: self.state.clone(),
            halted: self.is_halted(),
            step_count: self.step_count,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn symbol_strategy() -> impl Strategy<Value = Symbol> {
        prop_oneof![Just(Symbol::Zero), Just(Symbol::One), Just(Symbol::Blank)]
    }

    proptest! {
        #[test]
        fn increments_every_small_number(n in 0u64..=63) {
            let program = Program::binary_increment("n", tape::encode(n), 1).unwrap();
            let mut machine = TuringMachine::new(program);

            prop_assert_eq!(machine.run(100), Outcome::Halted(Halt::Terminal));
            prop_assert_eq!(machine.digits(), format!("{:b}", n + 1));
        }

        #[test]
        fn head_stays_on_tape_and_tape_never_shrinks(
            cells in prop::collection::vec(symbol_strategy(), 1..16),
            head in 0usize..16,
        ) {
            let head = head % cells.len();
            let program = Program::binary_increment("random", cells, head).unwrap();
            let mut machine = TuringMachine::new(program);

            let mut len = machine.tape().len();
            for _ in 0..64 {
                let stepped = machine.step();
                prop_assert!(machine.head() < machine.tape().len());
                prop_assert!(machine.tape().len() >= len);
                len = machine.tape().len();
                if !stepped {
                    break;
                }
            }
        }

        #[test]
        fn reset_restores_construction_values(
            cells in prop::collection::vec(symbol_strategy(), 1..16),
            steps in 0usize..32,
        ) {
            let program = Program::binary_increment("random", cells, 0).unwrap();
            let mut machine = TuringMachine::new(program);
            let initial = machine.snapshot();

            for _ in 0..steps {
                machine.step();
            }
            machine.reset();

            prop_assert_eq!(machine.snapshot(), initial);
        }
    }
}
