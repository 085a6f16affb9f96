//! This module defines the `TransitionTable`, an immutable lookup from a (state, symbol) pair
//! to the transition the machine performs, along with the reference binary increment table.

use crate::types::{Direction, Symbol, Transition, TuringMachineError};
use std::collections::{BTreeSet, HashMap};

/// The state the reference machine starts in.
pub const START_STATE: &str = "start";
/// The terminal state of the reference machine.
pub const HALT_STATE: &str = "halt";

/// A single rule row: `(state, read) -> (next_state, write, direction)`.
pub type Rule<'a> = (&'a str, Symbol, &'a str, Symbol, Direction);

/// An immutable mapping from `(state, symbol)` to a `Transition`.
///
/// Rules are grouped by state so a lookup borrows the state name instead of allocating.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransitionTable {
    rules: HashMap<String, HashMap<Symbol, Transition>>,
}

impl TransitionTable {
    /// Builds a table from rule rows.
    ///
    /// # Returns
    ///
    /// * `Ok(TransitionTable)` if every `(state, read)` key is unique.
    /// * `Err(TuringMachineError::DuplicateTransition)` on the first repeated key.
    pub fn new<'a, I>(rows: I) -> Result<Self, TuringMachineError>
    where
        I: IntoIterator<Item = Rule<'a>>,
    {
        let mut table = Self::default();

        for row in rows {
            let (state, read, ..) = row;
            if table.get(state, read).is_some() {
                return Err(TuringMachineError::DuplicateTransition(
                    state.to_string(),
                    read,
                ));
            }
            table.insert(row);
        }

        Ok(table)
    }

    /// The nine-rule table that adds one to a binary number.
    ///
    /// `start` walks right over the digits, `carry` turns ones into zeros moving left,
    /// and `write1` writes the final one before entering `halt`. The rows have unique
    /// keys, so they are inserted without the duplicate check of [`TransitionTable::new`].
    pub fn binary_increment() -> Self {
        use Direction::*;
        use Symbol::*;

        let rows: [Rule<'static>; 9] = [
            ("start", Zero, "start", Zero, Right),
            ("start", One, "start", One, Right),
            ("start", Blank, "carry", Blank, Left),
            ("carry", Zero, "write1", One, Stay),
            ("carry", One, "carry", Zero, Left),
            ("carry", Blank, "write1", One, Stay),
            ("write1", Zero, "halt", One, Stay),
            ("write1", One, "halt", One, Stay),
            ("write1", Blank, "halt", One, Stay),
        ];

        let mut table = Self::default();
        for row in rows {
            table.insert(row);
        }
        table
    }

    fn insert(&mut self, (state, read, next_state, write, direction): Rule<'_>) {
        self.rules.entry(state.to_string()).or_default().insert(
            read,
            Transition {
                next_state: next_state.to_string(),
                write,
                direction,
            },
        );
    }

    /// Looks up the transition for `state` reading `symbol`.
    pub fn get(&self, state: &str, symbol: Symbol) -> Option<&Transition> {
        self.rules.get(state)?.get(&symbol)
    }

    /// Checks whether `state` has at least one outgoing rule.
    pub fn has_state(&self, state: &str) -> bool {
        self.rules.get(state).is_some_and(|rules| !rules.is_empty())
    }

    pub fn len(&self) -> usize {
        self.rules.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every state mentioned by the table, as a source or as a target, sorted.
    pub fn states(&self) -> Vec<String> {
        let mut states = BTreeSet::new();
        for (state, _, transition) in self.iter() {
            states.insert(state.to_string());
            states.insert(transition.next_state.clone());
        }
        states.into_iter().collect()
    }

    /// Iterates the rules sorted by state and then by symbol, for stable display.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Symbol, &Transition)> {
        let mut rows: Vec<_> = self
            .rules
            .iter()
            .flat_map(|(state, rules)| {
                rules
                    .iter()
                    .map(move |(symbol, t)| (state.as_str(), *symbol, t))
            })
            .collect();
        rows.sort_by(|a, b| a.0.cmp(b.0).then(a.1.cmp(&b.1)));
        rows.into_iter()
    }
}
