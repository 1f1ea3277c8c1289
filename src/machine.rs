//! This module defines the `Machine`, which owns the transition table of a single-tape
//! deterministic Turing Machine, and the `Configuration` snapshots it produces.
//!
//! A machine is immutable once built. Simulation is functional: `step` returns a new
//! configuration and `run` lazily yields one configuration per step.

use crate::tape::Tape;
use crate::types::{MachineDescription, MachineError, Transition, BLANK, DISPLAY_BLANK_SYMBOL};
use std::collections::HashMap;
use std::fmt;
use std::iter::FusedIterator;

/// The total state of a machine at one step: its control state and its tape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Configuration {
    state: String,
    tape: Tape,
}

impl Configuration {
    pub fn new(state: impl Into<String>, tape: Tape) -> Self {
        Self {
            state: state.into(),
            tape,
        }
    }

    /// Returns the control state.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the tape.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the logical tape content.
    pub fn content(&self) -> Vec<char> {
        self.tape.content()
    }

    /// Returns the head offset into [`Configuration::content`].
    pub fn head(&self) -> usize {
        self.tape.head()
    }

    /// Renders the configuration as `state: tape` using `blank` for blank cells.
    pub fn render(&self, blank: char) -> String {
        format!("{}: {}", self.state, self.tape.render(blank))
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.state, self.tape)
    }
}

/// A single-tape deterministic Turing Machine.
///
/// The transition table is keyed by state and then by the symbol under the head, so a
/// lookup borrows the current state instead of allocating a key.
#[derive(Debug, Clone)]
pub struct Machine {
    start: String,
    accept: String,
    reject: String,
    blank: Option<char>,
    rules: HashMap<String, HashMap<char, Transition>>,
}

impl Machine {
    /// Creates a `Machine` from a [`MachineDescription`].
    ///
    /// Symbols equal to the description's blank are mapped onto the internal blank, both
    /// in the transition table and in input words given to [`Machine::run`].
    ///
    /// # Returns
    ///
    /// * `Ok(Machine)` if every `(state, symbol)` pair has at most one transition.
    /// * `Err(MachineError::DuplicateTransition)` otherwise.
    pub fn new(description: &MachineDescription) -> Result<Self, MachineError> {
        let transitions = description.transitions.iter().map(|t| Transition {
            symbol: description.to_internal(t.symbol),
            write: description.to_internal(t.write),
            ..t.clone()
        });

        let mut machine = Self::from_parts(
            description.start.clone(),
            description.accept.clone(),
            description.reject.clone(),
            transitions,
        )
        .map_err(|e| match e {
            MachineError::DuplicateTransition(state, symbol) => {
                MachineError::DuplicateTransition(state, description.to_presentation(symbol))
            }
            other => other,
        })?;
        machine.blank = Some(description.blank);

        Ok(machine)
    }

    /// Creates a `Machine` from its halting states and a transition table that already
    /// uses the internal blank.
    pub fn from_parts(
        start: impl Into<String>,
        accept: impl Into<String>,
        reject: impl Into<String>,
        transitions: impl IntoIterator<Item = Transition>,
    ) -> Result<Self, MachineError> {
        let mut rules: HashMap<String, HashMap<char, Transition>> = HashMap::new();

        for transition in transitions {
            let by_symbol = rules.entry(transition.state.clone()).or_default();
            if by_symbol.contains_key(&transition.symbol) {
                return Err(MachineError::DuplicateTransition(
                    transition.state,
                    transition.symbol,
                ));
            }
            by_symbol.insert(transition.symbol, transition);
        }

        Ok(Self {
            start: start.into(),
            accept: accept.into(),
            reject: reject.into(),
            blank: None,
            rules,
        })
    }

    /// Returns the initial state.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Returns the accepting state.
    pub fn accept(&self) -> &str {
        &self.accept
    }

    /// Returns the rejecting state.
    pub fn reject(&self) -> &str {
        &self.reject
    }

    /// Returns the presentation blank symbol.
    pub fn blank(&self) -> char {
        self.blank.unwrap_or(DISPLAY_BLANK_SYMBOL)
    }

    /// Returns the number of transitions in the table.
    pub fn transition_count(&self) -> usize {
        self.rules.values().map(HashMap::len).sum()
    }

    /// Checks whether `state` is the accepting or the rejecting state.
    pub fn is_halting(&self, state: &str) -> bool {
        state == self.accept || state == self.reject
    }

    /// Finds the transition for `state` reading `symbol`, if one is defined.
    pub fn transition(&self, state: &str, symbol: char) -> Option<&Transition> {
        self.rules.get(state)?.get(&symbol)
    }

    /// Returns the configuration every run of `word` starts from.
    pub fn initial_configuration(&self, word: &str) -> Configuration {
        let tape = match self.blank {
            Some(blank) => {
                Tape::from_symbols(word.chars().map(|c| if c == blank { BLANK } else { c }))
            }
            None => Tape::new(word),
        };

        Configuration::new(self.start.clone(), tape)
    }

    /// Computes the configuration following `configuration`.
    ///
    /// The input is left untouched. Without a matching transition the machine moves to
    /// the rejecting state and keeps the tape as it is.
    pub fn step(&self, configuration: &Configuration) -> Configuration {
        self.advance(configuration.clone())
    }

    /// Lazily yields every configuration of a run on `word`, up to and including the
    /// first halting one. The iterator never ends if the machine does not halt.
    pub fn run(&self, word: &str) -> Run<'_> {
        Run {
            machine: self,
            current: Some(self.initial_configuration(word)),
            started: false,
        }
    }

    /// Steps an owned configuration in place.
    fn advance(&self, mut configuration: Configuration) -> Configuration {
        let symbol = configuration.tape.current_symbol();

        match self.transition(&configuration.state, symbol) {
            Some(transition) => {
                configuration
                    .tape
                    .apply(transition.write, transition.direction);
                configuration.state.clone_from(&transition.next_state);
            }
            None => configuration.state.clone_from(&self.reject),
        }

        configuration
    }
}

/// The lazy sequence of configurations returned by [`Machine::run`].
///
/// Each call to `next` performs at most one step; dropping the iterator is the only
/// cancellation needed.
pub struct Run<'a> {
    machine: &'a Machine,
    current: Option<Configuration>,
    started: bool,
}

impl Run<'_> {
    /// Returns the most recently yielded configuration.
    pub fn current(&self) -> Option<&Configuration> {
        self.current.as_ref().filter(|_| self.started)
    }
}

impl Iterator for Run<'_> {
    type Item = Configuration;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            return self.current.clone();
        }

        if self.machine.is_halting(&self.current.as_ref()?.state) {
            return None;
        }

        let previous = self.current.take()?;
        let next = self.machine.advance(previous);
        self.current = Some(next.clone());

        Some(next)
    }
}

impl FusedIterator for Run<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    fn unary_increment() -> MachineDescription {
        MachineDescription {
            start: "q0".into(),
            accept: "qA".into(),
            reject: "qR".into(),
            blank: 'B',
            transitions: vec![Transition::new("q0", '1', "qA", '1', Direction::Right)],
        }
    }

    /// Accepts words of the form `a^n` with an even `n`.
    fn even_as() -> Machine {
        Machine::from_parts(
            "even",
            "yes",
            "no",
            vec![
                Transition::new("even", 'a', "odd", 'a', Direction::Right),
                Transition::new("odd", 'a', "even", 'a', Direction::Right),
                Transition::new("even", BLANK, "yes", BLANK, Direction::Stay),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_machine_creation() {
        let machine = Machine::new(&unary_increment()).unwrap();

        assert_eq!(machine.start(), "q0");
        assert_eq!(machine.accept(), "qA");
        assert_eq!(machine.reject(), "qR");
        assert_eq!(machine.blank(), 'B');
        assert_eq!(machine.transition_count(), 1);
        assert!(machine.is_halting("qA"));
        assert!(machine.is_halting("qR"));
        assert!(!machine.is_halting("q0"));
    }

    #[test]
    fn test_duplicate_transition_rejected() {
        let result = Machine::from_parts(
            "q0",
            "qA",
            "qR",
            vec![
                Transition::new("q0", '1', "qA", '1', Direction::Right),
                Transition::new("q0", '1', "qR", '0', Direction::Left),
            ],
        );

        assert_eq!(
            result.unwrap_err(),
            MachineError::DuplicateTransition("q0".into(), '1')
        );
    }

    #[test]
    fn test_duplicate_blank_transition_rejected() {
        let mut description = unary_increment();
        description
            .transitions
            .push(Transition::new("q0", 'B', "qA", 'B', Direction::Stay));
        description
            .transitions
            .push(Transition::new("q0", 'B', "qR", 'B', Direction::Stay));

        let error = Machine::new(&description).unwrap_err();
        assert_eq!(error, MachineError::DuplicateTransition("q0".into(), 'B'));
        assert_eq!(
            error.to_string(),
            "Duplicate transition for state q0 and symbol 'B'"
        );
    }

    #[test]
    fn test_unary_increment_run() {
        let machine = Machine::new(&unary_increment()).unwrap();
        let run: Vec<_> = machine.run("1").collect();

        assert_eq!(run.len(), 2);
        assert_eq!(run[0].state(), "q0");
        assert_eq!(run[0].tape().render('B'), "[1]");
        assert_eq!(run[1].state(), "qA");
        assert_eq!(run[1].tape().render('B'), "1[B]");
        assert_eq!(run[1].render(machine.blank()), "qA: 1[B]");
    }

    #[test]
    fn test_step_does_not_mutate_input() {
        let machine = Machine::new(&unary_increment()).unwrap();
        let initial = machine.initial_configuration("1");
        let next = machine.step(&initial);

        assert_eq!(initial.state(), "q0");
        assert_eq!(initial.head(), 0);
        assert_eq!(next.state(), "qA");
        assert_eq!(next.head(), 1);
    }

    #[test]
    fn test_missing_transition_rejects_with_same_tape() {
        let machine = Machine::from_parts("q0", "qA", "qR", Vec::new()).unwrap();
        let run: Vec<_> = machine.run("abc").collect();

        assert_eq!(run.len(), 2);
        assert_eq!(run[0], Configuration::new("q0", Tape::new("abc")));
        assert_eq!(run[1], Configuration::new("qR", Tape::new("abc")));
    }

    #[test]
    fn test_start_equal_to_accept_halts_immediately() {
        let machine = Machine::from_parts("q", "q", "r", Vec::new()).unwrap();

        assert_eq!(machine.run("").count(), 1);
        assert_eq!(machine.run("anything").count(), 1);
    }

    #[test]
    fn test_even_as() {
        let machine = even_as();

        let accepted = machine.run("aaaa").last().unwrap();
        assert_eq!(accepted.state(), "yes");
        assert_eq!(accepted.content(), vec!['a', 'a', 'a', 'a', BLANK]);

        let rejected = machine.run("aaa").last().unwrap();
        assert_eq!(rejected.state(), "no");
        assert_eq!(machine.run("aaa").count(), 5);
    }

    #[test]
    fn test_description_blank_in_word() {
        let mut description = unary_increment();
        description
            .transitions
            .push(Transition::new("q0", 'B', "q0", '1', Direction::Stay));
        let machine = Machine::new(&description).unwrap();

        // The leading 'B' of the word is a blank cell, so it is filled with '1' first.
        let last = machine.run("B").last().unwrap();
        assert_eq!(last.state(), "qA");
        assert_eq!(last.tape().render('B'), "1[B]");
    }

    #[test]
    fn test_run_is_fused_and_restartable() {
        let machine = Machine::new(&unary_increment()).unwrap();
        let mut run = machine.run("1");

        assert!(run.current().is_none());
        assert!(run.next().is_some());
        assert_eq!(run.current().map(Configuration::state), Some("q0"));
        assert!(run.next().is_some());
        assert!(run.next().is_none());
        assert!(run.next().is_none());
        assert_eq!(run.current().map(Configuration::state), Some("qA"));

        assert_eq!(machine.run("1").count(), 2);
    }

    #[test]
    fn test_non_halting_run_is_lazy() {
        let machine = Machine::from_parts(
            "q0",
            "qA",
            "qR",
            vec![Transition::new("q0", BLANK, "q0", BLANK, Direction::Stay)],
        )
        .unwrap();

        let mut run = machine.run("");
        for _ in 0..10_000 {
            let configuration = run.next().unwrap();
            assert_eq!(configuration.state(), "q0");
        }
        assert_eq!(run.current().map(|c| c.tape().stored_len()), Some(1));
    }

    #[test]
    fn test_configuration_display() {
        let configuration = Configuration::new("q1", Tape::new("ab"));

        assert_eq!(configuration.to_string(), "q1: [a]b");
        assert_eq!(configuration.content(), vec!['a', 'b']);
        assert_eq!(configuration.head(), 0);
    }
}
