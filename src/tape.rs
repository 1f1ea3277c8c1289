//! This module defines the `Tape`, the unbounded read/write surface of the machine.
//!
//! The tape behaves as if it were infinite in both directions while only storing the
//! contiguous span of cells the head has ever written. Everything outside the stored
//! span is [`BLANK`].

use crate::types::{present, Direction, BLANK, DISPLAY_BLANK_SYMBOL};
use std::collections::VecDeque;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single, logically bi-infinite tape with one head.
///
/// The head index is relative to the front of the store and may sit outside `[0, len)`
/// until the next write. Equality and hashing only look at the logical content and
/// the head offset into it, never at how the cells happen to be stored.
#[derive(Debug, Clone, Default)]
pub struct Tape {
    cells: VecDeque<char>,
    head: isize,
}

impl Tape {
    /// Creates a tape holding `word` with the head on its first symbol.
    pub fn new(word: &str) -> Self {
        Self {
            cells: word.chars().collect(),
            head: 0,
        }
    }

    /// Creates a tape from already collected symbols.
    pub fn from_symbols(symbols: impl IntoIterator<Item = char>) -> Self {
        Self {
            cells: symbols.into_iter().collect(),
            head: 0,
        }
    }

    /// Returns the symbol under the head. Reading never grows the tape.
    pub fn current_symbol(&self) -> char {
        self.cell(self.head)
    }

    /// Writes `symbol` under the head, growing the store with blank cells until it reaches
    /// the head.
    ///
    /// When writes and shifts alternate, as in [`Tape::apply`], the head is never more than
    /// one cell outside the store and a write grows it by at most one cell.
    pub fn write(&mut self, symbol: char) {
        while self.head < 0 {
            self.cells.push_front(BLANK);
            self.head += 1;
        }
        while self.head >= self.cells.len() as isize {
            self.cells.push_back(BLANK);
        }

        self.cells[self.head as usize] = symbol;
    }

    /// Moves the head one cell in `direction`.
    pub fn shift(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.head -= 1,
            Direction::Right => self.head += 1,
            Direction::Stay => {}
        }
    }

    /// Writes `symbol` and then moves the head, as a single transition does.
    pub fn apply(&mut self, symbol: char, direction: Direction) {
        self.write(symbol);
        self.shift(direction);
    }

    /// Returns the logical content: the smallest span covering the head and every
    /// non-blank cell.
    ///
    /// |   | a | b |   |   store
    /// | 0 | 1 | 2 | 3 |   index
    ///
    /// with the head on 3 yields `[a, b, _]`.
    pub fn content(&self) -> Vec<char> {
        let (first, last) = self.bounds();
        (first..=last).map(|i| self.cell(i)).collect()
    }

    /// Returns the head position within [`Tape::content`].
    pub fn head(&self) -> usize {
        let (first, _) = self.bounds();
        (self.head - first) as usize
    }

    /// Returns the number of cells actually stored.
    pub fn stored_len(&self) -> usize {
        self.cells.len()
    }

    /// Renders the logical content with `blank` shown for blank cells and the head cell
    /// wrapped in brackets.
    pub fn render(&self, blank: char) -> String {
        let head = self.head();
        self.content()
            .into_iter()
            .enumerate()
            .map(|(i, c)| {
                let c = present(c, blank);
                if i == head {
                    format!("[{c}]")
                } else {
                    c.to_string()
                }
            })
            .collect()
    }

    fn cell(&self, index: isize) -> char {
        if index < 0 {
            return BLANK;
        }
        self.cells.get(index as usize).copied().unwrap_or(BLANK)
    }

    /// Store indices of the first and last cell of the logical content.
    fn bounds(&self) -> (isize, isize) {
        let first = self
            .cells
            .iter()
            .position(|&c| c != BLANK)
            .map_or(self.head, |i| i as isize);
        let last = self
            .cells
            .iter()
            .rposition(|&c| c != BLANK)
            .map_or(self.head, |i| i as isize);

        (first.min(self.head), last.max(self.head))
    }
}

impl PartialEq for Tape {
    fn eq(&self, other: &Self) -> bool {
        self.head() == other.head() && self.content() == other.content()
    }
}

impl Eq for Tape {}

impl Hash for Tape {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.content().hash(state);
        self.head().hash(state);
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(DISPLAY_BLANK_SYMBOL))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tape() {
        let tape = Tape::new("abc");

        assert_eq!(tape.current_symbol(), 'a');
        assert_eq!(tape.content(), vec!['a', 'b', 'c']);
        assert_eq!(tape.head(), 0);
        assert_eq!(tape.to_string(), "[a]bc");
    }

    #[test]
    fn test_empty_tape() {
        let tape = Tape::new("");

        assert_eq!(tape.current_symbol(), BLANK);
        assert_eq!(tape.content(), vec![BLANK]);
        assert_eq!(tape.head(), 0);
        assert_eq!(tape.stored_len(), 0);
        assert_eq!(tape.to_string(), "[_]");
    }

    #[test]
    fn test_reading_outside_does_not_grow() {
        let mut tape = Tape::new("a");
        tape.shift(Direction::Left);

        assert_eq!(tape.current_symbol(), BLANK);
        assert_eq!(tape.stored_len(), 1);
        assert_eq!(tape.content(), vec![BLANK, 'a']);
        assert_eq!(tape.head(), 0);
    }

    #[test]
    fn test_write_grows_left() {
        let mut tape = Tape::new("a");
        tape.shift(Direction::Left);
        tape.write('x');

        assert_eq!(tape.stored_len(), 2);
        assert_eq!(tape.content(), vec!['x', 'a']);
        assert_eq!(tape.head(), 0);
        assert_eq!(tape.current_symbol(), 'x');
    }

    #[test]
    fn test_write_grows_right() {
        let mut tape = Tape::new("a");
        tape.apply('b', Direction::Right);
        tape.write('c');

        assert_eq!(tape.stored_len(), 2);
        assert_eq!(tape.to_string(), "b[c]");
    }

    #[test]
    fn test_blank_write_at_edge() {
        let mut tape = Tape::new("1");
        tape.apply('1', Direction::Right);

        assert_eq!(tape.to_string(), "1[_]");
        assert_eq!(tape.render('B'), "1[B]");

        tape.apply(BLANK, Direction::Right);
        assert_eq!(tape.stored_len(), 2);
        assert_eq!(tape.content(), vec!['1', BLANK, BLANK]);
        assert_eq!(tape.head(), 2);
    }

    #[test]
    fn test_write_far_outside_store() {
        let mut tape = Tape::new("a");
        tape.shift(Direction::Left);
        tape.shift(Direction::Left);
        tape.write('x');

        assert_eq!(tape.stored_len(), 3);
        assert_eq!(tape.content(), vec!['x', BLANK, 'a']);
        assert_eq!(tape.head(), 0);

        for _ in 0..4 {
            tape.shift(Direction::Right);
        }
        tape.write('y');

        assert_eq!(tape.stored_len(), 5);
        assert_eq!(tape.to_string(), "x_a_[y]");
    }

    #[test]
    fn test_content_trims_blank_padding() {
        let mut tape = Tape::new("ab");
        tape.apply(BLANK, Direction::Right);
        tape.apply(BLANK, Direction::Right);
        tape.apply(BLANK, Direction::Left);

        // Store is [_, _, _], head back on index 1.
        assert_eq!(tape.stored_len(), 3);
        assert_eq!(tape.content(), vec![BLANK]);
        assert_eq!(tape.head(), 0);
    }

    #[test]
    fn test_equality_ignores_layout() {
        // Built by writing to the left of an empty tape.
        let mut left = Tape::new("");
        left.apply('b', Direction::Left);
        left.apply('a', Direction::Stay);

        // Built directly from the word.
        let right = Tape::new("ab");

        assert_eq!(left, right);
    }

    #[test]
    fn test_equality_respects_head() {
        let mut moved = Tape::new("ab");
        moved.shift(Direction::Right);

        assert_ne!(moved, Tape::new("ab"));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Tape::new("ab");
        let mut copy = original.clone();
        copy.apply('x', Direction::Left);
        copy.write('y');

        assert_eq!(original.content(), vec!['a', 'b']);
        assert_eq!(original.head(), 0);
        assert_eq!(copy.content(), vec!['y', 'x', 'b']);
    }
}
