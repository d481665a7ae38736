#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Scripted standard input.
//!
//! Exercises that read from the user get their input lines from a
//! pre-configured queue instead of a terminal. Reading past the end fails
//! with a named error rather than hanging, so the harness can report "your
//! program asked for more input than expected" instead of timing out.

use std::{cell::RefCell, collections::VecDeque};

use super::HarnessError;

/// A FIFO queue of input lines configured by the test author.
#[derive(Default)]
pub struct ScriptedInput {
    /// Lines not yet consumed.
    lines:    RefCell<VecDeque<String>>,
    /// Number of lines configured in total, for error messages.
    provided: usize,
}

impl ScriptedInput {
    /// Creates a queue from the given lines.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: VecDeque<String> = lines.into_iter().map(Into::into).collect();
        let provided = lines.len();
        Self {
            lines: RefCell::new(lines),
            provided,
        }
    }

    /// Returns the next line, or fails when the program reads more than the
    /// test provided.
    pub fn read_line(&self) -> Result<String, HarnessError> {
        self.lines
            .borrow_mut()
            .pop_front()
            .ok_or(HarnessError::InputExhausted {
                provided: self.provided,
            })
    }

    /// Number of configured lines not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lines.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_come_back_in_order() {
        let input = ScriptedInput::new(["alice", "42"]);
        assert_eq!(input.read_line().unwrap(), "alice");
        assert_eq!(input.read_line().unwrap(), "42");
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn reading_past_the_end_names_the_overrun() {
        let input = ScriptedInput::new(["only"]);
        input.read_line().unwrap();

        let err = input.read_line().unwrap_err();
        assert!(matches!(err, HarnessError::InputExhausted { provided: 1 }));
    }
}
