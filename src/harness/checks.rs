#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Assertion helpers for grading tests.
//!
//! Each helper returns a [`CheckFailure`] whose message is written for the
//! student reading their feedback, naming what was expected and what the
//! program actually did.

use itertools::Itertools;

use crate::trace::{CallLog, Kwargs, Member, Namespace, Value};

/// An enum to represent grading-assertion failures, phrased as feedback.
#[derive(thiserror::Error, Debug)]
pub enum CheckFailure {
    /// A required function is missing from the student's namespace.
    #[error("the function `{0}` was never defined")]
    MissingMember(String),
    /// A member was called a different number of times than required.
    #[error("`{name}` should be called exactly once, but was called {count} times")]
    WrongCallCount {
        /// Qualified member name.
        name:  String,
        /// Number of calls actually recorded.
        count: usize,
    },
    /// A member was called with the wrong positional arguments.
    #[error("`{name}` should receive the arguments ({expected}), but received ({received})")]
    WrongArgs {
        /// Qualified member name.
        name:     String,
        /// Rendered expected arguments.
        expected: String,
        /// Rendered received arguments.
        received: String,
    },
    /// A member was called with the wrong keyword arguments.
    #[error(
        "`{name}` should receive the keyword arguments {{{expected}}}, but received {{{received}}}"
    )]
    WrongKwargs {
        /// Qualified member name.
        name:     String,
        /// Rendered expected keyword arguments.
        expected: String,
        /// Rendered received keyword arguments.
        received: String,
    },
    /// A member that must never run was called anyway.
    #[error("`{name}` should never be called, but was called {count} times")]
    UnexpectedCall {
        /// Qualified member name.
        name:  String,
        /// Number of calls actually recorded.
        count: usize,
    },
}

/// Checks that the namespace defines a function with this name.
///
/// A constant or nested module under the same name does not count; the
/// exercise asked for a function.
pub fn function_exists(namespace: &dyn Namespace, name: &str) -> Result<(), CheckFailure> {
    match namespace.lookup(name) {
        Some(Member::Callable(_)) => Ok(()),
        _ => Err(CheckFailure::MissingMember(name.to_string())),
    }
}

/// Checks that `name` was called exactly once, with exactly these positional
/// and keyword arguments.
pub fn called_once_with(
    log: &CallLog,
    name: &str,
    args: &[Value],
    kwargs: &Kwargs,
) -> Result<(), CheckFailure> {
    let count = log.count(name);
    if count != 1 {
        return Err(CheckFailure::WrongCallCount {
            name: name.to_string(),
            count,
        });
    }

    let Some(record) = log.find_first(name) else {
        return Err(CheckFailure::WrongCallCount {
            name: name.to_string(),
            count,
        });
    };

    if record.args() != args {
        return Err(CheckFailure::WrongArgs {
            name:     name.to_string(),
            expected: render_args(args),
            received: render_args(record.args()),
        });
    }

    if record.kwargs() != kwargs {
        return Err(CheckFailure::WrongKwargs {
            name:     name.to_string(),
            expected: render_kwargs(kwargs),
            received: render_kwargs(record.kwargs()),
        });
    }

    Ok(())
}

/// Checks that `name` was never called.
pub fn never_called(log: &CallLog, name: &str) -> Result<(), CheckFailure> {
    let count = log.count(name);
    if count == 0 {
        Ok(())
    } else {
        Err(CheckFailure::UnexpectedCall {
            name: name.to_string(),
            count,
        })
    }
}

/// Renders positional arguments for a feedback message.
fn render_args(args: &[Value]) -> String {
    args.iter().map(ToString::to_string).join(", ")
}

/// Renders keyword arguments for a feedback message.
fn render_kwargs(kwargs: &Kwargs) -> String {
    kwargs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .join(", ")
}
