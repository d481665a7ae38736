#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The append-only, ordered log of intercepted invocations.
//!
//! One log is shared by reference across every proxy in a tree, so ordering
//! assertions ("called once", "called before X") hold across nested modules.

use std::{borrow::Cow, cell::RefCell, rc::Rc};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tabled::{Table, Tabled, settings::Style};

use super::member::{Kwargs, Value};

/// An immutable record of one intercepted invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Qualified member name, e.g. `draw` or `display.flip`.
    name:   String,
    /// Positional arguments, in the order they were passed.
    args:   Vec<Value>,
    /// Keyword arguments; keys are unique.
    kwargs: Kwargs,
}

impl CallRecord {
    /// Creates a record for an invocation of `name`.
    pub fn new(name: impl Into<String>, args: Vec<Value>, kwargs: Kwargs) -> Self {
        Self {
            name: name.into(),
            args,
            kwargs,
        }
    }

    /// Qualified name of the invoked member.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Positional arguments the member was invoked with.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Keyword arguments the member was invoked with.
    pub fn kwargs(&self) -> &Kwargs {
        &self.kwargs
    }

    /// Renders the positional arguments for table output.
    fn args_display(&self) -> String {
        self.args.iter().map(ToString::to_string).join(", ")
    }

    /// Renders the keyword arguments for table output.
    fn kwargs_display(&self) -> String {
        self.kwargs
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .join(", ")
    }
}

impl Tabled for CallRecord {
    const LENGTH: usize = 3;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::from(self.name.as_str()),
            Cow::from(self.args_display()),
            Cow::from(self.kwargs_display()),
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec![Cow::from("Call"), Cow::from("Args"), Cow::from("Kwargs")]
    }
}

/// The ordered invocation log shared across one proxy tree.
///
/// Cloning a `CallLog` clones the handle, not the entries; every clone
/// observes and mutates the same underlying sequence.
#[derive(Default, Clone)]
pub struct CallLog {
    /// Recorded invocations, in call order.
    entries: Rc<RefCell<Vec<CallRecord>>>,
}

impl CallLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record; invoked by call proxies only.
    pub(crate) fn record(&self, record: CallRecord) {
        tracing::debug!("recorded call to `{}`", record.name());
        self.entries.borrow_mut().push(record);
    }

    /// Returns the first record whose member name matches, in recorded order.
    ///
    /// Absence is not an error; the caller decides whether it fails the test.
    pub fn find_first(&self, name: &str) -> Option<CallRecord> {
        self.entries
            .borrow()
            .iter()
            .find(|record| record.name() == name)
            .cloned()
    }

    /// Number of recorded calls to the named member.
    pub fn count(&self, name: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|record| record.name() == name)
            .count()
    }

    /// Total number of recorded calls.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// True when nothing has been recorded since the last reset.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// A copy of all records, in call order.
    pub fn snapshot(&self) -> Vec<CallRecord> {
        self.entries.borrow().clone()
    }

    /// Removes every record. Invoked between independent test cases.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Renders the log as a table for human-readable feedback.
    pub fn table(&self) -> String {
        Table::new(self.snapshot()).with(Style::modern()).to_string()
    }
}
