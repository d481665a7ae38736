#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The namespace model the interception layer operates on.
//!
//! A namespace is a flat collection of named members, each either a callable,
//! a constant, or a nested namespace. Member classification is an explicit
//! tagged lookup so that proxying never depends on runtime reflection.

use std::{collections::BTreeMap, fmt, rc::Rc};

/// Dynamic value currency for arguments, returns, and constants.
pub type Value = serde_json::Value;

/// Keyword arguments passed alongside positional arguments.
pub type Kwargs = BTreeMap<String, Value>;

/// A real callable exposed by a backing namespace.
pub type NativeFn = Rc<dyn Fn(&[Value], &Kwargs) -> Value>;

/// A single named member of a namespace, classified by kind.
#[derive(Clone)]
pub enum Member {
    /// A function or procedure; these get intercepted when proxied.
    Callable(NativeFn),
    /// A constant value; passed through unchanged when proxied.
    Constant(Value),
    /// A nested namespace, e.g. a `display` or `events` sub-module.
    Nested(Rc<dyn Namespace>),
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Callable(_) => f.write_str("Callable"),
            Member::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Member::Nested(_) => f.write_str("Nested"),
        }
    }
}

/// An externally supplied collection of named members.
///
/// The interception layer only ever reads from a namespace; ownership stays
/// with whoever built it (typically a binding to the real library).
pub trait Namespace {
    /// Looks up a member by name, or `None` if the namespace has no such
    /// member.
    fn lookup(&self, name: &str) -> Option<Member>;

    /// Names of all members, in no particular order.
    fn member_names(&self) -> Vec<String>;
}

/// A registry-backed [`Namespace`] built ahead of time from known member
/// names.
#[derive(Default, Clone)]
pub struct StaticNamespace {
    /// Registered members, keyed by name.
    members: BTreeMap<String, Member>,
}

impl StaticNamespace {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constant member.
    pub fn set_constant(mut self, name: impl Into<String>, value: Value) -> Self {
        self.members.insert(name.into(), Member::Constant(value));
        self
    }

    /// Registers a callable member.
    pub fn set_function<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value], &Kwargs) -> Value + 'static,
    {
        self.members
            .insert(name.into(), Member::Callable(Rc::new(f)));
        self
    }

    /// Registers a nested namespace member.
    pub fn set_module(mut self, name: impl Into<String>, module: StaticNamespace) -> Self {
        self.members
            .insert(name.into(), Member::Nested(Rc::new(module)));
        self
    }

    /// Finishes the registry as a shareable trait object.
    pub fn shared(self) -> Rc<dyn Namespace> {
        Rc::new(self)
    }
}

impl Namespace for StaticNamespace {
    fn lookup(&self, name: &str) -> Option<Member> {
        self.members.get(name).cloned()
    }

    fn member_names(&self) -> Vec<String> {
        self.members.keys().cloned().collect()
    }
}
