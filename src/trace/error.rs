#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// An enum to represent possible errors when resolving or invoking a proxied
/// member.
#[derive(thiserror::Error, Debug)]
pub enum TraceError {
    /// A proxied callable was invoked more times than the test allows. Fatal
    /// to the current test; the failing call is still recorded in the log.
    #[error("`{name}` was called more than {limit} times")]
    CallBudgetExceeded {
        /// Qualified name of the callable that exceeded its budget.
        name:  String,
        /// The configured number of permitted calls.
        limit: u32,
    },
    /// The backing namespace has no member with this name.
    #[error("the member `{0}` does not exist in the backing namespace")]
    UnknownMember(String),
    /// The member exists but is a constant or nested module, not a callable.
    #[error("`{0}` is not callable")]
    NotCallable(String),
    /// The member exists but is not a constant.
    #[error("`{0}` is not a constant")]
    NotAConstant(String),
    /// The member exists but is not a nested module.
    #[error("`{0}` is not a nested module")]
    NotAModule(String),
    /// The harness required a real backing library that is unavailable.
    #[error("the real backing library is required but unavailable")]
    BackingUnavailable,
}
