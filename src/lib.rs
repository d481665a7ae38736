//! # proctor
//!
//! A call-tracing mock layer and test-harness utilities for grading student
//! exercises.
//!
//! Student programs written against an external multimedia library are run
//! under a harness that substitutes the library's namespace with a recording
//! proxy. The proxy is indistinguishable from the real library to the student
//! program: constants resolve to the real values, callables are intercepted,
//! recorded, and either answered from a scripted queue, forwarded to the real
//! implementation, or answered with a neutral default.
//!
//! The surrounding grading pipeline (exercise discovery, metadata, score
//! submission) is a separate collaborator; this crate exposes nothing to it
//! beyond the [`harness::TestContext`] accessor.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Harness configuration resolved from defaults or the environment.
pub mod config;
/// The test-harness context, scripted input, and assertion helpers.
pub mod harness;
/// The interception core: namespaces, proxies, and the call log.
pub mod trace;

pub use config::{BackingPolicy, HarnessConfig};
pub use harness::{HarnessError, TestContext};
pub use trace::{
    CallLog, CallProxy, CallRecord, Kwargs, Member, ModuleProxy, Namespace, NativeFn, Resolved,
    StaticNamespace, TraceError, Value,
};
