#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The harness-facing surface of the interception layer.
//!
//! A [`TestContext`] owns one proxy tree for the lifetime of a grading
//! session. Test code retrieves the root proxy through [`TestContext::mock`],
//! scripts return values and call budgets through [`TestContext::callable`],
//! and calls [`TestContext::reset`] between independent test cases so no
//! recorded state leaks across students or exercises.

/// Assertion helpers over namespaces and the call log.
pub mod checks;
/// Scripted standard input for programs that read from the user.
pub mod input;

use std::{cell::Cell, rc::Rc};

use anyhow::{Context, Result};
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

use crate::{
    config::{BackingPolicy, HarnessConfig},
    trace::{CallLog, CallProxy, CallRecord, ModuleProxy, Namespace, TraceError},
};

/// An enum to represent harness-level failures outside the proxy tree.
#[derive(thiserror::Error, Debug)]
pub enum HarnessError {
    /// The program under test read more input than the test provided.
    #[error(
        "the program called input() more times than expected; it should have already ended after \
         {provided} line(s)"
    )]
    InputExhausted {
        /// Number of input lines the test configured.
        provided: usize,
    },
}

/// Owns one proxy tree and its shared state for a grading session.
///
/// The context is the injection seam: student-facing code receives the
/// namespace through [`TestContext::mock`] rather than resolving the real
/// library, so submissions run unmodified under interception.
pub struct TestContext {
    /// The root of the proxy tree.
    root:        Rc<ModuleProxy>,
    /// Invocation log shared across the tree.
    log:         CallLog,
    /// Tree-wide passthrough flag.
    passthrough: Rc<Cell<bool>>,
}

impl TestContext {
    /// Builds a context over an optional real backing namespace.
    ///
    /// With [`BackingPolicy::Strict`] and no backing, setup fails explicitly;
    /// with [`BackingPolicy::Lenient`] the tree degrades to no-op proxies and
    /// every unscripted call answers the neutral default.
    pub fn new(
        config: HarnessConfig,
        backing: Option<Rc<dyn Namespace>>,
    ) -> Result<Self, TraceError> {
        if backing.is_none() {
            match config.backing_policy() {
                BackingPolicy::Strict => return Err(TraceError::BackingUnavailable),
                BackingPolicy::Lenient => {
                    tracing::warn!("backing library unavailable; proxies degrade to no-op mode");
                }
            }
        }

        let log = CallLog::new();
        let passthrough = Rc::new(Cell::new(config.passthrough() && backing.is_some()));
        let root = ModuleProxy::root(backing, log.clone(), Rc::clone(&passthrough));
        tracing::info!("interception context ready");

        Ok(Self {
            root,
            log,
            passthrough,
        })
    }

    /// Builds a context with default configuration.
    pub fn with_defaults(backing: Option<Rc<dyn Namespace>>) -> Result<Self, TraceError> {
        Self::new(HarnessConfig::default(), backing)
    }

    /// The root proxy, handed to whatever runs the student program.
    pub fn mock(&self) -> Rc<ModuleProxy> {
        Rc::clone(&self.root)
    }

    /// The shared invocation log.
    pub fn log(&self) -> &CallLog {
        &self.log
    }

    /// Resolves a callable anywhere in the tree by dotted path, e.g.
    /// `display.flip`, so tests can script returns and budgets before running
    /// student code.
    pub fn callable(&self, path: &str) -> Result<Rc<CallProxy>, TraceError> {
        let mut module = self.mock();
        let mut segments = path.split('.').peekable();

        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                return module.callable(segment);
            }
            module = module.module(segment)?;
        }

        Err(TraceError::NotCallable(path.to_string()))
    }

    /// Resolves a nested module proxy by dotted path.
    pub fn module(&self, path: &str) -> Result<Rc<ModuleProxy>, TraceError> {
        let mut module = self.mock();
        for segment in path.split('.') {
            module = module.module(segment)?;
        }
        Ok(module)
    }

    /// Enables or disables forwarding of unscripted calls to the real
    /// implementation, tree-wide.
    pub fn set_passthrough(&self, enabled: bool) {
        self.passthrough.set(enabled);
    }

    /// Current passthrough setting.
    pub fn passthrough(&self) -> bool {
        self.passthrough.get()
    }

    /// First recorded call to the named member, if any.
    pub fn find_first(&self, name: &str) -> Option<CallRecord> {
        self.log.find_first(name)
    }

    /// Number of recorded calls to the named member.
    pub fn call_count(&self, name: &str) -> usize {
        self.log.count(name)
    }

    /// Clears the call log and all scripted state across the tree.
    ///
    /// Must run between independent test cases; unconsumed scripted values
    /// are discarded silently.
    pub fn reset(&self) {
        self.root.reset();
    }

    /// Runs one exercise under interception.
    ///
    /// Resets the tree first so nothing leaks from the previous exercise,
    /// hands the root proxy to `program`, and wraps any interception failure
    /// (a blown call budget, usually) with the exercise name for the report.
    pub fn run_exercise<F, T>(&self, name: &str, program: F) -> Result<T>
    where
        F: FnOnce(Rc<ModuleProxy>) -> Result<T, TraceError>,
    {
        self.reset();
        tracing::info!("running exercise `{name}`");
        program(self.mock())
            .with_context(|| format!("exercise `{name}` failed under interception"))
    }
}

/// Installs the process-wide tracing subscriber the harness logs through.
///
/// Call once at harness startup; subsequent calls panic because a global
/// subscriber is already set.
pub fn init_logging() {
    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(Level::INFO);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();
}
