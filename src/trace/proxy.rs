#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Intercepting proxies.
//!
//! A [`ModuleProxy`] stands in for a whole namespace: constants resolve to
//! the real values unchanged, callables are wrapped in a [`CallProxy`] that
//! records every invocation, and nested namespaces become child proxies
//! sharing the same log. Student code talks to the proxy exactly as it would
//! talk to the real library.

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, VecDeque},
    fmt,
    rc::Rc,
};

use super::{
    error::TraceError,
    log::{CallLog, CallRecord},
    member::{Kwargs, Member, Namespace, NativeFn, Value},
};

/// A resolved member of a proxied namespace.
///
/// Resolution is memoized: repeated lookups of the same name yield the same
/// constant value, the same [`CallProxy`] instance, or the same child
/// [`ModuleProxy`].
#[derive(Clone)]
pub enum Resolved {
    /// A constant, identical to the backing namespace's value.
    Constant(Value),
    /// An intercepted callable.
    Callable(Rc<CallProxy>),
    /// A child proxy for a nested namespace.
    Module(Rc<ModuleProxy>),
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Resolved::Callable(proxy) => f.debug_tuple("Callable").field(&proxy.name).finish(),
            Resolved::Module(module) => f.debug_tuple("Module").field(&module.name).finish(),
        }
    }
}

/// A proxy standing in for one namespace (the root library or one of its
/// sub-modules).
pub struct ModuleProxy {
    /// Qualified name of this namespace; empty for the root.
    name:        String,
    /// The real namespace, when the library is available.
    backing:     Option<Rc<dyn Namespace>>,
    /// Invocation log shared across the whole proxy tree.
    log:         CallLog,
    /// Tree-wide flag: forward unscripted calls to the real callable.
    passthrough: Rc<Cell<bool>>,
    /// Memoized wrapping decisions, one entry per resolved member name.
    cache:       RefCell<HashMap<String, Resolved>>,
}

impl ModuleProxy {
    /// Creates the root proxy of a tree.
    ///
    /// `backing` is `None` when the real library is unavailable; every member
    /// then resolves to a no-op callable so student code still runs.
    pub fn root(
        backing: Option<Rc<dyn Namespace>>,
        log: CallLog,
        passthrough: Rc<Cell<bool>>,
    ) -> Rc<Self> {
        Rc::new(Self {
            name: String::new(),
            backing,
            log,
            passthrough,
            cache: RefCell::new(HashMap::new()),
        })
    }

    /// Creates a child proxy for a nested namespace, sharing this proxy's log
    /// and passthrough flag.
    fn child(&self, name: &str, backing: Option<Rc<dyn Namespace>>) -> Rc<Self> {
        Rc::new(Self {
            name: self.qualify(name),
            backing,
            log: self.log.clone(),
            passthrough: Rc::clone(&self.passthrough),
            cache: RefCell::new(HashMap::new()),
        })
    }

    /// Qualified name of this namespace; empty for the root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shared invocation log.
    pub fn log(&self) -> &CallLog {
        &self.log
    }

    /// True when a real backing namespace is present.
    pub fn is_backed(&self) -> bool {
        self.backing.is_some()
    }

    /// Prefixes `name` with this namespace's own qualified name.
    fn qualify(&self, name: &str) -> String {
        if self.name.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.name, name)
        }
    }

    /// Resolves a member by name.
    ///
    /// The wrapping decision is made once per name and memoized: constants
    /// come back unchanged on every access, callables are wrapped in exactly
    /// one [`CallProxy`], nested namespaces become exactly one child proxy.
    /// Without a backing namespace every name resolves to a no-op callable;
    /// with one, unknown names fail as the real library's attribute
    /// resolution would.
    pub fn resolve(&self, name: &str) -> Result<Resolved, TraceError> {
        if let Some(resolved) = self.cache.borrow().get(name) {
            return Ok(resolved.clone());
        }

        let resolved = match &self.backing {
            Some(backing) => match backing.lookup(name) {
                Some(Member::Callable(real)) => {
                    tracing::debug!("intercepting callable `{}`", self.qualify(name));
                    Resolved::Callable(self.wrap(name, Some(real)))
                }
                Some(Member::Constant(value)) => Resolved::Constant(value),
                Some(Member::Nested(namespace)) => {
                    tracing::debug!("proxying nested namespace `{}`", self.qualify(name));
                    Resolved::Module(self.child(name, Some(namespace)))
                }
                None => return Err(TraceError::UnknownMember(self.qualify(name))),
            },
            None => Resolved::Callable(self.wrap(name, None)),
        };

        self.cache
            .borrow_mut()
            .insert(name.to_string(), resolved.clone());
        Ok(resolved)
    }

    /// Builds the call proxy for one callable member.
    fn wrap(&self, name: &str, real: Option<NativeFn>) -> Rc<CallProxy> {
        Rc::new(CallProxy {
            name: self.qualify(name),
            log: self.log.clone(),
            real,
            passthrough: Rc::clone(&self.passthrough),
            limit: Cell::new(None),
            remaining: Cell::new(None),
            scripted: RefCell::new(VecDeque::new()),
        })
    }

    /// Resolves a member expected to be callable.
    pub fn callable(&self, name: &str) -> Result<Rc<CallProxy>, TraceError> {
        match self.resolve(name)? {
            Resolved::Callable(proxy) => Ok(proxy),
            _ => Err(TraceError::NotCallable(self.qualify(name))),
        }
    }

    /// Resolves a member expected to be a constant.
    pub fn constant(&self, name: &str) -> Result<Value, TraceError> {
        match self.resolve(name)? {
            Resolved::Constant(value) => Ok(value),
            _ => Err(TraceError::NotAConstant(self.qualify(name))),
        }
    }

    /// Resolves a member expected to be a nested namespace.
    ///
    /// Without a backing namespace a fresh no-op child proxy is synthesized,
    /// so programs using sub-modules (`display`, `events`, ...) still run.
    /// The wrapping decision per name is still made exactly once: if the
    /// name was already resolved as a callable (via [`Self::resolve`] or
    /// [`Self::call`]), it stays a callable and this fails with
    /// [`TraceError::NotAModule`]. Resolve sub-modules through `module`
    /// before touching the name any other way.
    pub fn module(&self, name: &str) -> Result<Rc<ModuleProxy>, TraceError> {
        if let Some(resolved) = self.cache.borrow().get(name) {
            return match resolved {
                Resolved::Module(module) => Ok(Rc::clone(module)),
                _ => Err(TraceError::NotAModule(self.qualify(name))),
            };
        }

        if self.backing.is_some() {
            return match self.resolve(name)? {
                Resolved::Module(module) => Ok(module),
                _ => Err(TraceError::NotAModule(self.qualify(name))),
            };
        }

        let module = self.child(name, None);
        self.cache
            .borrow_mut()
            .insert(name.to_string(), Resolved::Module(Rc::clone(&module)));
        Ok(module)
    }

    /// Resolves and invokes a callable member with positional arguments only.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, TraceError> {
        self.call_with_kwargs(name, args, &Kwargs::new())
    }

    /// Resolves and invokes a callable member with positional and keyword
    /// arguments.
    pub fn call_with_kwargs(
        &self,
        name: &str,
        args: &[Value],
        kwargs: &Kwargs,
    ) -> Result<Value, TraceError> {
        self.callable(name)?.invoke(args, kwargs)
    }

    /// Clears the shared log and every scripted queue and call budget in the
    /// tree rooted here. Invoked between independent test cases.
    pub fn reset(&self) {
        self.log.clear();
        self.reset_scripts();
    }

    /// Recursively clears scripted state without touching the log.
    fn reset_scripts(&self) {
        for resolved in self.cache.borrow().values() {
            match resolved {
                Resolved::Callable(proxy) => proxy.reset(),
                Resolved::Module(module) => module.reset_scripts(),
                Resolved::Constant(_) => {}
            }
        }
    }
}

impl fmt::Debug for ModuleProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleProxy")
            .field("name", &self.name)
            .field("backed", &self.is_backed())
            .finish()
    }
}

/// The interception point for a single callable member.
///
/// Every invocation is recorded first, unconditionally, so assertions can
/// distinguish "called but rejected" from "never called". After recording,
/// the call is answered from the scripted-return queue if one is pending,
/// forwarded to the real callable if passthrough is enabled, or answered
/// with the neutral default.
pub struct CallProxy {
    /// Qualified member name, e.g. `display.flip`.
    name:        String,
    /// Invocation log shared with the owning proxy tree.
    log:         CallLog,
    /// The real callable; absent when the library is unavailable.
    real:        Option<NativeFn>,
    /// Tree-wide passthrough flag shared with the owning proxy tree.
    passthrough: Rc<Cell<bool>>,
    /// The configured call limit, kept for error messages.
    limit:       Cell<Option<u32>>,
    /// Remaining permitted calls; `None` means unlimited.
    remaining:   Cell<Option<u32>>,
    /// Scripted return values, consumed at most once each, FIFO.
    scripted:    RefCell<VecDeque<Value>>,
}

impl CallProxy {
    /// Qualified name of the member this proxy intercepts.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Intercepts one invocation.
    ///
    /// The record is appended before the budget check, so a rejected call
    /// still shows up in the log. With a limit of `n`, the `(n + 1)`th call
    /// fails with [`TraceError::CallBudgetExceeded`].
    pub fn invoke(&self, args: &[Value], kwargs: &Kwargs) -> Result<Value, TraceError> {
        self.log
            .record(CallRecord::new(self.name.clone(), args.to_vec(), kwargs.clone()));

        if let Some(remaining) = self.remaining.get() {
            if remaining == 0 {
                return Err(TraceError::CallBudgetExceeded {
                    name:  self.name.clone(),
                    limit: self.limit.get().unwrap_or(0),
                });
            }
            self.remaining.set(Some(remaining - 1));
        }

        if let Some(value) = self.scripted.borrow_mut().pop_front() {
            return Ok(value);
        }

        if self.passthrough.get() {
            if let Some(real) = &self.real {
                return Ok(real(args, kwargs));
            }
        }

        Ok(Value::Null)
    }

    /// Queues one scripted return value.
    pub fn push_return(&self, value: Value) {
        self.scripted.borrow_mut().push_back(value);
    }

    /// Queues several scripted return values, consumed in order.
    pub fn script_returns<I>(&self, values: I)
    where
        I: IntoIterator<Item = Value>,
    {
        self.scripted.borrow_mut().extend(values);
    }

    /// Number of scripted values not yet consumed.
    pub fn pending_returns(&self) -> usize {
        self.scripted.borrow().len()
    }

    /// Discards any scripted values not yet consumed.
    pub fn clear_script(&self) {
        self.scripted.borrow_mut().clear();
    }

    /// Caps the number of permitted calls from this point on.
    pub fn limit_calls(&self, limit: u32) {
        self.limit.set(Some(limit));
        self.remaining.set(Some(limit));
    }

    /// Removes any call limit.
    pub fn clear_limit(&self) {
        self.limit.set(None);
        self.remaining.set(None);
    }

    /// Discards unconsumed scripted values and any call limit.
    pub(crate) fn reset(&self) {
        self.clear_script();
        self.clear_limit();
    }
}

impl fmt::Debug for CallProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallProxy")
            .field("name", &self.name)
            .field("pending_returns", &self.pending_returns())
            .field("remaining", &self.remaining.get())
            .finish()
    }
}
