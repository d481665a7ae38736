#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Error taxonomy for interception and invocation.
pub mod error;
/// Call records and the shared, ordered call log.
pub mod log;
/// The namespace model: members, callables, and static registries.
pub mod member;
/// Intercepting proxies for namespaces and individual callables.
pub mod proxy;

pub use error::TraceError;
pub use log::{CallLog, CallRecord};
pub use member::{Kwargs, Member, Namespace, NativeFn, StaticNamespace, Value};
pub use proxy::{CallProxy, ModuleProxy, Resolved};
