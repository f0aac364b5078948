//! Extension kernel: capability handles, namespace registry, wrapped values.
//!
//! # Responsibility
//! - Define the callable capability contract shared by static and
//!   chainable calling conventions.
//! - Wire the namespace registry and the wrapped-value fluent type.
//!
//! # Invariants
//! - Static entries and chainable methods stay in lockstep after install.
//! - Capabilities are invoked with the namespace as calling context.

pub mod builtin;
pub mod namespace;
pub mod wrapped;

use crate::text::TextError;
use crate::time::TimeError;
use crate::value::traverse::SortError;
use crate::value::{TypeTag, Value};
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use namespace::Namespace;

/// Result of one capability invocation.
pub type CapabilityResult = Result<Value, CapabilityError>;

type CapabilityFn = dyn Fn(&Namespace, &[Value]) -> CapabilityResult + Send + Sync;

/// Cheaply clonable handle around one installable function.
///
/// The `&Namespace` parameter is the calling context every capability
/// receives, whichever convention invoked it.
#[derive(Clone)]
pub struct Capability {
    call: Arc<CapabilityFn>,
}

impl Capability {
    /// Wraps a callable into an installable capability.
    pub fn new(
        call: impl Fn(&Namespace, &[Value]) -> CapabilityResult + Send + Sync + 'static,
    ) -> Self {
        Self { call: Arc::new(call) }
    }

    /// Invokes the capability with the namespace as context.
    pub fn invoke(&self, context: &Namespace, args: &[Value]) -> CapabilityResult {
        (self.call)(context, args)
    }

    /// Registration identity: two handles are the same capability only if
    /// they share the underlying callable.
    pub fn same_registration(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.call, &other.call)
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Capability(<fn>)")
    }
}

/// Kernel invocation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityError {
    /// Chainable or static call to a name that was never installed.
    UnknownMethod(String),
    /// Invocation of a hand-registered guard entry.
    ReservedMethod(String),
    /// A capability adapter received the wrong number of arguments.
    Arity {
        name: String,
        expected: String,
        got: usize,
    },
    /// A capability adapter received an argument of the wrong type.
    Type {
        name: String,
        expected: String,
        got: TypeTag,
    },
    Text(TextError),
    Time(TimeError),
    Sort(SortError),
}

impl Display for CapabilityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownMethod(name) => write!(f, "method is not installed: {name}"),
            Self::ReservedMethod(name) => {
                write!(f, "method is reserved for direct namespace access: {name}")
            }
            Self::Arity { name, expected, got } => {
                write!(f, "{name} expects {expected} arguments, got {got}")
            }
            Self::Type { name, expected, got } => {
                write!(f, "{name} expects a {expected} argument, got {got}")
            }
            Self::Text(err) => write!(f, "{err}"),
            Self::Time(err) => write!(f, "{err}"),
            Self::Sort(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CapabilityError {}

impl From<TextError> for CapabilityError {
    fn from(err: TextError) -> Self {
        Self::Text(err)
    }
}

impl From<TimeError> for CapabilityError {
    fn from(err: TimeError) -> Self {
        Self::Time(err)
    }
}

impl From<SortError> for CapabilityError {
    fn from(err: SortError) -> Self {
        Self::Sort(err)
    }
}
