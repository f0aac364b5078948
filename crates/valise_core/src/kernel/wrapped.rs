//! Wrapped value: the chainable calling convention.
//!
//! # Responsibility
//! - Hold one owned underlying value for the duration of a call chain.
//! - Forward method calls to the namespace's instance-level method table,
//!   injecting the wrapped value as first argument.
//!
//! # Invariants
//! - A wrapped value is exclusively owned by the chain that created it.
//! - `invoke` returns whatever the installed capability returns.

use crate::kernel::namespace::Namespace;
use crate::kernel::{CapabilityError, CapabilityResult};
use crate::value::Value;

/// Opaque container holding exactly one underlying value.
#[derive(Debug)]
pub struct Wrapped<'a> {
    namespace: &'a Namespace,
    wrapped: Value,
}

impl<'a> Wrapped<'a> {
    pub(crate) fn new(namespace: &'a Namespace, wrapped: Value) -> Self {
        Self { namespace, wrapped }
    }

    /// The underlying value.
    pub fn value(&self) -> &Value {
        &self.wrapped
    }

    /// Unwraps the chain, handing the underlying value back.
    pub fn into_inner(self) -> Value {
        self.wrapped
    }

    /// Invokes an installed chainable method on the wrapped value.
    ///
    /// The argument list is the wrapped value followed by the caller's
    /// arguments; the capability runs with the namespace as context.
    /// Calling a name that was never installed is a caller-contract
    /// violation surfaced as [`CapabilityError::UnknownMethod`].
    pub fn invoke(&self, name: &str, args: &[Value]) -> CapabilityResult {
        let Some(method) = self.namespace.method(name) else {
            return Err(CapabilityError::UnknownMethod(name.to_string()));
        };
        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(self.wrapped.clone());
        argv.extend_from_slice(args);
        method.invoke(self.namespace, &argv)
    }

    /// Fluent form of [`invoke`](Self::invoke), rewrapping the result so
    /// calls can be chained.
    pub fn chain(self, name: &str, args: &[Value]) -> Result<Wrapped<'a>, CapabilityError> {
        let next = self.invoke(name, args)?;
        Ok(Wrapped::new(self.namespace, next))
    }
}
