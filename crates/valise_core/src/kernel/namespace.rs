//! Namespace registry and the install operation.
//!
//! # Responsibility
//! - Hold the static entry table and the instance-level method table.
//! - Install module exports under both calling conventions.
//! - Expose the process-wide bootstrapped singleton.
//!
//! # Invariants
//! - Install takes function-valued entries only, in ascending name order.
//! - A chainable method already present in the method table is never
//!   overwritten; its static entry is still (re)assigned.
//! - The uninitialized→active transition happens on the first install and
//!   never reverses; there is no uninstall.

use crate::kernel::builtin::builtin_module;
use crate::kernel::wrapped::Wrapped;
use crate::kernel::{Capability, CapabilityError, CapabilityResult};
use crate::value::traverse::{self, EntryKey};
use crate::value::{is_function, Value};
use log::debug;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Namespace lifecycle. There is no teardown state while the process lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceState {
    /// Created, own API not yet installed.
    Uninitialized,
    /// At least one install has run.
    Active,
}

/// Outcome counts for one install call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Entries registered under both calling conventions.
    pub installed: usize,
    /// Function entries whose chainable name already existed; static entry
    /// reassigned, method table untouched.
    pub skipped_existing: usize,
    /// Non-function entries ignored by the install-set filter.
    pub ignored: usize,
}

/// Explicit registry exposing installed capabilities as named entries.
#[derive(Debug)]
pub struct Namespace {
    state: NamespaceState,
    statics: BTreeMap<String, Value>,
    methods: BTreeMap<String, Capability>,
}

impl Namespace {
    /// Creates an uninitialized namespace.
    ///
    /// The method table is pre-seeded with the hand-registered `install`
    /// guard so no later module can shadow the kernel's own entry point.
    pub fn new() -> Self {
        let mut methods = BTreeMap::new();
        methods.insert(
            "install".to_string(),
            Capability::new(|_, _| Err(CapabilityError::ReservedMethod("install".to_string()))),
        );
        Self {
            state: NamespaceState::Uninitialized,
            statics: BTreeMap::new(),
            methods,
        }
    }

    /// Creates a namespace and installs the builtin module onto it.
    ///
    /// The namespace seeding its own API is the one-time
    /// uninitialized→active transition.
    pub fn bootstrap() -> Self {
        let mut namespace = Self::new();
        namespace.install(&builtin_module());
        namespace
    }

    /// Installs every function-valued entry of `module` under both calling
    /// conventions.
    ///
    /// Degrades permissively: a non-object module or a module without
    /// function entries is a no-op that still reports its counts.
    pub fn install(&mut self, module: &Value) -> InstallReport {
        let mut report = InstallReport::default();
        let Some(entries) = module.as_object() else {
            return report;
        };
        let names = Self::install_set(module);
        report.ignored = entries.len() - names.len();
        for name in &names {
            let Some(entry) = entries.get(name) else {
                continue;
            };
            let Value::Function(capability) = entry else {
                continue;
            };
            // Static entry is always (re)assigned, kept for introspection
            // and direct calls.
            self.statics.insert(name.clone(), entry.clone());
            if self.methods.contains_key(name.as_str()) {
                report.skipped_existing += 1;
                continue;
            }
            self.methods.insert(name.clone(), capability.clone());
            report.installed += 1;
        }
        if self.state == NamespaceState::Uninitialized {
            self.state = NamespaceState::Active;
        }
        debug!(
            "event=module_install module=kernel status=ok installed={} skipped={} ignored={}",
            report.installed, report.skipped_existing, report.ignored
        );
        report
    }

    /// Function-valued keys of a module, ascending name order.
    ///
    /// The order is part of the observable contract: installation is
    /// deterministic for any given module regardless of declaration order.
    pub fn install_set(module: &Value) -> Vec<String> {
        let mut names = Vec::new();
        traverse::for_each(module, |entry, key| {
            if let EntryKey::Name(name) = key {
                if is_function(entry) {
                    names.push(name.to_string());
                }
            }
        });
        names.sort();
        names
    }

    /// Looks up a static entry.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.statics.get(name)
    }

    /// Looks up a chainable method.
    pub fn method(&self, name: &str) -> Option<&Capability> {
        self.methods.get(name)
    }

    /// Installed chainable method names, ascending.
    pub fn method_names(&self) -> Vec<&str> {
        self.methods.keys().map(String::as_str).collect()
    }

    /// Static calling convention: invokes an installed function by name.
    pub fn call(&self, name: &str, args: &[Value]) -> CapabilityResult {
        match self.statics.get(name) {
            Some(Value::Function(capability)) => capability.invoke(self, args),
            _ => Err(CapabilityError::UnknownMethod(name.to_string())),
        }
    }

    /// Wraps a value for the chainable calling convention.
    pub fn wrap(&self, value: impl Into<Value>) -> Wrapped<'_> {
        Wrapped::new(self, value.into())
    }

    pub fn is_active(&self) -> bool {
        self.state == NamespaceState::Active
    }

    pub fn state(&self) -> NamespaceState {
        self.state
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: Lazy<RwLock<Namespace>> = Lazy::new(|| RwLock::new(Namespace::bootstrap()));

/// Process-wide namespace singleton, bootstrapped on first access.
///
/// The lock exists to satisfy `Sync`; the execution model stays
/// single-threaded and synchronous, and concurrent installs remain a
/// caller-discipline requirement.
pub fn global() -> &'static RwLock<Namespace> {
    &GLOBAL
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vmap;

    fn noop_capability() -> Value {
        Value::Function(Capability::new(|_, _| Ok(Value::Null)))
    }

    #[test]
    fn new_namespace_is_uninitialized_with_guard_method() {
        let namespace = Namespace::new();
        assert_eq!(namespace.state(), NamespaceState::Uninitialized);
        assert!(namespace.method("install").is_some());
        assert!(namespace.get("install").is_none());
    }

    #[test]
    fn first_install_activates_the_namespace() {
        let mut namespace = Namespace::new();
        namespace.install(&vmap! { "noop" => noop_capability() });
        assert!(namespace.is_active());
    }

    #[test]
    fn install_set_is_sorted_and_filters_non_functions() {
        let module = vmap! {
            "zeta" => noop_capability(),
            "alpha" => noop_capability(),
            "data" => 42,
        };
        assert_eq!(Namespace::install_set(&module), vec!["alpha", "zeta"]);
    }

    #[test]
    fn install_degrades_permissively_for_non_object_modules() {
        let mut namespace = Namespace::new();
        let report = namespace.install(&Value::Number(3.0));
        assert_eq!(report, InstallReport::default());
        let report = namespace.install(&vmap! {});
        assert_eq!(report, InstallReport::default());
    }

    #[test]
    fn guard_entry_rejects_chainable_invocation() {
        let namespace = Namespace::bootstrap();
        let err = namespace
            .wrap(1)
            .invoke("install", &[])
            .expect_err("guard must reject chain call");
        assert_eq!(err, CapabilityError::ReservedMethod("install".to_string()));
    }
}
