//! Controller: a named action table and callback queue delivery.
//!
//! # Responsibility
//! - Hold business-logic actions under stable names.
//! - Resolve a queue of action names and deliver one shared argument list.
//!
//! # Invariants
//! - Queue entries that resolve to nothing are skipped with a notice, not
//!   an error (permissive glue contract).
//! - Delivery order follows the queue, not the table.

use crate::value::Value;
use log::warn;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One registered controller action.
pub type Action = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// Named action registry.
#[derive(Default)]
pub struct Controller {
    actions: BTreeMap<String, Action>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one action under a stable name. Re-registering a name
    /// replaces the previous action.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        action: impl Fn(&[Value]) -> Value + Send + Sync + 'static,
    ) {
        self.actions.insert(name.into(), Arc::new(action));
    }

    /// Registered action names, ascending.
    pub fn action_names(&self) -> Vec<&str> {
        self.actions.keys().map(String::as_str).collect()
    }

    /// Resolves a queue of action names and delivers `args` to each.
    ///
    /// Unknown names are skipped with a log notice; results of the
    /// resolved actions are collected in queue order.
    pub fn run_queue(&self, queue: &[&str], args: &[Value]) -> Vec<Value> {
        let mut resolved = Vec::with_capacity(queue.len());
        for name in queue {
            match self.actions.get(*name) {
                Some(action) => resolved.push(Arc::clone(action)),
                None => warn!("event=queue_skip module=mvc status=ignored action={name}"),
            }
        }
        deliver(&resolved, args)
    }
}

fn deliver(actions: &[Action], args: &[Value]) -> Vec<Value> {
    actions.iter().map(|action| action(args)).collect()
}
