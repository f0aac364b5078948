//! Observable data model backed by the deep merge engine.
//!
//! # Responsibility
//! - Hold one options snapshot (parameters, configuration, segments).
//! - Apply partial updates through deep merge and notify on real change.
//!
//! # Invariants
//! - `set` never aliases patch structure into the snapshot.
//! - The change hook fires only when some patch entry differs from the
//!   current snapshot (strict-false short circuit of the comparison).

use crate::value::merge::merge_into;
use crate::value::traverse::{self, EntryKey};
use crate::value::Value;
use log::debug;
use std::sync::Arc;

type ChangeHook = Arc<dyn Fn(&Value) + Send + Sync>;

/// Data model holding an options snapshot.
#[derive(Clone)]
pub struct Model {
    options: Value,
    on_change: Option<ChangeHook>,
}

impl Model {
    /// Creates a model around an initial options value.
    pub fn new(options: Value) -> Self {
        Self {
            options,
            on_change: None,
        }
    }

    /// The raw snapshot, for callers that read it directly.
    pub fn snapshot(&self) -> &Value {
        &self.options
    }

    /// Reads one option by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Registers the change observer.
    pub fn on_change(&mut self, hook: impl Fn(&Value) + Send + Sync + 'static) {
        self.on_change = Some(Arc::new(hook));
    }

    /// Deep-merges a partial update into the snapshot.
    ///
    /// The change hook fires only when the patch actually alters some
    /// entry; re-setting identical values is silent. Returns the merged
    /// snapshot.
    pub fn set(&mut self, patch: &Value) -> Value {
        let unchanged = traverse::some(patch, |value, key| {
            let current = match key {
                EntryKey::Name(name) => self.options.get(name),
                EntryKey::Index(position) => self.options.index(position),
            };
            Value::Bool(current == Some(value))
        });
        merge_into(true, &mut self.options, std::slice::from_ref(patch));
        if !unchanged {
            debug!("event=model_change module=mvc status=ok");
            if let Some(hook) = &self.on_change {
                hook(&self.options);
            }
        }
        self.options.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vmap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn set_deep_merges_partial_updates() {
        let mut model = Model::new(vmap! { "a" => 1, "nested" => vmap! { "kept" => true } });
        let merged = model.set(&vmap! { "nested" => vmap! { "added" => 2 } });
        assert_eq!(merged.get("a"), Some(&Value::Number(1.0)));
        let nested = merged.get("nested").expect("nested entry");
        assert_eq!(nested.get("kept"), Some(&Value::Bool(true)));
        assert_eq!(nested.get("added"), Some(&Value::Number(2.0)));
    }

    #[test]
    fn change_hook_fires_only_on_real_change() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let mut model = Model::new(vmap! { "a" => 1, "b" => 2 });
        model.on_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        model.set(&vmap! { "a" => 1 });
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        model.set(&vmap! { "a" => 5 });
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // A patch key missing from the snapshot is a change too.
        model.set(&vmap! { "c" => 3 });
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn get_reads_single_options() {
        let model = Model::new(vmap! { "a" => 1 });
        assert_eq!(model.get("a"), Some(&Value::Number(1.0)));
        assert_eq!(model.get("zzz"), None);
    }
}
