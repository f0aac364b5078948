//! Deep merge engine: recursive rebuild, then copy onto the destination.
//!
//! # Responsibility
//! - Combine N source structures into a destination, left to right.
//! - Deep mode reconstructs every nested container so nothing merged into
//!   the destination shares structure with any source.
//!
//! # Invariants
//! - The destination is mutated in place; the caller keeps its binding.
//! - Container shape at each level follows the source's classification.
//! - Destination entries absent from a source survive a deep merge.
//! - Values own their trees, so cyclic input is unrepresentable and the
//!   engine does not defend against it.

use crate::value::traverse::EntryKey;
use crate::value::{classify, TypeTag, Value};
use std::collections::BTreeMap;

/// Merges `sources` into `destination`, left to right.
///
/// Shallow mode assigns each source entry directly; the last source wins on
/// key collision. Deep mode folds nested containers per the reconcile
/// algorithm below. A destination that is not an object or array is a
/// silent no-op, keeping the permissive glue-layer contract.
pub fn merge_into(deep: bool, destination: &mut Value, sources: &[Value]) {
    if !destination.is_container() {
        return;
    }
    for source in sources {
        if deep {
            // Rebuild first, then copy: the snapshot carries the merged
            // shape and the destination keeps its identity.
            let snapshot = reconcile(source, Some(&*destination));
            copy_entries(&snapshot, destination);
        } else {
            copy_entries(source, destination);
        }
    }
}

/// Recursively rebuilds `source` against a baseline.
///
/// The result is a brand-new container whose shape follows the source's
/// classification. Baseline entries are inherited first, then source
/// entries are folded in: containers recurse with the baseline's value at
/// the same key, simple values are taken outright.
fn reconcile(source: &Value, baseline: Option<&Value>) -> Value {
    let mut snapshot = match source {
        Value::Array(_) => Value::Array(Vec::new()),
        _ => Value::Object(BTreeMap::new()),
    };
    if let Some(baseline) = baseline {
        copy_entries(baseline, &mut snapshot);
    }
    match source {
        Value::Object(entries) => {
            for (name, value) in entries {
                let key = EntryKey::Name(name);
                let folded = fold_entry(value, baseline, &key);
                assign(&mut snapshot, &key, folded);
            }
        }
        Value::Array(items) => {
            for (position, value) in items.iter().enumerate() {
                let key = EntryKey::Index(position);
                let folded = fold_entry(value, baseline, &key);
                assign(&mut snapshot, &key, folded);
            }
        }
        _ => {}
    }
    snapshot
}

fn fold_entry(source_value: &Value, baseline: Option<&Value>, key: &EntryKey<'_>) -> Value {
    match classify(source_value) {
        TypeTag::Object | TypeTag::Array => {
            reconcile(source_value, baseline.and_then(|value| entry_of(value, key)))
        }
        _ => source_value.clone(),
    }
}

/// Shallow-copies every own entry of `source` into `destination`.
fn copy_entries(source: &Value, destination: &mut Value) {
    match source {
        Value::Object(entries) => {
            for (name, value) in entries {
                assign(destination, &EntryKey::Name(name), value.clone());
            }
        }
        Value::Array(items) => {
            for (position, value) in items.iter().enumerate() {
                assign(destination, &EntryKey::Index(position), value.clone());
            }
        }
        _ => {}
    }
}

fn assign(destination: &mut Value, key: &EntryKey<'_>, value: Value) {
    match (destination, key) {
        (Value::Object(entries), EntryKey::Name(name)) => {
            entries.insert((*name).to_string(), value);
        }
        (Value::Object(entries), EntryKey::Index(position)) => {
            entries.insert(position.to_string(), value);
        }
        (Value::Array(items), EntryKey::Index(position)) => {
            if *position < items.len() {
                items[*position] = value;
            } else {
                while items.len() < *position {
                    items.push(Value::Null);
                }
                items.push(value);
            }
        }
        // String keys cannot exist in an array container; when a deep merge
        // re-types a mapping to an array, those entries are dropped.
        (Value::Array(_), EntryKey::Name(_)) => {}
        _ => {}
    }
}

fn entry_of<'a>(value: &'a Value, key: &EntryKey<'_>) -> Option<&'a Value> {
    match key {
        EntryKey::Name(name) => value.get(name),
        EntryKey::Index(position) => value.index(*position),
    }
}
