//! Uniform traversal over mappings and sequences.
//!
//! # Responsibility
//! - Provide the dual object/array iteration every other component uses.
//! - Keep the permissive contract: non-traversable input is a no-op.
//!
//! # Invariants
//! - `some` short-circuits only on a result strictly equal to `Bool(false)`.
//! - Arrays iterate indices `0..len` in order; mappings iterate in key order.

use crate::value::{classify, TypeTag, Value};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Position of one entry during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKey<'a> {
    /// Array index.
    Index(usize),
    /// Mapping key.
    Name(&'a str),
}

impl EntryKey<'_> {
    /// Converts the key into a value for callback-style invocation.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Index(position) => Value::Number(*position as f64),
            Self::Name(name) => Value::String((*name).to_string()),
        }
    }
}

impl Display for EntryKey<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(position) => write!(f, "{position}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Visits every own entry of a mapping-like or sequence value.
///
/// Mapping-like collections (classified object or function) iterate their
/// entries; a bare function has none, so it visits nothing. Arrays iterate
/// indices in order. Any other classification is silently a no-op.
pub fn for_each(collection: &Value, mut visit: impl FnMut(&Value, EntryKey<'_>)) {
    match classify(collection) {
        TypeTag::Object | TypeTag::Function => {
            if let Value::Object(entries) = collection {
                for (name, value) in entries {
                    visit(value, EntryKey::Name(name));
                }
            }
        }
        TypeTag::Array => {
            if let Value::Array(items) = collection {
                for (position, value) in items.iter().enumerate() {
                    visit(value, EntryKey::Index(position));
                }
            }
        }
        _ => {}
    }
}

/// Applies the dual traversal, returning `false` as soon as the predicate
/// yields exactly `Bool(false)`.
///
/// Any other result, including other falsy-looking values such as
/// `Number(0.0)`, `String("")` or `Null`, does not short-circuit. Traversal
/// that completes, including over empty or non-traversable input, is
/// vacuously `true`.
pub fn some(collection: &Value, mut predicate: impl FnMut(&Value, EntryKey<'_>) -> Value) -> bool {
    match collection {
        Value::Object(entries) => {
            for (name, value) in entries {
                if predicate(value, EntryKey::Name(name)) == Value::Bool(false) {
                    return false;
                }
            }
            true
        }
        Value::Array(items) => {
            for (position, value) in items.iter().enumerate() {
                if predicate(value, EntryKey::Index(position)) == Value::Bool(false) {
                    return false;
                }
            }
            true
        }
        _ => true,
    }
}

/// Reports whether a container value has no entries.
///
/// Only an empty object or empty array is empty; every other value,
/// scalars included, reports `false`.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Object(entries) => entries.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Sort direction for [`sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Parses the `asc`/`desc` direction flags.
    pub fn parse(flag: &str) -> Result<SortOrder, SortError> {
        match flag {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            other => Err(SortError::UnknownOrder(other.to_string())),
        }
    }
}

/// Sort direction parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    UnknownOrder(String),
}

impl Display for SortError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownOrder(value) => {
                write!(f, "sort order must be `asc` or `desc`, got: {value}")
            }
        }
    }
}

impl Error for SortError {}

/// In-place bubble sort with early exit on a swap-free pass.
///
/// Numbers compare numerically, strings lexically; cross-type pairs
/// compare equal and keep their relative order.
pub fn sort(order: SortOrder, items: &mut [Value]) {
    if items.len() < 2 {
        return;
    }
    let passes = items.len() - 1;
    for pass in 0..passes {
        let mut swapped = false;
        for position in 0..passes - pass {
            if compare(&items[position], &items[position + 1]) == Ordering::Greater {
                items.swap(position, position + 1);
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }
    if order == SortOrder::Descending {
        items.reverse();
    }
}

fn compare(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}
