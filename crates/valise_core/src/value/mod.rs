//! Dynamic value tree and runtime type classification.
//!
//! # Responsibility
//! - Define the owned [`Value`] tree every toolkit operation works on.
//! - Classify any value into the closed [`TypeTag`] set.
//! - Generate one predicate per tag from the tag/signature table.
//!
//! # Invariants
//! - `classify` is total and pure: every value maps to exactly one tag.
//! - `Value` owns its children; reference cycles are unrepresentable.
//! - The tag set is closed; adding a variant requires extending the table.

pub mod json;
pub mod merge;
pub mod traverse;

use crate::kernel::Capability;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// An owned dynamic value.
///
/// Numbers are stored as `f64`; dates as epoch milliseconds. A `Function`
/// holds an installable capability, which is how module exports carry
/// callable entries through the extension kernel.
#[derive(Debug, Clone)]
pub enum Value {
    /// Null/missing value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit floating point number (finite or not, see [`TypeTag::Math`]).
    Number(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered sequence.
    Array(Vec<Value>),
    /// Key/value mapping with deterministic key order.
    Object(BTreeMap<String, Value>),
    /// Callable capability, the function-valued module entry.
    Function(Capability),
    /// Timestamp as milliseconds since Unix epoch.
    Date(i64),
    /// Compiled regular expression.
    Regex(Arc<Regex>),
    /// Error surrogate carrying a message.
    Error(String),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            // Functions compare by registration identity, not behavior.
            (Value::Function(a), Value::Function(b)) => a.same_registration(b),
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Regex(a), Value::Regex(b)) => a.as_str() == b.as_str(),
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Get the mapping entries if this is an `Object` value.
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Get the sequence items if this is an `Array` value.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get as string slice if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    /// Get as boolean if this is a `Bool` value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Get as number if this is a `Number` value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// Get the capability if this is a `Function` value.
    pub fn as_function(&self) -> Option<&Capability> {
        match self {
            Value::Function(capability) => Some(capability),
            _ => None,
        }
    }

    /// Looks up a mapping entry by name. `None` for every non-object value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|entries| entries.get(key))
    }

    /// Looks up a sequence item by index. `None` for every non-array value.
    pub fn index(&self, position: usize) -> Option<&Value> {
        self.as_array().and_then(|items| items.get(position))
    }

    /// Returns whether the value can hold entries (object or array).
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(flag) => write!(f, "{flag}"),
            Value::Number(number) => write!(f, "{number}"),
            Value::String(text) => write!(f, "\"{text}\""),
            Value::Array(items) => {
                write!(f, "[")?;
                for (position, item) in items.iter().enumerate() {
                    if position > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Object(entries) => {
                write!(f, "{{")?;
                for (position, (key, value)) in entries.iter().enumerate() {
                    if position > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            Value::Function(_) => write!(f, "<capability>"),
            Value::Date(epoch_ms) => write!(f, "ts:{epoch_ms}"),
            Value::Regex(pattern) => write!(f, "/{}/", pattern.as_str()),
            Value::Error(message) => write!(f, "error:{message}"),
        }
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Bool(flag)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::Number(number)
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Value::Number(number as f64)
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Value::Number(f64::from(number))
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::String(text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::String(text.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Value::Object(entries)
    }
}

impl From<Capability> for Value {
    fn from(capability: Capability) -> Self {
        Value::Function(capability)
    }
}

/// Closed set of runtime classifications the toolkit recognizes.
///
/// `Math` is the numeric-special tag: non-finite numbers (NaN, ±infinity)
/// classify as `Math`, finite ones as `Number`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    Object,
    Array,
    Boolean,
    Function,
    String,
    Math,
    Date,
    Null,
    RegExp,
    Number,
    Error,
}

/// Fixed tag/signature table backing classification and the generated
/// predicates. One entry per tag, eleven in total.
pub const TAG_SIGNATURES: &[(TypeTag, &str)] = &[
    (TypeTag::Object, "object"),
    (TypeTag::Array, "array"),
    (TypeTag::Boolean, "boolean"),
    (TypeTag::Function, "function"),
    (TypeTag::String, "string"),
    (TypeTag::Math, "math"),
    (TypeTag::Date, "date"),
    (TypeTag::Null, "null"),
    (TypeTag::RegExp, "regexp"),
    (TypeTag::Number, "number"),
    (TypeTag::Error, "error"),
];

impl TypeTag {
    /// Stable lowercase signature string for this tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::Boolean => "boolean",
            Self::Function => "function",
            Self::String => "string",
            Self::Math => "math",
            Self::Date => "date",
            Self::Null => "null",
            Self::RegExp => "regexp",
            Self::Number => "number",
            Self::Error => "error",
        }
    }

    /// Parses a tag from its signature string.
    pub fn parse(signature: &str) -> Option<TypeTag> {
        TAG_SIGNATURES
            .iter()
            .find(|(_, candidate)| *candidate == signature)
            .map(|(tag, _)| *tag)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a value to its type tag. Total: every value classifies to
/// exactly one of the eleven tags.
pub fn classify(value: &Value) -> TypeTag {
    match value {
        Value::Object(_) => TypeTag::Object,
        Value::Array(_) => TypeTag::Array,
        Value::Bool(_) => TypeTag::Boolean,
        Value::Function(_) => TypeTag::Function,
        Value::String(_) => TypeTag::String,
        Value::Number(number) if !number.is_finite() => TypeTag::Math,
        Value::Number(_) => TypeTag::Number,
        Value::Date(_) => TypeTag::Date,
        Value::Null => TypeTag::Null,
        Value::Regex(_) => TypeTag::RegExp,
        Value::Error(_) => TypeTag::Error,
    }
}

// Each expansion binds its own tag, so no predicate can observe another
// predicate's tag.
macro_rules! classify_predicates {
    ($($(#[$meta:meta])* $name:ident => $tag:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(value: &Value) -> bool {
                classify(value) == TypeTag::$tag
            }
        )+
    };
}

classify_predicates! {
    /// True when `value` classifies as a key/value mapping.
    is_object => Object,
    /// True when `value` classifies as an ordered sequence.
    is_array => Array,
    /// True when `value` classifies as a boolean.
    is_boolean => Boolean,
    /// True when `value` classifies as a callable capability.
    is_function => Function,
    /// True when `value` classifies as a string.
    is_string => String,
    /// True when `value` classifies as numeric-special (non-finite).
    is_math => Math,
    /// True when `value` classifies as an epoch timestamp.
    is_date => Date,
    /// True when `value` classifies as null.
    is_null => Null,
    /// True when `value` classifies as a regular expression.
    is_regexp => RegExp,
    /// True when `value` classifies as a finite number.
    is_number => Number,
    /// True when `value` classifies as an error surrogate.
    is_error => Error,
}

/// Builds an object value from `key => value` pairs.
#[macro_export]
macro_rules! vmap {
    () => {
        $crate::value::Value::Object(std::collections::BTreeMap::new())
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut entries = std::collections::BTreeMap::new();
        $(
            entries.insert($key.to_string(), $crate::value::Value::from($value));
        )+
        $crate::value::Value::Object(entries)
    }};
}

/// Builds an array value from a list of convertible items.
#[macro_export]
macro_rules! vlist {
    ($($value:expr),* $(,)?) => {
        $crate::value::Value::Array(vec![$($crate::value::Value::from($value)),*])
    };
}
