//! Builtin module: capability adapters for the whole public surface.
//!
//! # Responsibility
//! - Expose the native Rust API as installable, value-calling capabilities.
//! - Preserve the variadic calling conventions of the original surface
//!   (optional leading flags, optional keys) at the adapter layer.
//!
//! # Invariants
//! - Adapters never panic; contract violations surface as errors.
//! - Missing arguments read as null, keeping the permissive paths
//!   permissive and the strict paths (trim, sort order) strict.

use crate::kernel::namespace::Namespace;
use crate::kernel::{Capability, CapabilityError, CapabilityResult};
use crate::text;
use crate::time;
use crate::value::merge::merge_into;
use crate::value::traverse::{self, SortOrder};
use crate::value::{classify, TypeTag, Value};
use std::collections::BTreeMap;

static NULL: Value = Value::Null;

fn arg<'a>(args: &'a [Value], position: usize) -> &'a Value {
    args.get(position).unwrap_or(&NULL)
}

fn type_error(name: &str, expected: &str, got: &Value) -> CapabilityError {
    CapabilityError::Type {
        name: name.to_string(),
        expected: expected.to_string(),
        got: classify(got),
    }
}

/// Installed names of the generated classification predicates.
const PREDICATE_NAMES: &[(&str, TypeTag)] = &[
    ("isObject", TypeTag::Object),
    ("isArray", TypeTag::Array),
    ("isBoolean", TypeTag::Boolean),
    ("isFunction", TypeTag::Function),
    ("isString", TypeTag::String),
    ("isMath", TypeTag::Math),
    ("isDate", TypeTag::Date),
    ("isNull", TypeTag::Null),
    ("isRegExp", TypeTag::RegExp),
    ("isNumber", TypeTag::Number),
    ("isError", TypeTag::Error),
];

/// Builds the module that seeds a namespace with its own API.
///
/// Installing this module is what flips a fresh namespace to active; the
/// `install` entry collides with the hand-registered guard on purpose, so
/// the skip path is exercised at every bootstrap.
pub fn builtin_module() -> Value {
    let mut entries = BTreeMap::new();

    entries.insert(
        "classify".to_string(),
        capability(|_, args| Ok(Value::String(classify(arg(args, 0)).as_str().to_string()))),
    );

    // One predicate per tag; each closure binds its own copy of the tag.
    for (name, tag) in PREDICATE_NAMES {
        let tag = *tag;
        entries.insert(
            (*name).to_string(),
            capability(move |_, args| Ok(Value::Bool(classify(arg(args, 0)) == tag))),
        );
    }

    entries.insert(
        "forEach".to_string(),
        capability(|namespace, args| {
            let collection = arg(args, 0);
            let Value::Function(visit) = arg(args, 1) else {
                return Err(type_error("forEach", "function", arg(args, 1)));
            };
            let mut failure = None;
            traverse::for_each(collection, |value, key| {
                if failure.is_some() {
                    return;
                }
                if let Err(err) = visit.invoke(namespace, &[value.clone(), key.to_value()]) {
                    failure = Some(err);
                }
            });
            match failure {
                Some(err) => Err(err),
                None => Ok(Value::Null),
            }
        }),
    );

    entries.insert(
        "some".to_string(),
        capability(|namespace, args| {
            let collection = arg(args, 0);
            let Value::Function(predicate) = arg(args, 1) else {
                return Err(type_error("some", "function", arg(args, 1)));
            };
            let mut failure = None;
            let outcome = traverse::some(collection, |value, key| {
                match predicate.invoke(namespace, &[value.clone(), key.to_value()]) {
                    Ok(result) => result,
                    Err(err) => {
                        failure = Some(err);
                        // Stop the traversal; the error wins.
                        Value::Bool(false)
                    }
                }
            });
            match failure {
                Some(err) => Err(err),
                None => Ok(Value::Bool(outcome)),
            }
        }),
    );

    entries.insert(
        "isEmpty".to_string(),
        capability(|_, args| Ok(Value::Bool(traverse::is_empty(arg(args, 0))))),
    );

    entries.insert(
        "merge".to_string(),
        capability(|_, args| {
            let mut rest = args;
            let mut deep = false;
            if let Some(Value::Bool(flag)) = rest.first() {
                deep = *flag;
                rest = &rest[1..];
            }
            let mut destination = rest.first().cloned().unwrap_or(Value::Null);
            let sources = rest.get(1..).unwrap_or(&[]);
            merge_into(deep, &mut destination, sources);
            Ok(destination)
        }),
    );

    entries.insert(
        "method".to_string(),
        capability(|_, args| {
            let names = Namespace::install_set(arg(args, 0));
            Ok(Value::Array(names.into_iter().map(Value::String).collect()))
        }),
    );

    entries.insert(
        "trim".to_string(),
        capability(|_, args| {
            let strip_all = matches!(arg(args, 1), Value::Bool(true));
            let trimmed = text::trim(arg(args, 0), strip_all)?;
            Ok(Value::String(trimmed))
        }),
    );

    entries.insert(
        "splitSpace".to_string(),
        capability(|_, args| {
            let Value::String(input) = arg(args, 0) else {
                return Err(type_error("splitSpace", "string", arg(args, 0)));
            };
            let pieces = text::split_space(input);
            Ok(Value::Array(pieces.into_iter().map(Value::String).collect()))
        }),
    );

    entries.insert(
        "locaSearch".to_string(),
        capability(|_, args| {
            let key = arg(args, 0).as_str();
            let Value::String(address) = arg(args, 1) else {
                return Err(type_error("locaSearch", "string", arg(args, 1)));
            };
            Ok(text::query_params(key, address)?)
        }),
    );

    entries.insert(
        "cookie".to_string(),
        capability(|_, args| {
            let key = arg(args, 0).as_str();
            let Value::String(input) = arg(args, 1) else {
                return Err(type_error("cookie", "string", arg(args, 1)));
            };
            Ok(text::cookie_params(key, input)?)
        }),
    );

    entries.insert(
        "sort".to_string(),
        capability(|_, args| {
            let mut rest = args;
            let mut order = SortOrder::Ascending;
            if let Some(Value::String(flag)) = rest.first() {
                order = SortOrder::parse(flag)?;
                rest = &rest[1..];
            }
            let Some(Value::Array(items)) = rest.first() else {
                return Err(type_error("sort", "array", rest.first().unwrap_or(&NULL)));
            };
            let mut sorted = items.clone();
            traverse::sort(order, &mut sorted);
            Ok(Value::Array(sorted))
        }),
    );

    entries.insert(
        "timeHandle".to_string(),
        capability(|_, args| {
            let Value::String(input) = arg(args, 0) else {
                return Err(type_error("timeHandle", "string", arg(args, 0)));
            };
            let Value::Number(days) = arg(args, 1) else {
                return Err(type_error("timeHandle", "number", arg(args, 1)));
            };
            let separator = arg(args, 2).as_str();
            let shifted = time::shift_date(input, *days as i64, separator)?;
            Ok(Value::String(shifted))
        }),
    );

    // Collides with the hand-registered guard: the chainable entry is
    // skipped at install time, only the static entry lands.
    entries.insert(
        "install".to_string(),
        capability(|_, _| Err(CapabilityError::ReservedMethod("install".to_string()))),
    );

    Value::Object(entries)
}

fn capability(
    call: impl Fn(&Namespace, &[Value]) -> CapabilityResult + Send + Sync + 'static,
) -> Value {
    Value::Function(Capability::new(call))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{vlist, vmap};

    #[test]
    fn builtin_module_is_function_valued_throughout() {
        let module = builtin_module();
        let entries = module.as_object().expect("builtin module is an object");
        assert!(entries.values().all(|entry| entry.as_function().is_some()));
        assert_eq!(Namespace::install_set(&module).len(), entries.len());
    }

    #[test]
    fn classify_capability_reports_signature_strings() {
        let namespace = Namespace::bootstrap();
        let tag = namespace
            .call("classify", &[vlist![1, 2]])
            .expect("classify call");
        assert_eq!(tag, Value::String("array".into()));
        let tag = namespace.call("classify", &[vmap! {}]).expect("classify call");
        assert_eq!(tag, Value::String("object".into()));
    }

    #[test]
    fn predicate_capabilities_bind_their_own_tags() {
        let namespace = Namespace::bootstrap();
        let yes = namespace
            .call("isArray", &[vlist![1]])
            .expect("isArray call");
        let no = namespace.call("isObject", &[vlist![1]]).expect("isObject call");
        assert_eq!(yes, Value::Bool(true));
        assert_eq!(no, Value::Bool(false));
    }

    #[test]
    fn merge_capability_consumes_a_leading_deep_flag() {
        let namespace = Namespace::bootstrap();
        let merged = namespace
            .call(
                "merge",
                &[
                    Value::Bool(true),
                    vmap! { "e" => vmap! { "f" => 100 } },
                    vmap! { "d" => 22 },
                ],
            )
            .expect("deep merge call");
        assert_eq!(
            merged.get("e").and_then(|v| v.get("f")),
            Some(&Value::Number(100.0))
        );
        assert_eq!(merged.get("d"), Some(&Value::Number(22.0)));
    }

    #[test]
    fn sort_capability_parses_the_direction_flag() {
        let namespace = Namespace::bootstrap();
        let sorted = namespace
            .call("sort", &[Value::String("desc".into()), vlist![1, 3, 2]])
            .expect("sort call");
        assert_eq!(sorted, vlist![3, 2, 1]);

        let err = namespace
            .call("sort", &[Value::String("sideways".into()), vlist![1]])
            .expect_err("unknown direction must fail");
        assert!(matches!(err, CapabilityError::Sort(_)));
    }
}
