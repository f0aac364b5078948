use valise_core::{vmap, Capability, CapabilityError, Namespace, Value};

fn arithmetic_module() -> Value {
    vmap! {
        "plus" => Value::Function(Capability::new(|_, args| {
            let total: f64 = args.iter().filter_map(Value::as_number).sum();
            Ok(Value::Number(total))
        })),
        "concat" => Value::Function(Capability::new(|_, args| {
            let mut joined = String::new();
            for piece in args {
                if let Some(text) = piece.as_str() {
                    joined.push_str(text);
                }
            }
            Ok(Value::String(joined))
        })),
    }
}

#[test]
fn install_makes_every_function_visible_under_both_conventions() {
    let mut namespace = Namespace::new();
    let module = arithmetic_module();
    let report = namespace.install(&module);
    assert_eq!(report.installed, 2);

    for name in ["plus", "concat"] {
        assert!(namespace.get(name).is_some(), "static entry for {name}");
        assert!(namespace.method(name).is_some(), "chain entry for {name}");
    }

    let chained = namespace
        .wrap(2)
        .invoke("plus", &[Value::Number(3.0), Value::Number(4.0)])
        .expect("chained plus");
    let direct = namespace
        .call("plus", &[Value::Number(2.0), Value::Number(3.0), Value::Number(4.0)])
        .expect("static plus");
    assert_eq!(chained, Value::Number(9.0));
    assert_eq!(chained, direct);
}

#[test]
fn wrapped_invocation_matches_the_raw_module_function() {
    let mut namespace = Namespace::new();
    let module = arithmetic_module();
    namespace.install(&module);

    let raw = module
        .get("concat")
        .and_then(Value::as_function)
        .expect("module function")
        .invoke(
            &namespace,
            &[
                Value::String("kit".into()),
                Value::String("-".into()),
                Value::String("chain".into()),
            ],
        )
        .expect("raw invocation");
    let wrapped = namespace
        .wrap("kit")
        .invoke("concat", &[Value::String("-".into()), Value::String("chain".into())])
        .expect("wrapped invocation");
    assert_eq!(raw, wrapped);
}

#[test]
fn reinstall_keeps_chainable_behavior_but_reassigns_the_static_entry() {
    let mut namespace = Namespace::new();
    namespace.install(&arithmetic_module());

    let shadowing = vmap! {
        "plus" => Value::Function(Capability::new(|_, args| {
            let product: f64 = args.iter().filter_map(Value::as_number).product();
            Ok(Value::Number(product))
        })),
    };
    let report = namespace.install(&shadowing);
    assert_eq!(report.installed, 0);
    assert_eq!(report.skipped_existing, 1);

    // Chainable behavior is untouched: still the sum.
    let chained = namespace
        .wrap(2)
        .invoke("plus", &[Value::Number(3.0)])
        .expect("chained plus");
    assert_eq!(chained, Value::Number(5.0));

    // Static entry now resolves to the shadowing function: the product.
    let direct = namespace
        .call("plus", &[Value::Number(2.0), Value::Number(3.0)])
        .expect("static plus");
    assert_eq!(direct, Value::Number(6.0));
}

#[test]
fn install_ignores_non_function_entries_and_sorts_deterministically() {
    let module = vmap! {
        "zeta" => Value::Function(Capability::new(|_, _| Ok(Value::Null))),
        "alpha" => Value::Function(Capability::new(|_, _| Ok(Value::Null))),
        "answer" => 42,
        "label" => "not callable",
    };
    assert_eq!(Namespace::install_set(&module), vec!["alpha", "zeta"]);

    let mut namespace = Namespace::new();
    let report = namespace.install(&module);
    assert_eq!(report.installed, 2);
    assert_eq!(report.ignored, 2);
    assert!(namespace.get("answer").is_none());
}

#[test]
fn empty_module_install_is_a_no_op_but_still_activates() {
    let mut namespace = Namespace::new();
    assert!(!namespace.is_active());
    let report = namespace.install(&vmap! {});
    assert_eq!(report.installed, 0);
    assert!(namespace.is_active());
}

#[test]
fn bootstrap_exposes_the_builtin_surface() {
    let namespace = Namespace::bootstrap();
    assert!(namespace.is_active());
    for name in [
        "classify", "forEach", "some", "isEmpty", "merge", "method", "trim", "splitSpace",
        "locaSearch", "cookie", "sort", "timeHandle", "isObject", "isArray", "isRegExp",
    ] {
        assert!(namespace.get(name).is_some(), "builtin static entry {name}");
    }
    // The guard keeps its hand-registered slot.
    let err = namespace
        .wrap(Value::Null)
        .invoke("install", &[])
        .expect_err("guard rejects chain install");
    assert_eq!(err, CapabilityError::ReservedMethod("install".to_string()));
}

#[test]
fn global_namespace_is_bootstrapped_on_first_touch() {
    let namespace = valise_core::global().read().expect("global read lock");
    assert!(namespace.is_active());
    let tag = namespace
        .call("classify", &[Value::Bool(true)])
        .expect("classify through global");
    assert_eq!(tag, Value::String("boolean".into()));
}
