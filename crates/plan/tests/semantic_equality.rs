//! Semantic equality across value states and composite kinds.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tfattr_core::{
    BoolValue, Diagnostic, Diagnostics, DynamicValue, ListValue, MapValue, ObjectValue, Path,
    SetValue, Severity, StringValue, TupleValue, Type, Value,
};
use tfattr_plan::{
    value_semantic_equality, SemanticEqualityRegistry, SemanticEqualityRequest, SemanticEquals,
};

/// Treats strings as equal ignoring ASCII case and counts its calls.
#[derive(Default)]
struct CaseInsensitive {
    calls: AtomicUsize,
}

impl SemanticEquals for CaseInsensitive {
    fn semantic_equals(&self, prior: &Value, proposed: &Value) -> (bool, Diagnostics) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (Value::String(p), Value::String(n)) = (prior, proposed) else {
            return (false, Diagnostics::new());
        };
        let equal = match (p.value(), n.value()) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        };
        (equal, Diagnostics::new())
    }
}

fn s(v: &str) -> Value {
    StringValue::new(v).into()
}

fn registry() -> SemanticEqualityRegistry {
    SemanticEqualityRegistry::new().with(Type::String, CaseInsensitive::default())
}

fn run(registry: &SemanticEqualityRegistry, prior: Value, proposed: Value) -> (Value, Diagnostics) {
    let resp = value_semantic_equality(
        registry,
        &SemanticEqualityRequest {
            path: Path::root("attr"),
            prior_value: prior,
            proposed_new_value: proposed,
        },
    );
    (resp.new_value, resp.diagnostics)
}

#[test]
fn null_and_unknown_are_never_compared() {
    let counted = Arc::new(CaseInsensitive::default());
    let shared = Arc::clone(&counted);
    let registry = SemanticEqualityRegistry::new().with(
        Type::String,
        move |p: &Value, n: &Value| shared.semantic_equals(p, n),
    );

    let cases = [
        (StringValue::null().into(), s("a")),
        (s("a"), StringValue::unknown().into()),
        (StringValue::unknown().into(), StringValue::null().into()),
    ];
    for (prior, proposed) in cases {
        let (new_value, diags) = run(&registry, prior, proposed.clone());
        assert_eq!(new_value, proposed);
        assert!(diags.is_empty());
    }
    assert_eq!(counted.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn unregistered_type_keeps_proposed_value() {
    let (new_value, _) = run(&SemanticEqualityRegistry::new(), s("A"), s("a"));
    assert_eq!(new_value, s("a"));
}

#[test]
fn diagnostics_accumulate_without_overriding_the_result() {
    let registry = SemanticEqualityRegistry::new().with(Type::String, |_: &Value, _: &Value| {
        let mut diags = Diagnostics::new();
        diags.add_warning("Normalized", "value was normalized");
        diags.push(Diagnostic::error("Comparison Failed", "partial comparison"));
        (true, diags)
    });
    let (new_value, diags) = run(&registry, s("A"), s("a"));
    assert_eq!(new_value, s("A"));
    assert_eq!(diags.len(), 2);
    assert_eq!(diags.iter().next().unwrap().severity, Severity::Warning);
    assert!(diags.has_error());
}

#[test]
fn values_of_different_types_are_never_compared() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = SemanticEqualityRegistry::new();
    for ty in [Type::String, Type::Bool] {
        let counter = Arc::clone(&calls);
        registry.register(ty, move |_: &Value, _: &Value| {
            counter.fetch_add(1, Ordering::SeqCst);
            (true, Diagnostics::new())
        });
    }
    let (new_value, _) = run(&registry, BoolValue::new(true).into(), s("true"));
    assert_eq!(new_value, s("true"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn capability_returning_false_keeps_proposed() {
    let (new_value, _) = run(&registry(), s("a"), s("b"));
    assert_eq!(new_value, s("b"));
}

#[test]
fn list_elements_are_compared_by_index() {
    let prior = ListValue::new_must(Type::String, vec![s("Web"), s("db")]);
    let proposed = ListValue::new_must(Type::String, vec![s("web"), s("cache")]);
    let (new_value, diags) = run(&registry(), prior.into(), proposed.into());
    assert!(diags.is_empty());
    assert_eq!(
        new_value,
        Value::from(ListValue::new_must(Type::String, vec![s("Web"), s("cache")]))
    );
}

#[test]
fn capability_on_the_collection_type_wins() {
    let registry = registry().with(Type::list(Type::String), |_: &Value, _: &Value| {
        (true, Diagnostics::new())
    });
    let prior: Value = ListValue::new_must(Type::String, vec![s("x")]).into();
    let proposed: Value = ListValue::new_must(Type::String, vec![s("y"), s("z")]).into();
    let (new_value, _) = run(&registry, prior.clone(), proposed);
    assert_eq!(new_value, prior);
}

#[test]
fn map_and_object_elements_are_compared_by_key() {
    fn map(pairs: &[(&str, &str)]) -> Value {
        let elements: BTreeMap<String, Value> =
            pairs.iter().map(|(k, v)| (k.to_string(), s(v))).collect();
        MapValue::new_must(Type::String, elements).into()
    }

    let (new_value, _) = run(
        &registry(),
        map(&[("env", "PROD"), ("old", "x")]),
        map(&[("env", "prod"), ("new", "y")]),
    );
    assert_eq!(new_value, map(&[("env", "PROD"), ("new", "y")]));

    let attr_types: BTreeMap<String, Type> = [
        ("name".to_string(), Type::String),
        ("tags".to_string(), Type::list(Type::String)),
    ]
    .into_iter()
    .collect();
    let object = |name: &str, tag: &str| -> Value {
        let attrs = [
            ("name".to_string(), s(name)),
            (
                "tags".to_string(),
                ListValue::new_must(Type::String, vec![s(tag)]).into(),
            ),
        ]
        .into_iter()
        .collect();
        ObjectValue::new_must(attr_types.clone(), attrs).into()
    };
    let (new_value, _) = run(&registry(), object("Web", "A"), object("web", "b"));
    assert_eq!(new_value, object("Web", "b"));
}

#[test]
fn tuple_and_dynamic_values_are_descended_into() {
    let types = vec![Type::String, Type::String];
    let prior: Value = TupleValue::new_must(types.clone(), vec![s("A"), s("B")]).into();
    let proposed: Value = TupleValue::new_must(types.clone(), vec![s("a"), s("c")]).into();
    let (new_value, _) = run(&registry(), prior, proposed);
    assert_eq!(
        new_value,
        Value::from(TupleValue::new_must(types, vec![s("A"), s("c")]))
    );

    let (new_value, _) = run(
        &registry(),
        DynamicValue::new(StringValue::new("X")).into(),
        DynamicValue::new(StringValue::new("x")).into(),
    );
    assert_eq!(new_value, Value::from(DynamicValue::new(StringValue::new("X"))));
}

#[test]
fn set_elements_are_not_descended_into() {
    let prior: Value = SetValue::new_must(Type::String, vec![s("A")]).into();
    let proposed: Value = SetValue::new_must(Type::String, vec![s("a")]).into();
    let (new_value, _) = run(&registry(), prior, proposed.clone());
    assert_eq!(new_value, proposed);
}

#[test]
fn nested_unknown_elements_stay_unknown() {
    let prior: Value = ListValue::new_must(Type::String, vec![s("A")]).into();
    let proposed: Value =
        ListValue::new_must(Type::String, vec![StringValue::unknown().into()]).into();
    let (new_value, _) = run(&registry(), prior, proposed.clone());
    assert_eq!(new_value, proposed);
}
