//! Collection construction, equality, and wire output as seen from
//! outside the crate.

use serde_json::json;
use tfattr_core::interchange::to_json;
use tfattr_core::{
    AttrValue, BoolValue, DynamicValue, ListValue, NumberValue, Path, SetValue, StringValue,
    TupleValue, Type, Value,
};

fn s(v: &str) -> Value {
    StringValue::new(v).into()
}

#[test]
fn list_with_number_in_string_list() {
    let (list, diags) = ListValue::new(Type::String, vec![s("a"), NumberValue::new(7).into()]);

    assert_eq!(list, ListValue::unknown(Type::String));
    assert_eq!(diags.len(), 1);
    let d = diags.errors().next().unwrap();
    assert_eq!(d.summary, "Invalid List Element Type");
    assert_eq!(d.path, Some(Path::empty().at_list_index(1)));
    assert!(d.detail.contains("List Element Type: string"));
    assert!(d.detail.contains("List Index (1) Element Type: number"));
}

#[test]
fn every_mismatch_is_reported() {
    let (_, diags) = ListValue::new(
        Type::Bool,
        vec![s("a"), BoolValue::new(true).into(), s("b")],
    );
    let paths: Vec<_> = diags.errors().map(|d| d.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            Some(Path::empty().at_list_index(0)),
            Some(Path::empty().at_list_index(2)),
        ]
    );
}

#[test]
fn dynamic_list_resolves_element_type_on_the_wire() {
    let list = ListValue::new_must(
        Type::Dynamic,
        vec![
            DynamicValue::unknown().into(),
            DynamicValue::new(StringValue::new("x")).into(),
        ],
    );
    let wire = list.to_wire().unwrap();
    assert_eq!(
        to_json(&wire),
        json!({
            "type": ["list", "string"],
            "value": [
                {"type": "string", "unknown": true},
                {"type": "string", "value": "x"},
            ]
        })
    );
}

#[test]
fn dynamic_null_list_keeps_placeholder() {
    let wire = ListValue::null(Type::Dynamic).to_wire().unwrap();
    assert_eq!(to_json(&wire), json!({"type": ["list", "dynamic"], "null": true}));
}

#[test]
fn state_equality_law() {
    for ty in [Type::String, Type::list(Type::Bool)] {
        assert_eq!(ListValue::null(ty.clone()), ListValue::null(ty.clone()));
        assert_eq!(ListValue::unknown(ty.clone()), ListValue::unknown(ty.clone()));
        assert_ne!(ListValue::null(ty.clone()), ListValue::unknown(ty.clone()));
        assert_ne!(ListValue::new_must(ty.clone(), vec![]), ListValue::null(ty.clone()));
        assert_ne!(ListValue::new_must(ty.clone(), vec![]), ListValue::unknown(ty));
    }
}

#[test]
fn list_and_set_with_same_elements_differ() {
    let list: Value = ListValue::new_must(Type::String, vec![s("a")]).into();
    let set: Value = SetValue::new_must(Type::String, vec![s("a")]).into();
    assert_ne!(list, set);
}

#[test]
fn elements_returns_an_independent_copy() {
    let list = ListValue::new_must(Type::String, vec![s("a")]);
    let mut copy = list.elements();
    copy.push(s("b"));
    assert_eq!(list.elements(), vec![s("a")]);
}

#[test]
fn rendering_for_logs() {
    let nested = ListValue::new_must(
        Type::tuple(vec![Type::String, Type::Bool]),
        vec![TupleValue::new_must(
            vec![Type::String, Type::Bool],
            vec![s("a"), BoolValue::unknown().into()],
        )
        .into()],
    );
    assert_eq!(nested.to_string(), "[[\"a\",<unknown>]]");
    assert_eq!(nested.attr_type().to_string(), "list[tuple[string,bool]]");
}
