//! Building values from native data and reading them back.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tfattr_core::{
    AttrValue, DynamicValue, ListValue, MapValue, ObjectValue, SetValue, StringValue, Type, Value,
};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Listener {
    protocol: String,
    port: i64,
    #[serde(default)]
    cidrs: Option<Vec<String>>,
}

fn listener_type() -> BTreeMap<String, Type> {
    [
        ("protocol".to_string(), Type::String),
        ("port".to_string(), Type::Int64),
        ("cidrs".to_string(), Type::list(Type::String)),
    ]
    .into_iter()
    .collect()
}

#[test]
fn list_from_native_strings() {
    let list = ListValue::from_native_must(Type::String, &vec!["a", "b"]);
    assert_eq!(
        list.elements(),
        vec![
            Value::from(StringValue::new("a")),
            Value::from(StringValue::new("b"))
        ]
    );
    let back: Vec<String> = list.elements_as(false).unwrap();
    assert_eq!(back, vec!["a", "b"]);
}

#[test]
fn list_from_native_with_wrong_element_kind() {
    let (list, diags) = ListValue::from_native(Type::Bool, &json!(["yes"]));
    assert_eq!(list, ListValue::unknown(Type::Bool));
    assert!(diags.has_error());
}

#[test]
fn null_native_becomes_null_value() {
    let none: Option<Vec<String>> = None;
    let list = ListValue::from_native_must(Type::String, &none);
    assert!(list.is_null());
    assert_eq!(list.element_type(), &Type::String);
}

#[test]
fn null_list_needs_allow_unhandled_for_vec_targets() {
    let list = ListValue::null(Type::String);
    let err = list.elements_as::<Vec<String>>(false).unwrap_err();
    assert_eq!(err.errors().next().unwrap().summary, "Value Conversion Error");

    let empty: Vec<String> = list.elements_as(true).unwrap();
    assert!(empty.is_empty());

    let opt: Option<Vec<String>> = list.elements_as(false).unwrap();
    assert_eq!(opt, None);
}

#[test]
fn unknown_elements_with_allow_unhandled() {
    let list = ListValue::new_must(
        Type::String,
        vec![StringValue::new("a").into(), StringValue::unknown().into()],
    );
    assert!(list.elements_as::<Vec<String>>(false).is_err());
    let out: Vec<String> = list.elements_as(true).unwrap();
    assert_eq!(out, vec!["a".to_string(), String::new()]);
}

#[test]
fn object_round_trip_through_struct() {
    let native = Listener {
        protocol: "tcp".into(),
        port: 443,
        cidrs: Some(vec!["10.0.0.0/8".into()]),
    };
    let obj = ObjectValue::from_native_must(listener_type(), &native);
    assert!(obj.attribute("cidrs").unwrap().is_known());

    let back: Listener = obj.attributes_as(false).unwrap();
    assert_eq!(back, native);
}

#[test]
fn object_missing_native_field_is_null() {
    let obj = ObjectValue::from_native_must(listener_type(), &json!({"protocol": "udp", "port": 53}));
    assert!(obj.attribute("cidrs").unwrap().is_null());
    let back: Listener = obj.attributes_as(false).unwrap();
    assert_eq!(back.cidrs, None);
}

#[test]
fn map_and_set_from_native() {
    let map = MapValue::from_native_must(Type::Int64, &json!({"a": 1, "b": 2}));
    let back: BTreeMap<String, i64> = map.elements_as(false).unwrap();
    assert_eq!(back, [("a".to_string(), 1), ("b".to_string(), 2)].into_iter().collect());

    let set = SetValue::from_native_must(Type::String, &["x", "y"]);
    let other = SetValue::from_native_must(Type::String, &["y", "x"]);
    assert_eq!(set, other);
}

#[test]
fn dynamic_list_from_native() {
    let list = ListValue::from_native_must(Type::Dynamic, &json!(["a", null]));
    assert_eq!(
        list.elements(),
        vec![
            Value::from(DynamicValue::new(StringValue::new("a"))),
            Value::from(DynamicValue::null()),
        ]
    );
    let out: Vec<Option<String>> = list.elements_as(false).unwrap();
    assert_eq!(out, vec![Some("a".to_string()), None]);
}

#[test]
#[should_panic(expected = "ListValue::from_native_must received error(s): Error | Value Conversion Error")]
fn from_native_must_panics() {
    ListValue::from_native_must(Type::Int64, &json!(["x"]));
}
