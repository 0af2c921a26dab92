//! Binding between attribute values and native Rust data.
//!
//! Native data goes in through `serde::Serialize`: it is serialized to a
//! JSON tree which is then decoded against the target type. Values come
//! back out through a `serde::Deserializer` over the wire tree, see
//! [`de`].

mod de;

pub use de::{BindError, WireDeserializer};

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use tfattr_interchange::WireValue;

use crate::diag::{Diagnostic, Diagnostics};
use crate::path::Path;
use crate::types::Type;
use crate::value::{
    AttrValue, BoolValue, DynamicValue, Int64Value, ListValue, MapValue, NumberValue,
    ObjectValue, SetValue, StringValue, TupleValue, Value,
};

/// How null and unknown values that a native target cannot represent are
/// handled when binding into native data.
///
/// `Option` targets always take null as `None`. Anything else is
/// "unhandled" and is an error unless the matching flag is set, in which
/// case the target receives the empty value of the wire type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BindOptions {
    pub unhandled_null_as_empty: bool,
    pub unhandled_unknown_as_empty: bool,
}

impl BindOptions {
    /// Both flags set to `allow`.
    pub fn allow_unhandled(allow: bool) -> Self {
        BindOptions {
            unhandled_null_as_empty: allow,
            unhandled_unknown_as_empty: allow,
        }
    }
}

// ──────────────────────────────────────────────
// Native → value
// ──────────────────────────────────────────────

/// Build a value of type `ty` from native data.
pub fn from_native<T>(ty: &Type, native: &T, path: &Path) -> Result<Value, Diagnostics>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_value(native).map_err(|e| {
        Diagnostics::from(conversion_error(
            path,
            format!("cannot serialize native value: {}", e),
        ))
    })?;

    let mut diags = Diagnostics::new();
    let value = from_json(ty, &json, path, &mut diags);
    if diags.has_error() {
        return Err(diags);
    }
    Ok(value)
}

fn from_json(ty: &Type, json: &serde_json::Value, path: &Path, diags: &mut Diagnostics) -> Value {
    use serde_json::Value as J;

    if json.is_null() {
        return ty.null_value();
    }

    let converted: Option<Value> = match (ty, json) {
        (Type::Bool, J::Bool(b)) => Some(BoolValue::new(*b).into()),
        (Type::Number, J::Number(_) | J::String(_)) => json_decimal(json).map(|d| NumberValue::new(d).into()),
        (Type::Int64, J::Number(n)) => n.as_i64().map(|i| Int64Value::new(i).into()),
        (Type::Int64, J::String(s)) => s.parse::<i64>().ok().map(|i| Int64Value::new(i).into()),
        (Type::String, J::String(s)) => Some(StringValue::new(s.clone()).into()),
        (Type::List(e), J::Array(items)) => {
            let elements = items
                .iter()
                .enumerate()
                .map(|(i, item)| from_json(e, item, &path.at_list_index(i), diags))
                .collect();
            Some(ListValue::known((**e).clone(), elements).into())
        }
        (Type::Set(e), J::Array(items)) => {
            let elements = items.iter().map(|item| from_json(e, item, path, diags)).collect();
            Some(SetValue::known((**e).clone(), elements).into())
        }
        (Type::Map(e), J::Object(items)) => {
            let elements = items
                .iter()
                .map(|(k, item)| (k.clone(), from_json(e, item, &path.at_map_key(k.clone()), diags)))
                .collect();
            Some(MapValue::known((**e).clone(), elements).into())
        }
        (Type::Object(attrs), J::Object(items)) => {
            if let Some(extra) = items.keys().find(|k| !attrs.contains_key(*k)) {
                diags.push(conversion_error(
                    &path.at_name(extra.clone()),
                    format!("native value has attribute {:?} not present in {}", extra, ty),
                ));
            }
            let attributes = attrs
                .iter()
                .map(|(name, attr_ty)| {
                    let v = match items.get(name) {
                        Some(item) => from_json(attr_ty, item, &path.at_name(name.clone()), diags),
                        None => attr_ty.null_value(),
                    };
                    (name.clone(), v)
                })
                .collect();
            Some(ObjectValue::known(attrs.clone(), attributes).into())
        }
        (Type::Tuple(elems), J::Array(items)) if elems.len() == items.len() => {
            let elements = elems
                .iter()
                .zip(items)
                .enumerate()
                .map(|(i, (t, item))| from_json(t, item, &path.at_tuple_index(i), diags))
                .collect();
            Some(TupleValue::known(elems.clone(), elements).into())
        }
        (Type::Dynamic, _) => infer_json(json).map(|v| DynamicValue::new(v).into()),
        _ => None,
    };

    converted.unwrap_or_else(|| {
        diags.push(conversion_error(
            path,
            format!("can't use {} as {}", json_kind(json), ty),
        ));
        ty.unknown_value()
    })
}

/// A value whose type follows the JSON shape: arrays become tuples and
/// objects become objects. `None` for JSON null.
fn infer_json(json: &serde_json::Value) -> Option<Value> {
    use serde_json::Value as J;

    let v = match json {
        J::Null => return None,
        J::Bool(b) => BoolValue::new(*b).into(),
        J::Number(_) => NumberValue::new(json_decimal(json)?).into(),
        J::String(s) => StringValue::new(s.clone()).into(),
        J::Array(items) => {
            let mut types = Vec::with_capacity(items.len());
            let mut elements = Vec::with_capacity(items.len());
            for item in items {
                let v = infer_json(item).unwrap_or_else(|| DynamicValue::null().into());
                types.push(v.attr_type());
                elements.push(v);
            }
            TupleValue::known(types, elements).into()
        }
        J::Object(items) => {
            let mut types = BTreeMap::new();
            let mut attributes = BTreeMap::new();
            for (k, item) in items {
                let v = infer_json(item).unwrap_or_else(|| DynamicValue::null().into());
                types.insert(k.clone(), v.attr_type());
                attributes.insert(k.clone(), v);
            }
            ObjectValue::known(types, attributes).into()
        }
    };
    Some(v)
}

fn json_decimal(json: &serde_json::Value) -> Option<Decimal> {
    let text = match json {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

pub(crate) fn conversion_error(path: &Path, message: impl std::fmt::Display) -> Diagnostic {
    let d = Diagnostic::error(
        "Value Conversion Error",
        format!(
            "An unexpected error was encountered trying to convert a value. \
             This is always an error in the provider. \
             Please report the following to the provider developer:\n\n{}",
            message
        ),
    );
    if path.is_empty() {
        d
    } else {
        d.with_path(path.clone())
    }
}

// ──────────────────────────────────────────────
// Value → native
// ──────────────────────────────────────────────

/// Decode a wire value into a native target.
pub fn into_native<T>(wire: &WireValue, options: BindOptions, path: &Path) -> Result<T, Diagnostics>
where
    T: DeserializeOwned,
{
    T::deserialize(WireDeserializer::new(wire, options, path.clone()))
        .map_err(|e| Diagnostics::from(e.into_diagnostic()))
}

/// Shared body of the `elements_as` family.
pub(crate) fn value_as<V, T>(value: &V, kind: &str, allow_unhandled: bool) -> Result<T, Diagnostics>
where
    V: AttrValue + ?Sized,
    T: DeserializeOwned,
{
    let wire = value.to_wire().map_err(|e| {
        Diagnostics::from(Diagnostic::error(
            format!("{} Element Conversion Error", kind),
            format!(
                "An unexpected error was encountered trying to convert {} elements. \
                 This is always an error in the provider. \
                 Please report the following to the provider developer:\n\n{}",
                kind.to_lowercase(),
                e
            ),
        ))
    })?;
    into_native(&wire, BindOptions::allow_unhandled(allow_unhandled), &Path::empty())
}

pub(crate) fn unexpected_kind(kind: &str, got: &Value) -> Diagnostic {
    Diagnostic::error(
        format!("Unable to Convert {} Value", kind),
        format!(
            "An unexpected result occurred when creating a {kind} from native data. \
             This is an issue with the provider and should be reported to the provider developers.\n\n\
             Expected {kind} value, received {} value: {}",
            got.kind(),
            got
        ),
    )
}
