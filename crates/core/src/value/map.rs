//! Map values: string keys to elements of a single element type.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use tfattr_interchange::{WireBody, WirePayload, WireType, WireValue};

use super::{AttrValue, Body, Value, ValueState};
use crate::convert::{self, ConversionError};
use crate::diag::{self, Diagnostics};
use crate::path::Path;
use crate::reflect;
use crate::types::Type;

/// A map from string keys to values of one type.
#[derive(Debug, Clone, PartialEq)]
pub struct MapValue {
    element_type: Type,
    body: Body<BTreeMap<String, Value>>,
}

impl MapValue {
    pub fn null(element_type: Type) -> Self {
        MapValue {
            element_type,
            body: Body::Null,
        }
    }

    pub fn unknown(element_type: Type) -> Self {
        MapValue {
            element_type,
            body: Body::Unknown,
        }
    }

    /// A known map. Mismatched elements are reported per key and the
    /// result is an unknown map of `element_type`.
    pub fn new(element_type: Type, elements: BTreeMap<String, Value>) -> (Self, Diagnostics) {
        let mut diags = Diagnostics::new();

        for (key, element) in &elements {
            let got = element.attr_type();
            if got != element_type {
                diags.add_attribute_error(
                    Path::empty().at_map_key(key.clone()),
                    "Invalid Map Element Type",
                    format!(
                        "While creating a Map value, an invalid element was detected. \
                         A Map must use the single, given element type. \
                         This is always an issue with the provider and should be reported to the provider developers.\n\n\
                         Map Element Type: {}\n\
                         Map Key ({}) Element Type: {}",
                        element_type, key, got
                    ),
                );
            }
        }

        if diags.has_error() {
            return (MapValue::unknown(element_type), diags);
        }

        (MapValue::known(element_type, elements), diags)
    }

    pub fn from_native<T>(element_type: Type, elements: &T) -> (Self, Diagnostics)
    where
        T: Serialize + ?Sized,
    {
        let target = Type::map(element_type.clone());
        match reflect::from_native(&target, elements, &Path::empty()) {
            Ok(Value::Map(map)) => (map, Diagnostics::new()),
            Ok(other) => (
                MapValue::unknown(element_type),
                Diagnostics::from(reflect::unexpected_kind("Map", &other)),
            ),
            Err(diags) => (MapValue::unknown(element_type), diags),
        }
    }

    pub(crate) fn known(element_type: Type, elements: BTreeMap<String, Value>) -> Self {
        MapValue {
            element_type,
            body: Body::Known(elements),
        }
    }

    pub fn elements(&self) -> BTreeMap<String, Value> {
        self.body.known().cloned().unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.known().and_then(|m| m.get(key))
    }

    pub fn element_type(&self) -> &Type {
        &self.element_type
    }

    pub fn elements_as<T: DeserializeOwned>(&self, allow_unhandled: bool) -> Result<T, Diagnostics> {
        reflect::value_as(self, "Map", allow_unhandled)
    }

    pub(crate) fn from_wire(element_type: &Type, wire: &WireValue) -> Result<Self, ConversionError> {
        match wire.body() {
            WireBody::Null => Ok(MapValue::null(element_type.clone())),
            WireBody::Unknown => Ok(MapValue::unknown(element_type.clone())),
            WireBody::Known(WirePayload::Keyed(items)) => {
                let mut elements = BTreeMap::new();
                for (key, item) in items {
                    elements.insert(key.clone(), element_type.value_from_wire(item)?);
                }
                Ok(MapValue::known(element_type.clone(), elements))
            }
            WireBody::Known(p) => Err(ConversionError::Payload {
                expected: Type::map(element_type.clone()),
                kind: p.kind(),
            }),
        }
    }
}

// ── Panicking constructors ──────────────────────────────────────────

impl MapValue {
    #[track_caller]
    pub fn new_must(element_type: Type, elements: BTreeMap<String, Value>) -> Self {
        let (map, diags) = MapValue::new(element_type, elements);
        diag::must("MapValue::new_must", &diags);
        map
    }

    #[track_caller]
    pub fn from_native_must<T>(element_type: Type, elements: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        let (map, diags) = MapValue::from_native(element_type, elements);
        diag::must("MapValue::from_native_must", &diags);
        map
    }
}

impl AttrValue for MapValue {
    fn attr_type(&self) -> Type {
        Type::map(self.element_type.clone())
    }

    fn state(&self) -> ValueState {
        self.body.state()
    }

    fn to_wire(&self) -> Result<WireValue, ConversionError> {
        let map_type = self.attr_type().wire_type();
        match &self.body {
            Body::Known(elements) => {
                let (element_wire, values) =
                    convert::elements_to_wire(&self.element_type, elements.values())?;
                let keyed = elements.keys().cloned().zip(values).collect();
                Ok(WireValue::new(WireType::map(element_wire), WirePayload::Keyed(keyed))?)
            }
            Body::Null => Ok(WireValue::null(map_type)),
            Body::Unknown => Ok(WireValue::unknown(map_type)),
        }
    }
}

impl fmt::Display for MapValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.fmt_marker(f)? {
            return Ok(());
        }
        f.write_str("{")?;
        for (i, (key, v)) in self.body.known().into_iter().flatten().enumerate() {
            if i != 0 {
                f.write_str(",")?;
            }
            write!(f, "{:?}:{}", key, v)?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{DynamicValue, Int64Value, StringValue};

    fn entries(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn mismatch_names_the_key() {
        let (map, diags) = MapValue::new(
            Type::String,
            entries(&[("env", Int64Value::new(1).into())]),
        );
        assert_eq!(map, MapValue::unknown(Type::String));
        let d = diags.errors().next().unwrap();
        assert!(d.detail.contains("Map Key (env) Element Type: int64"));
        assert_eq!(d.path, Some(Path::empty().at_map_key("env")));
    }

    #[test]
    fn rendering_is_sorted_by_key() {
        let map = MapValue::new_must(
            Type::String,
            entries(&[
                ("b", StringValue::new("2").into()),
                ("a", StringValue::new("1").into()),
            ]),
        );
        assert_eq!(map.to_string(), "{\"a\":\"1\",\"b\":\"2\"}");
        assert_eq!(map.get("a"), Some(&Value::from(StringValue::new("1"))));
    }

    #[test]
    fn dynamic_elements_resolve_by_key_order() {
        let map = MapValue::new_must(
            Type::Dynamic,
            entries(&[
                ("a", DynamicValue::null().into()),
                ("b", DynamicValue::new(Int64Value::new(5)).into()),
            ]),
        );
        let wire = map.to_wire().unwrap();
        assert_eq!(wire.ty(), &WireType::map(WireType::Number));
        let Some(WirePayload::Keyed(items)) = wire.payload() else {
            panic!("expected a keyed payload");
        };
        assert_eq!(items["a"], WireValue::null(WireType::Number));
    }
}
