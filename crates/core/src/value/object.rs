//! Object values: named attributes, each with its own type.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use tfattr_interchange::{WireBody, WirePayload, WireValue};

use super::{AttrValue, Body, Value, ValueState};
use crate::convert::ConversionError;
use crate::diag::{self, Diagnostics};
use crate::path::Path;
use crate::reflect;
use crate::types::Type;

const OBJECT_DETAIL_PREFIX: &str = "While creating a Object value, an invalid attribute value was detected. \
    A Object must use a matching attribute type for the value. \
    This is always an issue with the provider and should be reported to the provider developers.";

/// An object with a fixed set of typed attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue {
    attribute_types: BTreeMap<String, Type>,
    body: Body<BTreeMap<String, Value>>,
}

impl ObjectValue {
    pub fn null(attribute_types: BTreeMap<String, Type>) -> Self {
        ObjectValue {
            attribute_types,
            body: Body::Null,
        }
    }

    pub fn unknown(attribute_types: BTreeMap<String, Type>) -> Self {
        ObjectValue {
            attribute_types,
            body: Body::Unknown,
        }
    }

    /// A known object. Every declared attribute must be present with a
    /// value of exactly its declared type, and no others may appear.
    pub fn new(
        attribute_types: BTreeMap<String, Type>,
        attributes: BTreeMap<String, Value>,
    ) -> (Self, Diagnostics) {
        let mut diags = Diagnostics::new();

        for (name, value) in &attributes {
            let got = value.attr_type();
            match attribute_types.get(name) {
                None => diags.add_attribute_error(
                    Path::root(name.clone()),
                    "Extra Object Attribute Value",
                    format!(
                        "While creating a Object value, an extra attribute value was detected. \
                         A Object must not contain values beyond the expected attribute types. \
                         This is always an issue with the provider and should be reported to the provider developers.\n\n\
                         Extra Object Attribute Name ({}) Value Type: {}",
                        name, got
                    ),
                ),
                Some(expected) if *expected != got => diags.add_attribute_error(
                    Path::root(name.clone()),
                    "Invalid Object Attribute Type",
                    format!(
                        "{}\n\nObject Attribute Name ({}) Expected Type: {}\n\
                         Object Attribute Name ({}) Given Type: {}",
                        OBJECT_DETAIL_PREFIX, name, expected, name, got
                    ),
                ),
                Some(_) => {}
            }
        }

        for (name, expected) in &attribute_types {
            if !attributes.contains_key(name) {
                diags.add_attribute_error(
                    Path::root(name.clone()),
                    "Missing Object Attribute Value",
                    format!(
                        "While creating a Object value, a missing attribute value was detected. \
                         A Object must contain values for all attributes, even if null or unknown. \
                         This is always an issue with the provider and should be reported to the provider developers.\n\n\
                         Object Attribute Name ({}) Expected Type: {}",
                        name, expected
                    ),
                );
            }
        }

        if diags.has_error() {
            return (ObjectValue::unknown(attribute_types), diags);
        }

        (ObjectValue::known(attribute_types, attributes), diags)
    }

    /// A known object built from a serializable native struct or map.
    /// Attributes absent from the native value become null.
    pub fn from_native<T>(attribute_types: BTreeMap<String, Type>, native: &T) -> (Self, Diagnostics)
    where
        T: Serialize + ?Sized,
    {
        let target = Type::Object(attribute_types.clone());
        match reflect::from_native(&target, native, &Path::empty()) {
            Ok(Value::Object(obj)) => (obj, Diagnostics::new()),
            Ok(other) => (
                ObjectValue::unknown(attribute_types),
                Diagnostics::from(reflect::unexpected_kind("Object", &other)),
            ),
            Err(diags) => (ObjectValue::unknown(attribute_types), diags),
        }
    }

    pub(crate) fn known(
        attribute_types: BTreeMap<String, Type>,
        attributes: BTreeMap<String, Value>,
    ) -> Self {
        ObjectValue {
            attribute_types,
            body: Body::Known(attributes),
        }
    }

    pub fn attributes(&self) -> BTreeMap<String, Value> {
        self.body.known().cloned().unwrap_or_default()
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.body.known().and_then(|attrs| attrs.get(name))
    }

    pub fn attribute_types(&self) -> &BTreeMap<String, Type> {
        &self.attribute_types
    }

    /// Decode the object into a native struct.
    pub fn attributes_as<T: DeserializeOwned>(&self, allow_unhandled: bool) -> Result<T, Diagnostics> {
        reflect::value_as(self, "Object", allow_unhandled)
    }

    pub(crate) fn from_wire(
        attribute_types: &BTreeMap<String, Type>,
        wire: &WireValue,
    ) -> Result<Self, ConversionError> {
        match wire.body() {
            WireBody::Null => Ok(ObjectValue::null(attribute_types.clone())),
            WireBody::Unknown => Ok(ObjectValue::unknown(attribute_types.clone())),
            WireBody::Known(WirePayload::Keyed(items)) => {
                let mut attributes = BTreeMap::new();
                for (name, ty) in attribute_types {
                    let item = items.get(name).ok_or_else(|| ConversionError::MissingAttribute {
                        name: name.clone(),
                    })?;
                    attributes.insert(name.clone(), ty.value_from_wire(item)?);
                }
                Ok(ObjectValue::known(attribute_types.clone(), attributes))
            }
            WireBody::Known(p) => Err(ConversionError::Payload {
                expected: Type::Object(attribute_types.clone()),
                kind: p.kind(),
            }),
        }
    }
}

// ── Panicking constructors ──────────────────────────────────────────

impl ObjectValue {
    #[track_caller]
    pub fn new_must(
        attribute_types: BTreeMap<String, Type>,
        attributes: BTreeMap<String, Value>,
    ) -> Self {
        let (obj, diags) = ObjectValue::new(attribute_types, attributes);
        diag::must("ObjectValue::new_must", &diags);
        obj
    }

    #[track_caller]
    pub fn from_native_must<T>(attribute_types: BTreeMap<String, Type>, native: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        let (obj, diags) = ObjectValue::from_native(attribute_types, native);
        diag::must("ObjectValue::from_native_must", &diags);
        obj
    }
}

impl AttrValue for ObjectValue {
    fn attr_type(&self) -> Type {
        Type::Object(self.attribute_types.clone())
    }

    fn state(&self) -> ValueState {
        self.body.state()
    }

    fn to_wire(&self) -> Result<WireValue, ConversionError> {
        let object_type = self.attr_type().wire_type();
        match &self.body {
            Body::Known(attributes) => {
                let mut keyed = BTreeMap::new();
                for (name, value) in attributes {
                    keyed.insert(name.clone(), value.to_wire()?);
                }
                Ok(WireValue::new(object_type, WirePayload::Keyed(keyed))?)
            }
            Body::Null => Ok(WireValue::null(object_type)),
            Body::Unknown => Ok(WireValue::unknown(object_type)),
        }
    }
}

impl fmt::Display for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.fmt_marker(f)? {
            return Ok(());
        }
        f.write_str("{")?;
        for (i, (name, v)) in self.body.known().into_iter().flatten().enumerate() {
            if i != 0 {
                f.write_str(",")?;
            }
            write!(f, "{:?}:{}", name, v)?;
        }
        f.write_str("}")
    }
}
