//! Set values: unordered elements of a single element type.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

use tfattr_interchange::{WireBody, WirePayload, WireType, WireValue};

use super::{fmt_joined, AttrValue, Body, Value, ValueState};
use crate::convert::{self, ConversionError};
use crate::diag::{self, Diagnostics};
use crate::path::Path;
use crate::reflect;
use crate::types::Type;

/// A set of values that all have the same type.
///
/// Elements keep their insertion order for conversion and rendering, but
/// equality ignores order. Repeated elements are compared by count.
#[derive(Debug, Clone)]
pub struct SetValue {
    element_type: Type,
    body: Body<Vec<Value>>,
}

impl SetValue {
    pub fn null(element_type: Type) -> Self {
        SetValue {
            element_type,
            body: Body::Null,
        }
    }

    pub fn unknown(element_type: Type) -> Self {
        SetValue {
            element_type,
            body: Body::Unknown,
        }
    }

    /// A known set; see [`ListValue::new`](super::ListValue::new) for the
    /// element type rules.
    pub fn new(element_type: Type, elements: Vec<Value>) -> (Self, Diagnostics) {
        let mut diags = Diagnostics::new();

        for (idx, element) in elements.iter().enumerate() {
            let got = element.attr_type();
            if got != element_type {
                diags.add_attribute_error(
                    Path::empty().at_set_value(element.clone()),
                    "Invalid Set Element Type",
                    format!(
                        "While creating a Set value, an invalid element was detected. \
                         A Set must use the single, given element type. \
                         This is always an issue with the provider and should be reported to the provider developers.\n\n\
                         Set Element Type: {}\n\
                         Set Index ({}) Element Type: {}",
                        element_type, idx, got
                    ),
                );
            }
        }

        if diags.has_error() {
            return (SetValue::unknown(element_type), diags);
        }

        (SetValue::known(element_type, elements), diags)
    }

    pub fn from_native<T>(element_type: Type, elements: &T) -> (Self, Diagnostics)
    where
        T: Serialize + ?Sized,
    {
        let target = Type::set(element_type.clone());
        match reflect::from_native(&target, elements, &Path::empty()) {
            Ok(Value::Set(set)) => (set, Diagnostics::new()),
            Ok(other) => (
                SetValue::unknown(element_type),
                Diagnostics::from(reflect::unexpected_kind("Set", &other)),
            ),
            Err(diags) => (SetValue::unknown(element_type), diags),
        }
    }

    pub(crate) fn known(element_type: Type, elements: Vec<Value>) -> Self {
        SetValue {
            element_type,
            body: Body::Known(elements),
        }
    }

    pub fn elements(&self) -> Vec<Value> {
        self.body.known().cloned().unwrap_or_default()
    }

    pub fn element_type(&self) -> &Type {
        &self.element_type
    }

    pub fn contains(&self, v: &Value) -> bool {
        self.body.known().is_some_and(|elements| elements.contains(v))
    }

    pub fn elements_as<T: DeserializeOwned>(&self, allow_unhandled: bool) -> Result<T, Diagnostics> {
        reflect::value_as(self, "Set", allow_unhandled)
    }

    pub(crate) fn from_wire(element_type: &Type, wire: &WireValue) -> Result<Self, ConversionError> {
        match wire.body() {
            WireBody::Null => Ok(SetValue::null(element_type.clone())),
            WireBody::Unknown => Ok(SetValue::unknown(element_type.clone())),
            WireBody::Known(WirePayload::Seq(items)) => {
                let elements = items
                    .iter()
                    .map(|item| element_type.value_from_wire(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SetValue::known(element_type.clone(), elements))
            }
            WireBody::Known(p) => Err(ConversionError::Payload {
                expected: Type::set(element_type.clone()),
                kind: p.kind(),
            }),
        }
    }
}

// ── Panicking constructors ──────────────────────────────────────────

impl SetValue {
    #[track_caller]
    pub fn new_must(element_type: Type, elements: Vec<Value>) -> Self {
        let (set, diags) = SetValue::new(element_type, elements);
        diag::must("SetValue::new_must", &diags);
        set
    }

    #[track_caller]
    pub fn from_native_must<T>(element_type: Type, elements: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        let (set, diags) = SetValue::from_native(element_type, elements);
        diag::must("SetValue::from_native_must", &diags);
        set
    }
}

impl PartialEq for SetValue {
    fn eq(&self, other: &Self) -> bool {
        if self.element_type != other.element_type {
            return false;
        }
        match (&self.body, &other.body) {
            (Body::Known(a), Body::Known(b)) => {
                let count = |items: &[Value], e: &Value| items.iter().filter(|x| *x == e).count();
                a.len() == b.len() && a.iter().all(|e| count(a, e) == count(b, e))
            }
            (a, b) => a.state() == b.state(),
        }
    }
}

impl AttrValue for SetValue {
    fn attr_type(&self) -> Type {
        Type::set(self.element_type.clone())
    }

    fn state(&self) -> ValueState {
        self.body.state()
    }

    fn to_wire(&self) -> Result<WireValue, ConversionError> {
        let set_type = self.attr_type().wire_type();
        match &self.body {
            Body::Known(elements) => {
                let (element_wire, values) =
                    convert::elements_to_wire(&self.element_type, elements.iter())?;
                Ok(WireValue::new(WireType::set(element_wire), WirePayload::Seq(values))?)
            }
            Body::Null => Ok(WireValue::null(set_type)),
            Body::Unknown => Ok(WireValue::unknown(set_type)),
        }
    }
}

impl fmt::Display for SetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.fmt_marker(f)? {
            return Ok(());
        }
        f.write_str("[")?;
        fmt_joined(f, self.body.known().into_iter().flatten())?;
        f.write_str("]")
    }
}
