//! List values: ordered elements of a single element type.

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

/// A list of values that all have the same type.
#[derive(Debug, Clone, PartialEq)]
pub struct ListValue {
    element_type: Type,
    body: Body<Vec<Value>>,
}

impl ListValue {
    /// A null list. The element type is kept.
    pub fn null(element_type: Type) -> Self {
        ListValue {
            element_type,
            body: Body::Null,
        }
    }

    /// An unknown list. The element type is kept.
    pub fn unknown(element_type: Type) -> Self {
        ListValue {
            element_type,
            body: Body::Unknown,
        }
    }

    /// A known list. Every element's type must equal `element_type`; any
    /// mismatch is reported per index and the result is an unknown list of
    /// `element_type`.
    pub fn new(element_type: Type, elements: Vec<Value>) -> (Self, Diagnostics) {
        let mut diags = Diagnostics::new();

        for (idx, element) in elements.iter().enumerate() {
            let got = element.attr_type();
            if got != element_type {
                diags.add_attribute_error(
                    Path::empty().at_list_index(idx),
                    "Invalid List Element Type",
                    format!(
                        "While creating a List value, an invalid element was detected. \
                         A List must use the single, given element type. \
                         This is always an issue with the provider and should be reported to the provider developers.\n\n\
                         List Element Type: {}\n\
                         List Index ({}) Element Type: {}",
                        element_type, idx, got
                    ),
                );
            }
        }

        if diags.has_error() {
            return (ListValue::unknown(element_type), diags);
        }

        (ListValue::known(element_type, elements), diags)
    }

    /// A known list built from a serializable native collection, such as
    /// a `Vec<String>`.
    pub fn from_native<T>(element_type: Type, elements: &T) -> (Self, Diagnostics)
    where
        T: Serialize + ?Sized,
    {
        let target = Type::list(element_type.clone());
        match reflect::from_native(&target, elements, &Path::empty()) {
            Ok(Value::List(list)) => (list, Diagnostics::new()),
            Ok(other) => (
                ListValue::unknown(element_type),
                Diagnostics::from(reflect::unexpected_kind("List", &other)),
            ),
            Err(diags) => (ListValue::unknown(element_type), diags),
        }
    }

    pub(crate) fn known(element_type: Type, elements: Vec<Value>) -> Self {
        ListValue {
            element_type,
            body: Body::Known(elements),
        }
    }

    /// A copy of the elements; empty unless known.
    pub fn elements(&self) -> Vec<Value> {
        self.body.known().cloned().unwrap_or_default()
    }

    pub fn element_type(&self) -> &Type {
        &self.element_type
    }

    /// Decode the list into a native target such as `Vec<String>` or
    /// `Vec<Option<String>>`. With `allow_unhandled`, null or unknown
    /// values the target cannot represent become empty values.
    pub fn elements_as<T: DeserializeOwned>(&self, allow_unhandled: bool) -> Result<T, Diagnostics> {
        reflect::value_as(self, "List", allow_unhandled)
    }

    pub(crate) fn from_wire(element_type: &Type, wire: &WireValue) -> Result<Self, ConversionError> {
        match wire.body() {
            WireBody::Null => Ok(ListValue::null(element_type.clone())),
            WireBody::Unknown => Ok(ListValue::unknown(element_type.clone())),
            WireBody::Known(WirePayload::Seq(items)) => {
                let elements = items
                    .iter()
                    .map(|item| element_type.value_from_wire(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ListValue::known(element_type.clone(), elements))
            }
            WireBody::Known(p) => Err(ConversionError::Payload {
                expected: Type::list(element_type.clone()),
                kind: p.kind(),
            }),
        }
    }
}

// ── Panicking constructors ──────────────────────────────────────────
//
// Only for values that cannot affect practitioners: tests and
// exhaustively tested provider logic.

impl ListValue {
    /// Like [`ListValue::new`], but panics on error diagnostics.
    #[track_caller]
    pub fn new_must(element_type: Type, elements: Vec<Value>) -> Self {
        let (list, diags) = ListValue::new(element_type, elements);
        diag::must("ListValue::new_must", &diags);
        list
    }

    /// Like [`ListValue::from_native`], but panics on error diagnostics.
    #[track_caller]
    pub fn from_native_must<T>(element_type: Type, elements: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        let (list, diags) = ListValue::from_native(element_type, elements);
        diag::must("ListValue::from_native_must", &diags);
        list
    }
}

impl AttrValue for ListValue {
    fn attr_type(&self) -> Type {
        Type::list(self.element_type.clone())
    }

    fn state(&self) -> ValueState {
        self.body.state()
    }

    fn to_wire(&self) -> Result<WireValue, ConversionError> {
        let list_type = self.attr_type().wire_type();
        match &self.body {
            Body::Known(elements) => {
                let (element_wire, values) =
                    convert::elements_to_wire(&self.element_type, elements.iter())?;
                Ok(WireValue::new(WireType::list(element_wire), WirePayload::Seq(values))?)
            }
            Body::Null => Ok(WireValue::null(list_type)),
            Body::Unknown => Ok(WireValue::unknown(list_type)),
        }
    }
}

impl fmt::Display for ListValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.fmt_marker(f)? {
            return Ok(());
        }
        f.write_str("[")?;
        fmt_joined(f, self.body.known().into_iter().flatten())?;
        f.write_str("]")
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
