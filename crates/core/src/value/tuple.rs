//! Tuple values: fixed-length, per-position element types.

use std::fmt;

use tfattr_interchange::{WireBody, WirePayload, WireValue};

use super::{fmt_joined, AttrValue, Body, Value, ValueState};
use crate::convert::ConversionError;
use crate::diag::{self, Diagnostics};
use crate::path::Path;
use crate::types::Type;

#[derive(Debug, Clone, PartialEq)]
pub struct TupleValue {
    element_types: Vec<Type>,
    body: Body<Vec<Value>>,
}

impl TupleValue {
    pub fn null(element_types: Vec<Type>) -> Self {
        TupleValue {
            element_types,
            body: Body::Null,
        }
    }

    pub fn unknown(element_types: Vec<Type>) -> Self {
        TupleValue {
            element_types,
            body: Body::Unknown,
        }
    }

    /// A known tuple. The element count must match and each element must
    /// have exactly the type at its position.
    pub fn new(element_types: Vec<Type>, elements: Vec<Value>) -> (Self, Diagnostics) {
        let mut diags = Diagnostics::new();

        if element_types.len() != elements.len() {
            diags.add_error(
                "Invalid Tuple Elements",
                format!(
                    "While creating a Tuple value, mismatched element types were detected. \
                     A Tuple must be an ordered array of elements where the values exactly match the length and types of the defined element types. \
                     This is always an issue with the provider and should be reported to the provider developers.\n\n\
                     Tuple Expected Length: {}\n\
                     Tuple Given Length: {}",
                    element_types.len(),
                    elements.len()
                ),
            );
            return (TupleValue::unknown(element_types), diags);
        }

        for (idx, (expected, element)) in element_types.iter().zip(&elements).enumerate() {
            let got = element.attr_type();
            if got != *expected {
                diags.add_attribute_error(
                    Path::empty().at_tuple_index(idx),
                    "Invalid Tuple Element",
                    format!(
                        "While creating a Tuple value, an invalid element was detected. \
                         A Tuple must use the matching element type for each position. \
                         This is always an issue with the provider and should be reported to the provider developers.\n\n\
                         Tuple Element Index ({}) Expected Type: {}\n\
                         Tuple Element Index ({}) Given Type: {}",
                        idx, expected, idx, got
                    ),
                );
            }
        }

        if diags.has_error() {
            return (TupleValue::unknown(element_types), diags);
        }

        (TupleValue::known(element_types, elements), diags)
    }

    pub(crate) fn known(element_types: Vec<Type>, elements: Vec<Value>) -> Self {
        TupleValue {
            element_types,
            body: Body::Known(elements),
        }
    }

    pub fn elements(&self) -> Vec<Value> {
        self.body.known().cloned().unwrap_or_default()
    }

    pub fn element_types(&self) -> &[Type] {
        &self.element_types
    }

    pub(crate) fn from_wire(element_types: &[Type], wire: &WireValue) -> Result<Self, ConversionError> {
        match wire.body() {
            WireBody::Null => Ok(TupleValue::null(element_types.to_vec())),
            WireBody::Unknown => Ok(TupleValue::unknown(element_types.to_vec())),
            WireBody::Known(WirePayload::Seq(items)) if items.len() == element_types.len() => {
                let elements = element_types
                    .iter()
                    .zip(items)
                    .map(|(ty, item)| ty.value_from_wire(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(TupleValue::known(element_types.to_vec(), elements))
            }
            WireBody::Known(p) => Err(ConversionError::Payload {
                expected: Type::Tuple(element_types.to_vec()),
                kind: p.kind(),
            }),
        }
    }
}

impl TupleValue {
    #[track_caller]
    pub fn new_must(element_types: Vec<Type>, elements: Vec<Value>) -> Self {
        let (tuple, diags) = TupleValue::new(element_types, elements);
        diag::must("TupleValue::new_must", &diags);
        tuple
    }
}

impl AttrValue for TupleValue {
    fn attr_type(&self) -> Type {
        Type::Tuple(self.element_types.clone())
    }

    fn state(&self) -> ValueState {
        self.body.state()
    }

    fn to_wire(&self) -> Result<WireValue, ConversionError> {
        let tuple_type = self.attr_type().wire_type();
        match &self.body {
            Body::Known(elements) => {
                let values = elements
                    .iter()
                    .map(AttrValue::to_wire)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(WireValue::new(tuple_type, WirePayload::Seq(values))?)
            }
            Body::Null => Ok(WireValue::null(tuple_type)),
            Body::Unknown => Ok(WireValue::unknown(tuple_type)),
        }
    }
}

impl fmt::Display for TupleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.fmt_marker(f)? {
            return Ok(());
        }
        f.write_str("[")?;
        fmt_joined(f, self.body.known().into_iter().flatten())?;
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{BoolValue, StringValue};

    #[test]
    fn positional_types() {
        let tuple = TupleValue::new_must(
            vec![Type::String, Type::Bool],
            vec![StringValue::new("a").into(), BoolValue::new(false).into()],
        );
        assert_eq!(tuple.to_string(), "[\"a\",false]");
        assert_eq!(tuple.attr_type(), Type::tuple(vec![Type::String, Type::Bool]));
    }

    #[test]
    fn length_mismatch() {
        let (tuple, diags) = TupleValue::new(vec![Type::String], vec![]);
        assert!(tuple.is_unknown());
        assert_eq!(diags.errors().next().unwrap().summary, "Invalid Tuple Elements");
    }

    #[test]
    fn element_mismatch_names_position() {
        let (_, diags) = TupleValue::new(
            vec![Type::String, Type::Bool],
            vec![StringValue::new("a").into(), StringValue::new("b").into()],
        );
        let d = diags.errors().next().unwrap();
        assert_eq!(d.summary, "Invalid Tuple Element");
        assert_eq!(d.path, Some(Path::empty().at_tuple_index(1)));
    }

    #[test]
    fn wire_round_trip() {
        let types = vec![Type::Int64, Type::String];
        let tuple = TupleValue::new_must(
            types.clone(),
            vec![crate::value::Int64Value::new(7).into(), StringValue::null().into()],
        );
        let wire = tuple.to_wire().unwrap();
        let back = Type::Tuple(types).value_from_wire(&wire).unwrap();
        assert_eq!(back, Value::Tuple(tuple));
    }
}
