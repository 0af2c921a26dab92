//! Dynamic values: a value whose concrete type is carried by its content.

use std::fmt;

use tfattr_interchange::{WireType, WireValue};

use super::{AttrValue, Body, Value, ValueState};
use crate::convert::ConversionError;
use crate::types::Type;

/// A value typed `dynamic`.
///
/// Null and unknown here refer to the dynamic value itself. A known
/// dynamic value may still wrap a null or unknown underlying value, which
/// does carry a concrete type.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicValue {
    body: Body<Box<Value>>,
}

impl DynamicValue {
    pub fn null() -> Self {
        DynamicValue { body: Body::Null }
    }

    pub fn unknown() -> Self {
        DynamicValue {
            body: Body::Unknown,
        }
    }

    pub fn new(underlying: impl Into<Value>) -> Self {
        DynamicValue {
            body: Body::Known(Box::new(underlying.into())),
        }
    }

    /// The wrapped value; `None` when the dynamic value is null or unknown.
    pub fn underlying_value(&self) -> Option<&Value> {
        self.body.known().map(|v| &**v)
    }

    pub fn is_underlying_null(&self) -> bool {
        self.underlying_value().is_some_and(AttrValue::is_null)
    }

    pub fn is_underlying_unknown(&self) -> bool {
        self.underlying_value().is_some_and(AttrValue::is_unknown)
    }

    pub(crate) fn from_wire(wire: &WireValue) -> Result<Self, ConversionError> {
        // A placeholder-typed wire value can only be a marker.
        if wire.ty().is_dynamic() {
            return Ok(if wire.is_null() {
                DynamicValue::null()
            } else {
                DynamicValue::unknown()
            });
        }
        let concrete = Type::from_wire_type(wire.ty());
        Ok(DynamicValue::new(concrete.value_from_wire(wire)?))
    }
}

impl AttrValue for DynamicValue {
    fn attr_type(&self) -> Type {
        Type::Dynamic
    }

    fn state(&self) -> ValueState {
        self.body.state()
    }

    fn to_wire(&self) -> Result<WireValue, ConversionError> {
        match &self.body {
            Body::Known(underlying) => underlying.to_wire(),
            Body::Null => Ok(WireValue::null(WireType::Dynamic)),
            Body::Unknown => Ok(WireValue::unknown(WireType::Dynamic)),
        }
    }
}

impl fmt::Display for DynamicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            Body::Known(underlying) => fmt::Display::fmt(underlying, f),
            marker => marker.fmt_marker(f).map(|_| ()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{ListValue, StringValue};

    #[test]
    fn type_is_always_dynamic() {
        assert_eq!(DynamicValue::null().attr_type(), Type::Dynamic);
        assert_eq!(DynamicValue::new(StringValue::new("x")).attr_type(), Type::Dynamic);
    }

    #[test]
    fn underlying_state() {
        let v = DynamicValue::new(StringValue::null());
        assert!(v.is_known());
        assert!(v.is_underlying_null());
        assert!(!v.is_underlying_unknown());
        assert!(!DynamicValue::unknown().is_underlying_unknown());
    }

    #[test]
    fn known_converts_through_underlying_type() {
        let v = DynamicValue::new(ListValue::new_must(
            Type::String,
            vec![StringValue::new("a").into()],
        ));
        let wire = v.to_wire().unwrap();
        assert_eq!(wire.ty(), &WireType::list(WireType::String));
        assert_eq!(DynamicValue::from_wire(&wire).unwrap(), v);
        assert_eq!(v.to_string(), "[\"a\"]");
    }

    #[test]
    fn markers_use_placeholder_type() {
        let wire = DynamicValue::unknown().to_wire().unwrap();
        assert!(wire.is_unknown());
        assert_eq!(wire.ty(), &WireType::Dynamic);
        assert_eq!(DynamicValue::from_wire(&wire).unwrap(), DynamicValue::unknown());
    }
}
