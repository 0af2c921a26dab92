//! Primitive values: bool, number, int64, string.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;

use tfattr_interchange::{WireBody, WirePayload, WireValue};

use super::{AttrValue, Body, ValueState};
use crate::convert::ConversionError;
use crate::types::Type;

/// Rust types that back a primitive value.
pub trait Scalar: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    fn attr_type() -> Type;

    fn to_payload(&self) -> WirePayload;

    /// `None` when the payload cannot represent this type.
    fn from_payload(p: &WirePayload) -> Option<Self>;

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl Scalar for bool {
    fn attr_type() -> Type {
        Type::Bool
    }

    fn to_payload(&self) -> WirePayload {
        WirePayload::Bool(*self)
    }

    fn from_payload(p: &WirePayload) -> Option<Self> {
        match p {
            WirePayload::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Scalar for Decimal {
    fn attr_type() -> Type {
        Type::Number
    }

    fn to_payload(&self) -> WirePayload {
        WirePayload::Number(*self)
    }

    fn from_payload(p: &WirePayload) -> Option<Self> {
        match p {
            WirePayload::Number(d) => Some(*d),
            _ => None,
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Scalar for i64 {
    fn attr_type() -> Type {
        Type::Int64
    }

    fn to_payload(&self) -> WirePayload {
        WirePayload::Number(Decimal::from(*self))
    }

    fn from_payload(p: &WirePayload) -> Option<Self> {
        match p {
            WirePayload::Number(d) if d.fract().is_zero() => d.to_i64(),
            _ => None,
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Scalar for String {
    fn attr_type() -> Type {
        Type::String
    }

    fn to_payload(&self) -> WirePayload {
        WirePayload::String(self.clone())
    }

    fn from_payload(p: &WirePayload) -> Option<Self> {
        match p {
            WirePayload::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A primitive value in one of the three states.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarValue<T> {
    body: Body<T>,
}

pub type BoolValue = ScalarValue<bool>;
pub type NumberValue = ScalarValue<Decimal>;
pub type Int64Value = ScalarValue<i64>;
pub type StringValue = ScalarValue<String>;

impl<T: Scalar> ScalarValue<T> {
    pub fn null() -> Self {
        ScalarValue { body: Body::Null }
    }

    pub fn unknown() -> Self {
        ScalarValue {
            body: Body::Unknown,
        }
    }

    pub fn new(value: impl Into<T>) -> Self {
        ScalarValue {
            body: Body::Known(value.into()),
        }
    }

    /// The known value, or `None` when null or unknown.
    pub fn value(&self) -> Option<&T> {
        self.body.known()
    }

    pub(crate) fn from_wire(wire: &WireValue) -> Result<Self, ConversionError> {
        match wire.body() {
            WireBody::Null => Ok(Self::null()),
            WireBody::Unknown => Ok(Self::unknown()),
            WireBody::Known(p) => T::from_payload(p)
                .map(Self::new)
                .ok_or_else(|| ConversionError::Payload {
                    expected: T::attr_type(),
                    kind: p.kind(),
                }),
        }
    }
}

impl<T: Scalar> AttrValue for ScalarValue<T> {
    fn attr_type(&self) -> Type {
        T::attr_type()
    }

    fn state(&self) -> ValueState {
        self.body.state()
    }

    fn to_wire(&self) -> Result<WireValue, ConversionError> {
        let ty = T::attr_type().wire_type();
        match &self.body {
            Body::Known(v) => Ok(WireValue::new(ty, v.to_payload())?),
            Body::Null => Ok(WireValue::null(ty)),
            Body::Unknown => Ok(WireValue::unknown(ty)),
        }
    }
}

impl<T: Scalar> fmt::Display for ScalarValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            Body::Known(v) => v.render(f),
            marker => marker.fmt_marker(f).map(|_| ()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn known_value_accessor() {
        assert_eq!(StringValue::new("a").value(), Some(&"a".to_string()));
        assert_eq!(StringValue::null().value(), None);
        assert_eq!(BoolValue::unknown().value(), None);
    }

    #[test]
    fn rendering() {
        assert_eq!(StringValue::new("hi \"x\"").to_string(), "\"hi \\\"x\\\"\"");
        assert_eq!(NumberValue::new(Decimal::from_str("1.50").unwrap()).to_string(), "1.50");
        assert_eq!(Int64Value::new(-3).to_string(), "-3");
        assert_eq!(BoolValue::null().to_string(), "<null>");
    }

    #[test]
    fn int64_wire_round_trip() {
        let wire = Int64Value::new(42).to_wire().unwrap();
        assert_eq!(wire.payload(), Some(&WirePayload::Number(Decimal::from(42))));
        assert_eq!(Int64Value::from_wire(&wire).unwrap(), Int64Value::new(42));
    }

    #[test]
    fn int64_rejects_fractional_numbers() {
        let wire = NumberValue::new(Decimal::from_str("1.5").unwrap())
            .to_wire()
            .unwrap();
        assert!(Int64Value::from_wire(&wire).is_err());
    }

    #[test]
    fn state_equality() {
        assert_eq!(StringValue::null(), StringValue::null());
        assert_ne!(StringValue::null(), StringValue::unknown());
        assert_ne!(StringValue::new(""), StringValue::null());
    }
}
