//! Attribute values.
//!
//! Every value is in exactly one [`ValueState`]. Only known values carry
//! data; null and unknown composites still carry their element type. Each
//! kind has its own struct, all implementing [`AttrValue`], and [`Value`]
//! is the closed union used wherever a value of any kind may appear.

mod dynamic;
mod list;
mod map;
mod object;
mod scalar;
mod set;
mod tuple;

pub use dynamic::DynamicValue;
pub use list::ListValue;
pub use map::MapValue;
pub use object::ObjectValue;
pub use scalar::{BoolValue, Int64Value, NumberValue, Scalar, ScalarValue, StringValue};
pub use set::SetValue;
pub use tuple::TupleValue;

use std::fmt;

use tfattr_interchange::WireValue;

use crate::convert::ConversionError;
use crate::types::Type;

/// Rendering of an unknown value.
pub const UNKNOWN_VALUE_STRING: &str = "<unknown>";
/// Rendering of a null value.
pub const NULL_VALUE_STRING: &str = "<null>";

// ──────────────────────────────────────────────
// State
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueState {
    Null,
    Unknown,
    Known,
}

impl fmt::Display for ValueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueState::Null => write!(f, "null"),
            ValueState::Unknown => write!(f, "unknown"),
            ValueState::Known => write!(f, "known"),
        }
    }
}

/// State plus data; data exists only in the known state.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Body<T> {
    Null,
    Unknown,
    Known(T),
}

impl<T> Body<T> {
    pub(crate) fn state(&self) -> ValueState {
        match self {
            Body::Null => ValueState::Null,
            Body::Unknown => ValueState::Unknown,
            Body::Known(_) => ValueState::Known,
        }
    }

    pub(crate) fn known(&self) -> Option<&T> {
        match self {
            Body::Known(v) => Some(v),
            _ => None,
        }
    }

    /// Writes the marker for null or unknown; returns false when known.
    pub(crate) fn fmt_marker(&self, f: &mut fmt::Formatter<'_>) -> Result<bool, fmt::Error> {
        match self {
            Body::Null => f.write_str(NULL_VALUE_STRING).map(|_| true),
            Body::Unknown => f.write_str(UNKNOWN_VALUE_STRING).map(|_| true),
            Body::Known(_) => Ok(false),
        }
    }
}

// ──────────────────────────────────────────────
// Capability set
// ──────────────────────────────────────────────

/// Capabilities shared by every value kind.
///
/// `Display` renders the value for logs and error messages only; the
/// format is not stable and must not be parsed.
pub trait AttrValue: fmt::Display {
    /// The value's type descriptor, available in every state.
    fn attr_type(&self) -> Type;

    fn state(&self) -> ValueState;

    /// Convert to the wire representation.
    fn to_wire(&self) -> Result<WireValue, ConversionError>;

    fn is_null(&self) -> bool {
        self.state() == ValueState::Null
    }

    fn is_unknown(&self) -> bool {
        self.state() == ValueState::Unknown
    }

    fn is_known(&self) -> bool {
        self.state() == ValueState::Known
    }
}

// Every kind must stay usable behind the shared capability set and across
// threads.
const _: () = {
    const fn conforms<T: AttrValue + Clone + PartialEq + fmt::Debug + Send + Sync>() {}
    conforms::<BoolValue>();
    conforms::<NumberValue>();
    conforms::<Int64Value>();
    conforms::<StringValue>();
    conforms::<ListValue>();
    conforms::<SetValue>();
    conforms::<MapValue>();
    conforms::<ObjectValue>();
    conforms::<TupleValue>();
    conforms::<DynamicValue>();
    conforms::<Value>();
};

// ──────────────────────────────────────────────
// Value
// ──────────────────────────────────────────────

/// A value of any kind.
///
/// Equality follows the per-kind rules: same kind, same type, same state,
/// and for known values equal contents.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(BoolValue),
    Number(NumberValue),
    Int64(Int64Value),
    String(StringValue),
    List(ListValue),
    Set(SetValue),
    Map(MapValue),
    Object(ObjectValue),
    Tuple(TupleValue),
    Dynamic(DynamicValue),
}

impl Value {
    fn inner(&self) -> &dyn AttrValue {
        match self {
            Value::Bool(v) => v,
            Value::Number(v) => v,
            Value::Int64(v) => v,
            Value::String(v) => v,
            Value::List(v) => v,
            Value::Set(v) => v,
            Value::Map(v) => v,
            Value::Object(v) => v,
            Value::Tuple(v) => v,
            Value::Dynamic(v) => v,
        }
    }

    /// Short kind name, for messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "Bool",
            Value::Number(_) => "Number",
            Value::Int64(_) => "Int64",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Set(_) => "Set",
            Value::Map(_) => "Map",
            Value::Object(_) => "Object",
            Value::Tuple(_) => "Tuple",
            Value::Dynamic(_) => "Dynamic",
        }
    }
}

impl AttrValue for Value {
    fn attr_type(&self) -> Type {
        self.inner().attr_type()
    }

    fn state(&self) -> ValueState {
        self.inner().state()
    }

    fn to_wire(&self) -> Result<WireValue, ConversionError> {
        self.inner().to_wire()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.inner(), f)
    }
}

macro_rules! value_from {
    ($($variant:ident => $kind:ty),* $(,)?) => {
        $(
            impl From<$kind> for Value {
                fn from(v: $kind) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    Bool => BoolValue,
    Number => NumberValue,
    Int64 => Int64Value,
    String => StringValue,
    List => ListValue,
    Set => SetValue,
    Map => MapValue,
    Object => ObjectValue,
    Tuple => TupleValue,
    Dynamic => DynamicValue,
}

/// Writes `items` separated by commas.
pub(crate) fn fmt_joined<I, T>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    I: IntoIterator<Item = T>,
    T: fmt::Display,
{
    for (i, item) in items.into_iter().enumerate() {
        if i != 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_helpers() {
        let v: Value = StringValue::unknown().into();
        assert!(v.is_unknown());
        assert!(!v.is_null());
        assert!(!v.is_known());
        assert_eq!(v.state(), ValueState::Unknown);
    }

    #[test]
    fn different_kinds_are_never_equal() {
        let a: Value = NumberValue::new(1).into();
        let b: Value = Int64Value::new(1).into();
        assert_ne!(a, b);
        assert_eq!(a.kind(), "Number");
    }

    #[test]
    fn markers_render_as_sentinels() {
        assert_eq!(Value::from(BoolValue::null()).to_string(), "<null>");
        assert_eq!(
            Value::from(ListValue::unknown(Type::String)).to_string(),
            "<unknown>"
        );
    }
}
