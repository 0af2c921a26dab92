//! Type descriptors.
//!
//! A [`Type`] is immutable and compared structurally: two descriptors are
//! equal only if they are the same kind with equal element or attribute
//! types. There is no coercion between kinds.

use std::collections::BTreeMap;
use std::fmt;

use tfattr_interchange::{WireType, WireValue};

use crate::convert::{self, ConversionError};
use crate::path::PathStep;
use crate::value::{
    BoolValue, DynamicValue, Int64Value, ListValue, MapValue, NumberValue, ObjectValue, SetValue,
    StringValue, TupleValue, Value,
};

/// Error from [`Type::apply_path_step`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathStepError {
    #[error("cannot apply step {step} to {ty}")]
    NotApplicable { step: String, ty: Type },
    #[error("undefined attribute name {name:?} in {ty}")]
    UndefinedAttribute { name: String, ty: Type },
    #[error("index {index} out of range for {ty}")]
    IndexOutOfRange { index: i64, ty: Type },
}

/// A value type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Type {
    Bool,
    /// Arbitrary-precision number.
    Number,
    /// Number restricted to 64-bit integers; shares the wire number type.
    Int64,
    String,
    List(Box<Type>),
    Set(Box<Type>),
    Map(Box<Type>),
    Object(BTreeMap<String, Type>),
    Tuple(Vec<Type>),
    /// Concrete type decided by the value's content.
    Dynamic,
}

impl Type {
    pub fn list(element: Type) -> Self {
        Type::List(Box::new(element))
    }

    pub fn set(element: Type) -> Self {
        Type::Set(Box::new(element))
    }

    pub fn map(element: Type) -> Self {
        Type::Map(Box::new(element))
    }

    pub fn object<I, K>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, Type)>,
        K: Into<String>,
    {
        Type::Object(attributes.into_iter().map(|(k, t)| (k.into(), t)).collect())
    }

    pub fn tuple(elements: Vec<Type>) -> Self {
        Type::Tuple(elements)
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Type::Dynamic)
    }

    /// Element type of a list, set, or map.
    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::List(e) | Type::Set(e) | Type::Map(e) => Some(e),
            _ => None,
        }
    }

    /// True if `dynamic` appears anywhere in this type, including the type
    /// itself. Stops at the first occurrence.
    pub fn contains_dynamic(&self) -> bool {
        match self {
            Type::Dynamic => true,
            Type::List(e) | Type::Set(e) | Type::Map(e) => e.contains_dynamic(),
            Type::Object(attrs) => attrs.values().any(Type::contains_dynamic),
            Type::Tuple(elems) => elems.iter().any(Type::contains_dynamic),
            Type::Bool | Type::Number | Type::Int64 | Type::String => false,
        }
    }

    /// The first `dynamic` nested inside a collection, object, or tuple.
    /// The type itself is not considered; `Type::Dynamic` yields `None`.
    pub fn find_nested_dynamic(&self) -> Option<&Type> {
        let mut children: Box<dyn Iterator<Item = &Type> + '_> = match self {
            Type::List(e) | Type::Set(e) | Type::Map(e) => Box::new(std::iter::once(&**e)),
            Type::Object(attrs) => Box::new(attrs.values()),
            Type::Tuple(elems) => Box::new(elems.iter()),
            Type::Bool | Type::Number | Type::Int64 | Type::String | Type::Dynamic => {
                return None
            }
        };
        children.find_map(|child| {
            if child.is_dynamic() {
                Some(child)
            } else {
                child.find_nested_dynamic()
            }
        })
    }

    /// The descriptor reachable by taking `step` into a value of this type.
    pub fn apply_path_step(&self, step: &PathStep) -> Result<Type, PathStepError> {
        match (self, step) {
            (Type::List(e), PathStep::ElementKeyInt(_))
            | (Type::Set(e), PathStep::ElementKeyValue(_))
            | (Type::Map(e), PathStep::ElementKeyString(_)) => Ok((**e).clone()),
            (Type::Object(attrs), PathStep::AttributeName(name)) => {
                attrs
                    .get(name)
                    .cloned()
                    .ok_or_else(|| PathStepError::UndefinedAttribute {
                        name: name.clone(),
                        ty: self.clone(),
                    })
            }
            (Type::Tuple(elems), PathStep::ElementKeyInt(idx)) => usize::try_from(*idx)
                .ok()
                .and_then(|i| elems.get(i))
                .cloned()
                .ok_or_else(|| PathStepError::IndexOutOfRange {
                    index: *idx,
                    ty: self.clone(),
                }),
            (ty, step) => Err(PathStepError::NotApplicable {
                step: step.to_string(),
                ty: ty.clone(),
            }),
        }
    }

    /// The wire type values of this type encode to. A dynamic element or
    /// attribute type stays a placeholder here; collections resolve it
    /// from their content during conversion.
    pub fn wire_type(&self) -> WireType {
        match self {
            Type::Bool => WireType::Bool,
            Type::Number | Type::Int64 => WireType::Number,
            Type::String => WireType::String,
            Type::List(e) => WireType::list(e.wire_type()),
            Type::Set(e) => WireType::set(e.wire_type()),
            Type::Map(e) => WireType::map(e.wire_type()),
            Type::Object(attrs) => {
                WireType::Object(attrs.iter().map(|(k, t)| (k.clone(), t.wire_type())).collect())
            }
            Type::Tuple(elems) => WireType::Tuple(elems.iter().map(Type::wire_type).collect()),
            Type::Dynamic => WireType::Dynamic,
        }
    }

    /// Derive a descriptor from a wire type. Wire numbers become
    /// [`Type::Number`].
    pub fn from_wire_type(wt: &WireType) -> Type {
        match wt {
            WireType::Bool => Type::Bool,
            WireType::Number => Type::Number,
            WireType::String => Type::String,
            WireType::List(e) => Type::list(Type::from_wire_type(e)),
            WireType::Set(e) => Type::set(Type::from_wire_type(e)),
            WireType::Map(e) => Type::map(Type::from_wire_type(e)),
            WireType::Object(attrs) => Type::Object(
                attrs
                    .iter()
                    .map(|(k, t)| (k.clone(), Type::from_wire_type(t)))
                    .collect(),
            ),
            WireType::Tuple(elems) => Type::Tuple(elems.iter().map(Type::from_wire_type).collect()),
            WireType::Dynamic => Type::Dynamic,
        }
    }

    /// Decode a wire value into a value of this type.
    pub fn value_from_wire(&self, wire: &WireValue) -> Result<Value, ConversionError> {
        convert::value_from_wire(self, wire)
    }

    /// A null value of this type.
    pub fn null_value(&self) -> Value {
        match self {
            Type::Bool => BoolValue::null().into(),
            Type::Number => NumberValue::null().into(),
            Type::Int64 => Int64Value::null().into(),
            Type::String => StringValue::null().into(),
            Type::List(e) => ListValue::null((**e).clone()).into(),
            Type::Set(e) => SetValue::null((**e).clone()).into(),
            Type::Map(e) => MapValue::null((**e).clone()).into(),
            Type::Object(attrs) => ObjectValue::null(attrs.clone()).into(),
            Type::Tuple(elems) => TupleValue::null(elems.clone()).into(),
            Type::Dynamic => DynamicValue::null().into(),
        }
    }

    /// An unknown value of this type.
    pub fn unknown_value(&self) -> Value {
        match self {
            Type::Bool => BoolValue::unknown().into(),
            Type::Number => NumberValue::unknown().into(),
            Type::Int64 => Int64Value::unknown().into(),
            Type::String => StringValue::unknown().into(),
            Type::List(e) => ListValue::unknown((**e).clone()).into(),
            Type::Set(e) => SetValue::unknown((**e).clone()).into(),
            Type::Map(e) => MapValue::unknown((**e).clone()).into(),
            Type::Object(attrs) => ObjectValue::unknown(attrs.clone()).into(),
            Type::Tuple(elems) => TupleValue::unknown(elems.clone()).into(),
            Type::Dynamic => DynamicValue::unknown().into(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "bool"),
            Type::Number => write!(f, "number"),
            Type::Int64 => write!(f, "int64"),
            Type::String => write!(f, "string"),
            Type::Dynamic => write!(f, "dynamic"),
            Type::List(e) => write!(f, "list[{}]", e),
            Type::Set(e) => write!(f, "set[{}]", e),
            Type::Map(e) => write!(f, "map[{}]", e),
            Type::Object(attrs) => {
                write!(f, "object{{")?;
                for (i, (name, t)) in attrs.iter().enumerate() {
                    if i != 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}:{}", name, t)?;
                }
                write!(f, "}}")
            }
            Type::Tuple(elems) => {
                write!(f, "tuple[")?;
                for (i, t) in elems.iter().enumerate() {
                    if i != 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", t)?;
                }
                write!(f, "]")
            }
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
