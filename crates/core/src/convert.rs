//! Conversion between attribute values and wire values.
//!
//! Encoding lives on each value kind (`AttrValue::to_wire`); this module
//! holds the pieces shared across kinds: dynamic element resolution for
//! collections and decoding by type descriptor.

use tfattr_interchange::{WireError, WireType, WireValue};

use crate::types::Type;
use crate::value::{
    AttrValue, BoolValue, DynamicValue, Int64Value, ListValue, MapValue, NumberValue,
    ObjectValue, SetValue, StringValue, TupleValue, Value,
};

/// Failure to convert between attribute and wire values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error(transparent)]
    Wire(#[from] WireError),
    #[error("wire type {got} is not usable as {expected}")]
    TypeMismatch { expected: Type, got: WireType },
    #[error("cannot decode a {kind} payload as {expected}")]
    Payload { expected: Type, kind: &'static str },
    #[error("wire object is missing attribute {name:?}")]
    MissingAttribute { name: String },
}

/// Convert collection elements and decide the collection's wire element
/// type.
///
/// A declared element type without `dynamic` is used as-is. Otherwise the
/// first element whose wire type is fully concrete decides it, falling back
/// to the first element that is not the bare placeholder. Null or unknown
/// elements whose type the adopted one can stand in for are re-typed to
/// match. When no element resolves, the declared placeholder type is kept.
pub(crate) fn elements_to_wire<'a>(
    element_type: &Type,
    elements: impl Iterator<Item = &'a Value>,
) -> Result<(WireType, Vec<WireValue>), ConversionError> {
    let mut values = elements
        .map(AttrValue::to_wire)
        .collect::<Result<Vec<_>, _>>()?;

    if !element_type.contains_dynamic() {
        return Ok((element_type.wire_type(), values));
    }

    let adopted = values
        .iter()
        .map(WireValue::ty)
        .find(|ty| !ty.contains_dynamic())
        .or_else(|| values.iter().map(WireValue::ty).find(|ty| !ty.is_dynamic()))
        .cloned();

    let Some(adopted) = adopted else {
        tracing::trace!(
            element_type = %element_type,
            elements = values.len(),
            "no element resolves dynamic element type"
        );
        return Ok((element_type.wire_type(), values));
    };

    for value in values.iter_mut() {
        if value.ty() == &adopted || !adopted.usable_as(value.ty()) {
            continue;
        }
        if value.is_null() {
            *value = WireValue::null(adopted.clone());
        } else if value.is_unknown() {
            *value = WireValue::unknown(adopted.clone());
        }
    }

    tracing::trace!(
        element_type = %element_type,
        resolved = %adopted,
        "resolved dynamic element type"
    );
    Ok((adopted, values))
}

/// Decode `wire` as a value of `ty`.
pub(crate) fn value_from_wire(ty: &Type, wire: &WireValue) -> Result<Value, ConversionError> {
    if ty.is_dynamic() {
        return DynamicValue::from_wire(wire).map(Value::from);
    }

    if !wire.ty().usable_as(&ty.wire_type()) {
        return Err(ConversionError::TypeMismatch {
            expected: ty.clone(),
            got: wire.ty().clone(),
        });
    }

    let value = match ty {
        Type::Bool => BoolValue::from_wire(wire)?.into(),
        Type::Number => NumberValue::from_wire(wire)?.into(),
        Type::Int64 => Int64Value::from_wire(wire)?.into(),
        Type::String => StringValue::from_wire(wire)?.into(),
        Type::List(e) => ListValue::from_wire(e, wire)?.into(),
        Type::Set(e) => SetValue::from_wire(e, wire)?.into(),
        Type::Map(e) => MapValue::from_wire(e, wire)?.into(),
        Type::Object(attrs) => ObjectValue::from_wire(attrs, wire)?.into(),
        Type::Tuple(elems) => TupleValue::from_wire(elems, wire)?.into(),
        Type::Dynamic => DynamicValue::from_wire(wire)?.into(),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tfattr_interchange::WirePayload;

    #[test]
    fn concrete_element_type_is_kept() {
        let elements: Vec<Value> = vec![StringValue::null().into()];
        let (ty, values) = elements_to_wire(&Type::String, elements.iter()).unwrap();
        assert_eq!(ty, WireType::String);
        assert_eq!(values, vec![WireValue::null(WireType::String)]);
    }

    #[test]
    fn nested_placeholder_resolves_from_content() {
        let inner = |v: Value| -> Value {
            ListValue::new_must(Type::Dynamic, vec![v]).into()
        };
        let elements = vec![
            ListValue::null(Type::Dynamic).into(),
            inner(DynamicValue::new(BoolValue::new(true)).into()),
        ];
        let (ty, values) =
            elements_to_wire(&Type::list(Type::Dynamic), elements.iter()).unwrap();
        assert_eq!(ty, WireType::list(WireType::Bool));
        assert_eq!(values[0], WireValue::null(WireType::list(WireType::Bool)));
    }

    #[test]
    fn type_mismatch_is_reported() {
        let wire = StringValue::new("x").to_wire().unwrap();
        let err = value_from_wire(&Type::Bool, &wire).unwrap_err();
        assert_eq!(
            err,
            ConversionError::TypeMismatch {
                expected: Type::Bool,
                got: WireType::String,
            }
        );
    }

    #[test]
    fn object_attribute_decodes_through_dynamic() {
        let attrs: BTreeMap<String, Type> =
            [("a".to_string(), Type::Dynamic)].into_iter().collect();
        let wire = WireValue::new(
            WireType::object([("a", WireType::String)]),
            WirePayload::Keyed(
                [("a".to_string(), WireValue::null(WireType::String))]
                    .into_iter()
                    .collect(),
            ),
        )
        .unwrap();
        let v = value_from_wire(&Type::Object(attrs), &wire).unwrap();
        assert!(v.is_known());
    }

    #[test]
    fn dynamic_target_decodes_by_wire_type() {
        let wire = NumberValue::new(3).to_wire().unwrap();
        let v = value_from_wire(&Type::Dynamic, &wire).unwrap();
        assert_eq!(v, Value::from(DynamicValue::new(NumberValue::new(3))));
    }
}
