//! Wire values and their validation.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

use crate::types::WireType;

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// A step into a wire value, used to locate validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WirePathStep {
    AttributeName(String),
    ElementKeyString(String),
    ElementKeyInt(usize),
}

/// Location of a node inside a wire value, relative to the value being
/// validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WirePath(pub Vec<WirePathStep>);

impl WirePath {
    pub fn root() -> Self {
        WirePath(Vec::new())
    }

    pub fn with(&self, step: WirePathStep) -> Self {
        let mut steps = self.0.clone();
        steps.push(step);
        WirePath(steps)
    }
}

impl fmt::Display for WirePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(root)");
        }
        for step in &self.0 {
            match step {
                WirePathStep::AttributeName(name) => write!(f, ".{}", name)?,
                WirePathStep::ElementKeyString(key) => write!(f, "[{:?}]", key)?,
                WirePathStep::ElementKeyInt(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

/// Errors from building, validating, or decoding wire values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("{path}: a dynamic type can only hold null or unknown values")]
    DynamicKnown { path: WirePath },

    #[error("{path}: payload of kind {got} does not match type {expected}")]
    PayloadMismatch {
        path: WirePath,
        expected: WireType,
        got: &'static str,
    },

    #[error("{path}: element of type {got} cannot be used as {expected}")]
    ElementType {
        path: WirePath,
        expected: WireType,
        got: WireType,
    },

    #[error("{path}: elements must all share one type when the element type is dynamic, found {first} and {other}")]
    MixedElementTypes {
        path: WirePath,
        first: WireType,
        other: WireType,
    },

    #[error("{path}: missing attribute {name:?}")]
    MissingAttribute { path: WirePath, name: String },

    #[error("{path}: unexpected attribute {name:?}")]
    UnexpectedAttribute { path: WirePath, name: String },

    #[error("{path}: expected {expected} tuple elements, got {got}")]
    TupleLength {
        path: WirePath,
        expected: usize,
        got: usize,
    },

    #[error("invalid wire JSON: {0}")]
    Json(String),
}

// ──────────────────────────────────────────────
// Values
// ──────────────────────────────────────────────

/// Concrete content of a known wire value.
#[derive(Debug, Clone, PartialEq)]
pub enum WirePayload {
    Bool(bool),
    Number(Decimal),
    String(String),
    /// Elements of a list, set, or tuple.
    Seq(Vec<WireValue>),
    /// Elements of a map or attributes of an object.
    Keyed(BTreeMap<String, WireValue>),
}

impl WirePayload {
    pub fn kind(&self) -> &'static str {
        match self {
            WirePayload::Bool(_) => "bool",
            WirePayload::Number(_) => "number",
            WirePayload::String(_) => "string",
            WirePayload::Seq(_) => "sequence",
            WirePayload::Keyed(_) => "mapping",
        }
    }
}

/// The null marker, the unknown marker, or a known payload.
#[derive(Debug, Clone, PartialEq)]
pub enum WireBody {
    Null,
    Unknown,
    Known(WirePayload),
}

/// A typed node of the wire tree.
#[derive(Debug, Clone, PartialEq)]
pub struct WireValue {
    ty: WireType,
    body: WireBody,
}

impl WireValue {
    /// A null marker of the given type.
    pub fn null(ty: WireType) -> Self {
        WireValue {
            ty,
            body: WireBody::Null,
        }
    }

    /// An unknown marker of the given type.
    pub fn unknown(ty: WireType) -> Self {
        WireValue {
            ty,
            body: WireBody::Unknown,
        }
    }

    /// A known value. The payload is validated against `ty`; nested
    /// values were validated when they were built.
    pub fn new(ty: WireType, payload: WirePayload) -> Result<Self, WireError> {
        validate_value(&ty, &payload)?;
        Ok(WireValue {
            ty,
            body: WireBody::Known(payload),
        })
    }

    pub fn ty(&self) -> &WireType {
        &self.ty
    }

    pub fn body(&self) -> &WireBody {
        &self.body
    }

    pub fn payload(&self) -> Option<&WirePayload> {
        match &self.body {
            WireBody::Known(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.body, WireBody::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.body, WireBody::Unknown)
    }

    pub fn is_known(&self) -> bool {
        matches!(self.body, WireBody::Known(_))
    }

    /// True if neither this node nor any nested node is unknown.
    pub fn is_fully_known(&self) -> bool {
        match &self.body {
            WireBody::Null => true,
            WireBody::Unknown => false,
            WireBody::Known(WirePayload::Seq(items)) => items.iter().all(WireValue::is_fully_known),
            WireBody::Known(WirePayload::Keyed(items)) => {
                items.values().all(WireValue::is_fully_known)
            }
            WireBody::Known(_) => true,
        }
    }
}

// ──────────────────────────────────────────────
// Validation
// ──────────────────────────────────────────────

/// Check a known payload against the type it is declared with.
///
/// Only the outermost level is inspected: nested [`WireValue`]s are
/// checked for type compatibility, not re-validated.
pub fn validate_value(ty: &WireType, payload: &WirePayload) -> Result<(), WireError> {
    let root = WirePath::root();
    match (ty, payload) {
        (WireType::Dynamic, _) => Err(WireError::DynamicKnown { path: root }),
        (WireType::Bool, WirePayload::Bool(_))
        | (WireType::Number, WirePayload::Number(_))
        | (WireType::String, WirePayload::String(_)) => Ok(()),
        (WireType::List(elem), WirePayload::Seq(items))
        | (WireType::Set(elem), WirePayload::Seq(items)) => {
            let indexed = items
                .iter()
                .enumerate()
                .map(|(i, v)| (root.with(WirePathStep::ElementKeyInt(i)), v));
            validate_elements(elem, indexed)
        }
        (WireType::Map(elem), WirePayload::Keyed(items)) => {
            let keyed = items
                .iter()
                .map(|(k, v)| (root.with(WirePathStep::ElementKeyString(k.clone())), v));
            validate_elements(elem, keyed)
        }
        (WireType::Object(attrs), WirePayload::Keyed(items)) => {
            for (name, attr_ty) in attrs {
                let path = root.with(WirePathStep::AttributeName(name.clone()));
                let value = items.get(name).ok_or_else(|| WireError::MissingAttribute {
                    path: root.clone(),
                    name: name.clone(),
                })?;
                if !value.ty().usable_as(attr_ty) {
                    return Err(WireError::ElementType {
                        path,
                        expected: attr_ty.clone(),
                        got: value.ty().clone(),
                    });
                }
            }
            if let Some(extra) = items.keys().find(|k| !attrs.contains_key(*k)) {
                return Err(WireError::UnexpectedAttribute {
                    path: root,
                    name: extra.clone(),
                });
            }
            Ok(())
        }
        (WireType::Tuple(elems), WirePayload::Seq(items)) => {
            if elems.len() != items.len() {
                return Err(WireError::TupleLength {
                    path: root,
                    expected: elems.len(),
                    got: items.len(),
                });
            }
            for (i, (elem_ty, value)) in elems.iter().zip(items).enumerate() {
                if !value.ty().usable_as(elem_ty) {
                    return Err(WireError::ElementType {
                        path: root.with(WirePathStep::ElementKeyInt(i)),
                        expected: elem_ty.clone(),
                        got: value.ty().clone(),
                    });
                }
            }
            Ok(())
        }
        (ty, payload) => Err(WireError::PayloadMismatch {
            path: root,
            expected: ty.clone(),
            got: payload.kind(),
        }),
    }
}

/// Collection elements must be usable as the element type. When the
/// element type involves the dynamic placeholder the elements must also
/// agree with each other.
fn validate_elements<'a>(
    elem: &WireType,
    items: impl Iterator<Item = (WirePath, &'a WireValue)>,
) -> Result<(), WireError> {
    let mut first: Option<&WireType> = None;
    for (path, value) in items {
        if !value.ty().usable_as(elem) {
            return Err(WireError::ElementType {
                path,
                expected: elem.clone(),
                got: value.ty().clone(),
            });
        }
        if elem.contains_dynamic() {
            match first {
                None => first = Some(value.ty()),
                Some(f) if f != value.ty() => {
                    return Err(WireError::MixedElementTypes {
                        path,
                        first: f.clone(),
                        other: value.ty().clone(),
                    });
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
