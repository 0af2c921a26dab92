//! Wire types.
//!
//! A [`WireType`] describes the shape of a [`WireValue`](crate::WireValue).
//! Its JSON form follows the usual type-expression convention: primitives
//! are bare strings (`"string"`), composites are two-element arrays
//! (`["list", "string"]`, `["object", {"name": "string"}]`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::value::WireError;

// ──────────────────────────────────────────────
// Wire type
// ──────────────────────────────────────────────

/// The type of a wire value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub enum WireType {
    Bool,
    Number,
    String,
    List(Box<WireType>),
    Set(Box<WireType>),
    Map(Box<WireType>),
    Object(BTreeMap<String, WireType>),
    Tuple(Vec<WireType>),
    /// Placeholder for a type decided by the value's content.
    Dynamic,
}

impl WireType {
    pub fn list(element: WireType) -> Self {
        WireType::List(Box::new(element))
    }

    pub fn set(element: WireType) -> Self {
        WireType::Set(Box::new(element))
    }

    pub fn map(element: WireType) -> Self {
        WireType::Map(Box::new(element))
    }

    pub fn object<I, K>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, WireType)>,
        K: Into<String>,
    {
        WireType::Object(attributes.into_iter().map(|(k, t)| (k.into(), t)).collect())
    }

    /// True only for the dynamic placeholder itself, not for composites
    /// that contain it.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, WireType::Dynamic)
    }

    /// True if the placeholder appears anywhere in this type.
    pub fn contains_dynamic(&self) -> bool {
        match self {
            WireType::Dynamic => true,
            WireType::List(e) | WireType::Set(e) | WireType::Map(e) => e.contains_dynamic(),
            WireType::Object(attrs) => attrs.values().any(WireType::contains_dynamic),
            WireType::Tuple(elems) => elems.iter().any(WireType::contains_dynamic),
            WireType::Bool | WireType::Number | WireType::String => false,
        }
    }

    /// Element type of a list, set, or map.
    pub fn element_type(&self) -> Option<&WireType> {
        match self {
            WireType::List(e) | WireType::Set(e) | WireType::Map(e) => Some(e),
            _ => None,
        }
    }

    /// Reports whether a value of this type may be placed where `other`
    /// is declared. The dynamic placeholder accepts any type; composites
    /// compare their element and attribute types the same way.
    pub fn usable_as(&self, other: &WireType) -> bool {
        match (self, other) {
            (_, WireType::Dynamic) => true,
            (WireType::List(a), WireType::List(b))
            | (WireType::Set(a), WireType::Set(b))
            | (WireType::Map(a), WireType::Map(b)) => a.usable_as(b),
            (WireType::Object(a), WireType::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(name, t)| b.get(name).is_some_and(|o| t.usable_as(o)))
            }
            (WireType::Tuple(a), WireType::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.usable_as(y))
            }
            (a, b) => a == b,
        }
    }

    /// Encode as a JSON type expression.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;
        match self {
            WireType::Bool => json!("bool"),
            WireType::Number => json!("number"),
            WireType::String => json!("string"),
            WireType::Dynamic => json!("dynamic"),
            WireType::List(e) => json!(["list", e.to_json()]),
            WireType::Set(e) => json!(["set", e.to_json()]),
            WireType::Map(e) => json!(["map", e.to_json()]),
            WireType::Object(attrs) => {
                let mut map = serde_json::Map::new();
                for (name, t) in attrs {
                    map.insert(name.clone(), t.to_json());
                }
                json!(["object", map])
            }
            WireType::Tuple(elems) => {
                let arr: Vec<serde_json::Value> = elems.iter().map(WireType::to_json).collect();
                json!(["tuple", arr])
            }
        }
    }

    /// Parse a JSON type expression.
    pub fn from_json(v: &serde_json::Value) -> Result<WireType, WireError> {
        if let Some(name) = v.as_str() {
            return match name {
                "bool" => Ok(WireType::Bool),
                "number" => Ok(WireType::Number),
                "string" => Ok(WireType::String),
                "dynamic" => Ok(WireType::Dynamic),
                other => Err(WireError::Json(format!("unknown primitive type '{}'", other))),
            };
        }

        let arr = v
            .as_array()
            .filter(|a| a.len() == 2)
            .ok_or_else(|| WireError::Json(format!("invalid type expression: {}", v)))?;
        let kind = arr[0]
            .as_str()
            .ok_or_else(|| WireError::Json("type kind must be a string".to_string()))?;
        let arg = &arr[1];

        match kind {
            "list" => Ok(WireType::list(WireType::from_json(arg)?)),
            "set" => Ok(WireType::set(WireType::from_json(arg)?)),
            "map" => Ok(WireType::map(WireType::from_json(arg)?)),
            "object" => {
                let obj = arg.as_object().ok_or_else(|| {
                    WireError::Json("object type attributes must be a JSON object".to_string())
                })?;
                let mut attrs = BTreeMap::new();
                for (name, t) in obj {
                    attrs.insert(name.clone(), WireType::from_json(t)?);
                }
                Ok(WireType::Object(attrs))
            }
            "tuple" => {
                let elems = arg.as_array().ok_or_else(|| {
                    WireError::Json("tuple type elements must be a JSON array".to_string())
                })?;
                let elems: Result<Vec<_>, _> = elems.iter().map(WireType::from_json).collect();
                Ok(WireType::Tuple(elems?))
            }
            other => Err(WireError::Json(format!("unknown type kind '{}'", other))),
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireType::Bool => write!(f, "bool"),
            WireType::Number => write!(f, "number"),
            WireType::String => write!(f, "string"),
            WireType::Dynamic => write!(f, "dynamic"),
            WireType::List(e) => write!(f, "list({})", e),
            WireType::Set(e) => write!(f, "set({})", e),
            WireType::Map(e) => write!(f, "map({})", e),
            WireType::Object(attrs) => {
                write!(f, "object({{")?;
                for (i, (name, t)) in attrs.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", name, t)?;
                }
                write!(f, "}})")
            }
            WireType::Tuple(elems) => {
                write!(f, "tuple([")?;
                for (i, t) in elems.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", t)?;
                }
                write!(f, "])")
            }
        }
    }
}

impl From<WireType> for serde_json::Value {
    fn from(t: WireType) -> Self {
        t.to_json()
    }
}

impl TryFrom<serde_json::Value> for WireType {
    type Error = WireError;

    fn try_from(v: serde_json::Value) -> Result<Self, Self::Error> {
        WireType::from_json(&v)
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dynamic_accepts_everything() {
        assert!(WireType::String.usable_as(&WireType::Dynamic));
        assert!(WireType::list(WireType::Number).usable_as(&WireType::Dynamic));
        assert!(!WireType::Dynamic.usable_as(&WireType::String));
    }

    #[test]
    fn composite_usable_as_compares_elements() {
        let concrete = WireType::list(WireType::String);
        assert!(concrete.usable_as(&WireType::list(WireType::Dynamic)));
        assert!(!concrete.usable_as(&WireType::set(WireType::String)));
        assert!(!concrete.usable_as(&WireType::list(WireType::Number)));
    }

    #[test]
    fn object_usable_as_requires_same_attribute_names() {
        let a = WireType::object([("name", WireType::String)]);
        let b = WireType::object([("name", WireType::Dynamic)]);
        let c = WireType::object([("id", WireType::String)]);
        assert!(a.usable_as(&b));
        assert!(!a.usable_as(&c));
    }

    #[test]
    fn contains_dynamic_walks_nested_types() {
        let t = WireType::object([("tags", WireType::map(WireType::Dynamic))]);
        assert!(t.contains_dynamic());
        assert!(!t.is_dynamic());
        assert!(!WireType::Tuple(vec![WireType::Bool]).contains_dynamic());
    }

    #[test]
    fn type_expression_json() {
        let t = WireType::object([
            ("ids", WireType::list(WireType::Number)),
            ("pair", WireType::Tuple(vec![WireType::String, WireType::Bool])),
        ]);
        let encoded = t.to_json();
        assert_eq!(
            encoded,
            json!(["object", {
                "ids": ["list", "number"],
                "pair": ["tuple", ["string", "bool"]]
            }])
        );
        assert_eq!(WireType::from_json(&encoded).unwrap(), t);
    }

    #[test]
    fn rejects_unknown_kinds() {
        assert!(WireType::from_json(&json!("float")).is_err());
        assert!(WireType::from_json(&json!(["vector", "number"])).is_err());
        assert!(WireType::from_json(&json!(["list"])).is_err());
    }

    #[test]
    fn display_uses_type_expression_syntax() {
        let t = WireType::object([("a", WireType::list(WireType::String))]);
        assert_eq!(t.to_string(), "object({a=list(string)})");
    }
}
