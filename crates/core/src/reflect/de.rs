//! `serde::Deserializer` over wire values.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, DeserializeSeed, IntoDeserializer, Visitor};
use std::collections::{btree_map, BTreeMap};
use std::fmt;

use tfattr_interchange::{WireBody, WirePayload, WireType, WireValue};

use super::{conversion_error, BindOptions};
use crate::diag::Diagnostic;
use crate::path::Path;

/// Failure to bind a wire value into native data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindError {
    #[error("unhandled null value at {path}")]
    UnhandledNull { path: Path },
    #[error("unhandled unknown value at {path}")]
    UnhandledUnknown { path: Path },
    #[error("{message}")]
    Custom { path: Option<Path>, message: String },
}

impl BindError {
    pub fn path(&self) -> Option<&Path> {
        match self {
            BindError::UnhandledNull { path } | BindError::UnhandledUnknown { path } => Some(path),
            BindError::Custom { path, .. } => path.as_ref(),
        }
    }

    /// Attach `path` to an error raised without one.
    fn at(self, path: &Path) -> Self {
        match self {
            BindError::Custom {
                path: None,
                message,
            } => BindError::Custom {
                path: Some(path.clone()),
                message,
            },
            other => other,
        }
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        let path = self.path().cloned().unwrap_or_default();
        let hint = match &self {
            BindError::UnhandledNull { .. } => {
                "\n\nTarget type cannot handle null values. Use an Option target or allow unhandled values."
            }
            BindError::UnhandledUnknown { .. } => {
                "\n\nTarget type cannot handle unknown values. Allow unhandled values to receive an empty value instead."
            }
            BindError::Custom { .. } => "",
        };
        conversion_error(&path, format!("{}{}", self, hint))
    }
}

impl de::Error for BindError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        BindError::Custom {
            path: None,
            message: msg.to_string(),
        }
    }
}

// ──────────────────────────────────────────────
// Deserializer
// ──────────────────────────────────────────────

/// Deserializes a native value from a borrowed wire value.
pub struct WireDeserializer<'a> {
    value: &'a WireValue,
    options: BindOptions,
    path: Path,
}

impl<'a> WireDeserializer<'a> {
    pub fn new(value: &'a WireValue, options: BindOptions, path: Path) -> Self {
        WireDeserializer {
            value,
            options,
            path,
        }
    }

    /// Visit the empty value of the wire type in place of a null or
    /// unknown one.
    fn visit_empty<'de, V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        let ty = self.value.ty();
        if ty.is_dynamic() {
            return visitor.visit_unit();
        }
        let empty = empty_value(ty).map_err(|e| e.at(&self.path))?;
        // Nested placeholders inside an empty value are null; take them as
        // empty too.
        let options = BindOptions {
            unhandled_null_as_empty: true,
            ..self.options
        };
        WireDeserializer::new(&empty, options, self.path).deserialize_payload(visitor)
    }

    fn deserialize_payload<'de, V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        let payload = match self.value.body() {
            WireBody::Known(p) => p,
            WireBody::Null => {
                if self.options.unhandled_null_as_empty {
                    return self.visit_empty(visitor);
                }
                return Err(BindError::UnhandledNull { path: self.path });
            }
            WireBody::Unknown => {
                if self.options.unhandled_unknown_as_empty {
                    return self.visit_empty(visitor);
                }
                return Err(BindError::UnhandledUnknown { path: self.path });
            }
        };

        let visited = match payload {
            WirePayload::Bool(b) => visitor.visit_bool(*b),
            WirePayload::Number(d) => visit_number(*d, visitor).map_err(|e| e.at(&self.path)),
            WirePayload::String(s) => visitor.visit_string(s.clone()),
            WirePayload::Seq(items) => {
                let indexed = !matches!(self.value.ty(), WireType::Set(_));
                visitor.visit_seq(WireSeq {
                    iter: items.iter().enumerate(),
                    options: self.options,
                    path: &self.path,
                    indexed,
                })
            }
            WirePayload::Keyed(items) => {
                let object = matches!(self.value.ty(), WireType::Object(_));
                visitor.visit_map(WireMap {
                    iter: items.iter(),
                    pending: None,
                    options: self.options,
                    path: &self.path,
                    object,
                })
            }
        };
        visited.map_err(|e| e.at(&self.path))
    }
}

fn visit_number<'de, V: Visitor<'de>>(d: Decimal, visitor: V) -> Result<V::Value, BindError> {
    if d.fract().is_zero() {
        if let Some(i) = d.to_i64() {
            return visitor.visit_i64(i);
        }
        if let Some(u) = d.to_u64() {
            return visitor.visit_u64(u);
        }
    }
    match d.to_f64() {
        Some(f) => visitor.visit_f64(f),
        None => Err(de::Error::custom(format!("number {} out of range", d))),
    }
}

/// The empty value of a wire type: false, zero, the empty string, empty
/// collections, and objects or tuples of empty values. A placeholder has
/// no empty value and stays null.
fn empty_value(ty: &WireType) -> Result<WireValue, BindError> {
    let payload = match ty {
        WireType::Bool => WirePayload::Bool(false),
        WireType::Number => WirePayload::Number(Decimal::ZERO),
        WireType::String => WirePayload::String(String::new()),
        WireType::List(_) | WireType::Set(_) => WirePayload::Seq(Vec::new()),
        WireType::Map(_) => WirePayload::Keyed(Default::default()),
        WireType::Object(attrs) => WirePayload::Keyed(
            attrs
                .iter()
                .map(|(name, t)| empty_value(t).map(|v| (name.clone(), v)))
                .collect::<Result<BTreeMap<_, _>, BindError>>()?,
        ),
        WireType::Tuple(elems) => WirePayload::Seq(
            elems
                .iter()
                .map(empty_value)
                .collect::<Result<Vec<_>, BindError>>()?,
        ),
        WireType::Dynamic => return Ok(WireValue::null(WireType::Dynamic)),
    };
    WireValue::new(ty.clone(), payload).map_err(de::Error::custom)
}

impl<'de, 'a> de::Deserializer<'de> for WireDeserializer<'a> {
    type Error = BindError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        self.deserialize_payload(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        match self.value.body() {
            WireBody::Null => visitor.visit_none(),
            WireBody::Unknown if self.options.unhandled_unknown_as_empty => visitor.visit_none(),
            WireBody::Unknown => Err(BindError::UnhandledUnknown { path: self.path }),
            WireBody::Known(_) => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        if self.value.is_null() {
            return visitor.visit_unit();
        }
        self.deserialize_payload(visitor)
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        self.deserialize_f64(visitor)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        match self.value.payload() {
            Some(WirePayload::Number(d)) => match d.to_f64() {
                Some(f) => visitor.visit_f64(f),
                None => Err(BindError::Custom {
                    path: Some(self.path),
                    message: format!("number {} out of range for f64", d),
                }),
            },
            _ => self.deserialize_payload(visitor),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, BindError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, BindError> {
        match self.value.payload() {
            Some(WirePayload::String(s)) => visitor
                .visit_enum(s.clone().into_deserializer())
                .map_err(|e: BindError| e.at(&self.path)),
            _ => self.deserialize_payload(visitor),
        }
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        visitor.visit_unit()
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 char str string
        bytes byte_buf unit_struct seq tuple tuple_struct map struct identifier
    }
}

// ── Access ──────────────────────────────────────────────────────────

struct WireSeq<'a, 'p> {
    iter: std::iter::Enumerate<std::slice::Iter<'a, WireValue>>,
    options: BindOptions,
    path: &'p Path,
    /// Sets have no stable index; their elements report the set's path.
    indexed: bool,
}

impl<'de, 'a, 'p> de::SeqAccess<'de> for WireSeq<'a, 'p> {
    type Error = BindError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, BindError> {
        let Some((i, value)) = self.iter.next() else {
            return Ok(None);
        };
        let path = if self.indexed {
            self.path.at_list_index(i)
        } else {
            self.path.clone()
        };
        seed.deserialize(WireDeserializer::new(value, self.options, path.clone()))
            .map(Some)
            .map_err(|e| e.at(&path))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct WireMap<'a, 'p> {
    iter: btree_map::Iter<'a, String, WireValue>,
    pending: Option<(&'a String, &'a WireValue)>,
    options: BindOptions,
    path: &'p Path,
    /// Object attributes and map keys use different path steps.
    object: bool,
}

impl<'de, 'a, 'p> de::MapAccess<'de> for WireMap<'a, 'p> {
    type Error = BindError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, BindError> {
        let Some((key, value)) = self.iter.next() else {
            return Ok(None);
        };
        self.pending = Some((key, value));
        seed.deserialize(key.as_str().into_deserializer()).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, BindError> {
        let (key, value) = self
            .pending
            .take()
            .ok_or_else(|| <BindError as de::Error>::custom("value requested before key"))?;
        let path = if self.object {
            self.path.at_name(key.clone())
        } else {
            self.path.at_map_key(key.clone())
        };
        seed.deserialize(WireDeserializer::new(value, self.options, path.clone()))
            .map_err(|e| e.at(&path))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::into_native;
    use crate::types::Type;
    use crate::value::{AttrValue, ListValue, StringValue, Value};
    use serde::Deserialize;

    fn strings(items: Vec<Value>) -> WireValue {
        ListValue::new_must(Type::String, items).to_wire().unwrap()
    }

    #[test]
    fn option_targets_take_null() {
        let wire = strings(vec![StringValue::new("a").into(), StringValue::null().into()]);
        let out: Vec<Option<String>> =
            into_native(&wire, BindOptions::default(), &Path::empty()).unwrap();
        assert_eq!(out, vec![Some("a".to_string()), None]);
    }

    #[test]
    fn unhandled_null_is_an_error_with_path() {
        let wire = strings(vec![StringValue::null().into()]);
        let err = into_native::<Vec<String>>(&wire, BindOptions::default(), &Path::root("tags"))
            .unwrap_err();
        let d = err.errors().next().unwrap();
        assert_eq!(d.path, Some(Path::root("tags").at_list_index(0)));
        assert!(d.detail.contains("unhandled null value"));
    }

    #[test]
    fn unhandled_values_become_empty_when_allowed() {
        let wire = strings(vec![StringValue::null().into(), StringValue::unknown().into()]);
        let out: Vec<String> =
            into_native(&wire, BindOptions::allow_unhandled(true), &Path::empty()).unwrap();
        assert_eq!(out, vec![String::new(), String::new()]);
    }

    #[test]
    fn flags_are_independent() {
        let wire = strings(vec![StringValue::unknown().into()]);
        let opts = BindOptions {
            unhandled_null_as_empty: true,
            unhandled_unknown_as_empty: false,
        };
        assert!(into_native::<Vec<String>>(&wire, opts, &Path::empty()).is_err());

        let opts = BindOptions {
            unhandled_null_as_empty: false,
            unhandled_unknown_as_empty: true,
        };
        let out: Vec<Option<String>> = into_native(&wire, opts, &Path::empty()).unwrap();
        assert_eq!(out, vec![None]);
    }

    #[test]
    fn empty_object_fills_every_field() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Pair {
            name: String,
            count: i64,
            tags: Vec<String>,
        }
        let ty = Type::object([
            ("name", Type::String),
            ("count", Type::Int64),
            ("tags", Type::list(Type::String)),
        ]);
        let wire = ty.null_value().to_wire().unwrap();
        let out: Pair = into_native(&wire, BindOptions::allow_unhandled(true), &Path::empty()).unwrap();
        assert_eq!(
            out,
            Pair {
                name: String::new(),
                count: 0,
                tags: vec![],
            }
        );
    }

    #[test]
    fn enums_bind_from_strings() {
        #[derive(Debug, Deserialize, PartialEq)]
        #[serde(rename_all = "lowercase")]
        enum Mode {
            Allow,
            Deny,
        }
        let wire = strings(vec![StringValue::new("deny").into(), StringValue::new("allow").into()]);
        let out: Vec<Mode> = into_native(&wire, BindOptions::default(), &Path::empty()).unwrap();
        assert_eq!(out, vec![Mode::Deny, Mode::Allow]);
    }
}
