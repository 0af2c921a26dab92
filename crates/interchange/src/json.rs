//! JSON encoding of wire values.
//!
//! Each node is an object with a `type` field and exactly one of
//! `"null": true`, `"unknown": true`, or `"value": <payload>`. Composite
//! payloads hold nested node objects so element markers survive the trip.
//! Numbers are written as strings to keep their precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::types::WireType;
use crate::value::{WireBody, WireError, WirePayload, WireValue};

/// Encode a wire value as JSON.
pub fn to_json(v: &WireValue) -> serde_json::Value {
    let mut node = serde_json::Map::new();
    node.insert("type".to_string(), v.ty().to_json());
    match v.body() {
        WireBody::Null => {
            node.insert("null".to_string(), serde_json::Value::Bool(true));
        }
        WireBody::Unknown => {
            node.insert("unknown".to_string(), serde_json::Value::Bool(true));
        }
        WireBody::Known(payload) => {
            node.insert("value".to_string(), payload_to_json(payload));
        }
    }
    serde_json::Value::Object(node)
}

fn payload_to_json(p: &WirePayload) -> serde_json::Value {
    match p {
        WirePayload::Bool(b) => serde_json::Value::Bool(*b),
        WirePayload::Number(d) => serde_json::Value::String(d.to_string()),
        WirePayload::String(s) => serde_json::Value::String(s.clone()),
        WirePayload::Seq(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        WirePayload::Keyed(items) => {
            let mut map = serde_json::Map::new();
            for (k, v) in items {
                map.insert(k.clone(), to_json(v));
            }
            serde_json::Value::Object(map)
        }
    }
}

/// Decode a wire value from JSON. The result is validated the same way
/// as values built with [`WireValue::new`].
pub fn from_json(v: &serde_json::Value) -> Result<WireValue, WireError> {
    let obj = v
        .as_object()
        .ok_or_else(|| WireError::Json("wire value must be a JSON object".to_string()))?;
    let ty = WireType::from_json(
        obj.get("type")
            .ok_or_else(|| WireError::Json("missing 'type' field".to_string()))?,
    )?;

    let flag = |name: &str| obj.get(name).and_then(|f| f.as_bool()).unwrap_or(false);
    let value = obj.get("value");

    match (flag("null"), flag("unknown"), value) {
        (true, false, None) => Ok(WireValue::null(ty)),
        (false, true, None) => Ok(WireValue::unknown(ty)),
        (false, false, Some(value)) => {
            let payload = payload_from_json(&ty, value)?;
            WireValue::new(ty, payload)
        }
        _ => Err(WireError::Json(
            "wire value must have exactly one of 'null', 'unknown', or 'value'".to_string(),
        )),
    }
}

fn payload_from_json(ty: &WireType, v: &serde_json::Value) -> Result<WirePayload, WireError> {
    match ty {
        WireType::Bool => v
            .as_bool()
            .map(WirePayload::Bool)
            .ok_or_else(|| WireError::Json(format!("expected boolean, got {}", v))),
        WireType::Number => {
            let text = match v {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                other => return Err(WireError::Json(format!("expected number, got {}", other))),
            };
            parse_decimal(&text).map(WirePayload::Number)
        }
        WireType::String => v
            .as_str()
            .map(|s| WirePayload::String(s.to_string()))
            .ok_or_else(|| WireError::Json(format!("expected string, got {}", v))),
        WireType::List(_) | WireType::Set(_) | WireType::Tuple(_) => {
            let arr = v
                .as_array()
                .ok_or_else(|| WireError::Json(format!("expected array for {}", ty)))?;
            let items: Result<Vec<_>, _> = arr.iter().map(from_json).collect();
            Ok(WirePayload::Seq(items?))
        }
        WireType::Map(_) | WireType::Object(_) => {
            let obj = v
                .as_object()
                .ok_or_else(|| WireError::Json(format!("expected object for {}", ty)))?;
            let mut items = BTreeMap::new();
            for (k, item) in obj {
                items.insert(k.clone(), from_json(item)?);
            }
            Ok(WirePayload::Keyed(items))
        }
        WireType::Dynamic => Err(WireError::Json(
            "a dynamic type can only hold null or unknown values".to_string(),
        )),
    }
}

fn parse_decimal(text: &str) -> Result<Decimal, WireError> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|e| WireError::Json(format!("invalid number '{}': {}", text, e)))
}

impl Serialize for WireValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_json(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WireValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = serde_json::Value::deserialize(deserializer)?;
        from_json(&v).map_err(serde::de::Error::custom)
    }
}
