//! tfattr-interchange: the wire-level value tree.
//!
//! Every node carries a [`WireType`] and one of three bodies: an explicit
//! null marker, an explicit unknown marker, or a known payload. Composite
//! payloads nest further [`WireValue`]s so each element keeps its own
//! marker. [`WireType::Dynamic`] is a placeholder for a type decided at
//! runtime; it may only ever hold null or unknown.
//!
//! The JSON form produced by [`to_json`] and read by [`from_json`] is the
//! encoding used when a wire tree has to leave the process.

pub mod json;
pub mod types;
pub mod value;

pub use json::{from_json, to_json};
pub use types::WireType;
pub use value::{WireBody, WireError, WirePath, WirePathStep, WirePayload, WireValue};
