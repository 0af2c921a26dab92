//! tfattr-core: typed attribute values for provider plugins.
//!
//! Values are tri-state: null, unknown (to be decided later), or known.
//! Every value carries a [`Type`] descriptor in all three states and
//! converts to and from the wire tree in [`interchange`].
//!
//! # Public API
//!
//! - [`Type`] -- type descriptors and path stepping
//! - [`Value`] and the per-kind structs ([`ListValue`], [`ObjectValue`], ...)
//! - [`AttrValue`] -- the capability set every kind implements
//! - [`Diagnostics`] -- the error channel for construction and binding
//! - [`reflect`] -- binding to and from native Rust data via serde
//! - [`function`] and [`schema`] -- definition checks

pub mod convert;
pub mod diag;
pub mod function;
pub mod path;
pub mod reflect;
pub mod schema;
pub mod types;
pub mod value;

pub use tfattr_interchange as interchange;

// ── Convenience re-exports ───────────────────────────────────────────

pub use convert::ConversionError;
pub use diag::{Diagnostic, Diagnostics, Severity};
pub use function::{DynamicParameter, ListReturn};
pub use path::{Path, PathStep};
pub use reflect::{BindError, BindOptions};
pub use schema::{ListAttribute, ListDefault, StaticListDefault};
pub use types::{PathStepError, Type};
pub use value::{
    AttrValue, BoolValue, DynamicValue, Int64Value, ListValue, MapValue, NumberValue,
    ObjectValue, Scalar, ScalarValue, SetValue, StringValue, TupleValue, Value, ValueState,
    NULL_VALUE_STRING, UNKNOWN_VALUE_STRING,
};
