//! tfattr-plan: plan-time handling of attribute values.
//!
//! [`value_semantic_equality`] lets provider-defined comparisons keep a
//! prior value when a proposed new value means the same thing, so the
//! plan shows no difference.

pub mod semantic;

pub use semantic::{
    value_semantic_equality, SemanticEqualityRegistry, SemanticEqualityRequest,
    SemanticEqualityResponse, SemanticEquals,
};
