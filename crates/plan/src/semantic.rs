//! Semantic equality between prior and proposed values.
//!
//! Providers register a [`SemanticEquals`] capability per value type. When
//! a proposed value differs structurally from the prior one but the
//! capability says they mean the same thing, the prior value is kept.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tfattr_core::{
    AttrValue, Diagnostics, DynamicValue, ListValue, MapValue, ObjectValue, Path, TupleValue,
    Type, Value,
};

/// Provider-defined equality for values of one type.
pub trait SemanticEquals: Send + Sync {
    /// Whether `proposed` should be planned as `prior`. Both values are
    /// known and have the registered type.
    fn semantic_equals(&self, prior: &Value, proposed: &Value) -> (bool, Diagnostics);
}

impl<F> SemanticEquals for F
where
    F: Fn(&Value, &Value) -> (bool, Diagnostics) + Send + Sync,
{
    fn semantic_equals(&self, prior: &Value, proposed: &Value) -> (bool, Diagnostics) {
        self(prior, proposed)
    }
}

// ──────────────────────────────────────────────
// Registry
// ──────────────────────────────────────────────

/// Capabilities keyed by the type they apply to.
#[derive(Clone, Default)]
pub struct SemanticEqualityRegistry {
    by_type: HashMap<Type, Arc<dyn SemanticEquals>>,
}

impl SemanticEqualityRegistry {
    pub fn new() -> Self {
        SemanticEqualityRegistry::default()
    }

    /// Register `capability` for `ty`, returning any capability it replaces.
    pub fn register<S>(&mut self, ty: Type, capability: S) -> Option<Arc<dyn SemanticEquals>>
    where
        S: SemanticEquals + 'static,
    {
        self.by_type.insert(ty, Arc::new(capability))
    }

    pub fn with<S>(mut self, ty: Type, capability: S) -> Self
    where
        S: SemanticEquals + 'static,
    {
        self.register(ty, capability);
        self
    }

    pub fn get(&self, ty: &Type) -> Option<&dyn SemanticEquals> {
        self.by_type.get(ty).map(|c| c.as_ref())
    }

    pub fn contains(&self, ty: &Type) -> bool {
        self.by_type.contains_key(ty)
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl fmt::Debug for SemanticEqualityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<String> = self.by_type.keys().map(Type::to_string).collect();
        types.sort();
        f.debug_struct("SemanticEqualityRegistry")
            .field("types", &types)
            .finish()
    }
}

// ──────────────────────────────────────────────
// Request / response
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SemanticEqualityRequest {
    pub path: Path,
    pub prior_value: Value,
    pub proposed_new_value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SemanticEqualityResponse {
    /// The value to plan: the proposed value, the prior value, or the
    /// proposed value with some nested elements taken from the prior one.
    pub new_value: Value,
    pub diagnostics: Diagnostics,
}

/// Run semantic equality for one attribute.
///
/// Null and unknown values on either side are left alone, as are values
/// that are already equal or whose types differ. A capability registered
/// for the value type is consulted first; if it does not keep the prior
/// value, lists and tuples are compared by index, maps by key, objects by
/// attribute, and dynamic values by their underlying value. Sets are not
/// descended into since their elements have no stable identity.
pub fn value_semantic_equality(
    registry: &SemanticEqualityRegistry,
    req: &SemanticEqualityRequest,
) -> SemanticEqualityResponse {
    let mut diagnostics = Diagnostics::new();
    let new_value = compare(
        registry,
        &req.path,
        &req.prior_value,
        &req.proposed_new_value,
        &mut diagnostics,
    )
    .unwrap_or_else(|| req.proposed_new_value.clone());

    SemanticEqualityResponse {
        new_value,
        diagnostics,
    }
}

/// The value to plan at `path`, or `None` when the proposed value stands.
fn compare(
    registry: &SemanticEqualityRegistry,
    path: &Path,
    prior: &Value,
    proposed: &Value,
    diags: &mut Diagnostics,
) -> Option<Value> {
    if !prior.is_known() || !proposed.is_known() {
        return None;
    }
    if prior == proposed {
        return None;
    }

    let value_type = proposed.attr_type();
    if prior.attr_type() != value_type {
        return None;
    }

    if let Some(capability) = registry.get(&value_type) {
        tracing::trace!(
            path = %path,
            value_type = %value_type,
            "Calling provider defined type-based SemanticEquals"
        );
        let (use_prior, capability_diags) = capability.semantic_equals(prior, proposed);
        tracing::trace!(
            path = %path,
            value_type = %value_type,
            use_prior,
            "Called provider defined type-based SemanticEquals"
        );
        diags.append(capability_diags);
        if use_prior {
            return Some(prior.clone());
        }
    }

    match (prior, proposed) {
        (Value::List(p), Value::List(n)) => {
            let elements = compare_indexed(registry, p.elements(), n.elements(), diags, |i| {
                path.at_list_index(i)
            })?;
            rebuilt(ListValue::new(n.element_type().clone(), elements), diags)
        }
        (Value::Tuple(p), Value::Tuple(n)) => {
            let elements = compare_indexed(registry, p.elements(), n.elements(), diags, |i| {
                path.at_tuple_index(i)
            })?;
            rebuilt(TupleValue::new(n.element_types().to_vec(), elements), diags)
        }
        (Value::Map(p), Value::Map(n)) => {
            let prior_elements = p.elements();
            let mut elements = n.elements();
            let mut changed = false;
            for (key, element) in elements.iter_mut() {
                let Some(prior_element) = prior_elements.get(key) else {
                    continue;
                };
                let element_path = path.at_map_key(key.clone());
                if let Some(v) = compare(registry, &element_path, prior_element, element, diags) {
                    *element = v;
                    changed = true;
                }
            }
            if !changed {
                return None;
            }
            rebuilt(MapValue::new(n.element_type().clone(), elements), diags)
        }
        (Value::Object(p), Value::Object(n)) => {
            let prior_attributes = p.attributes();
            let mut attributes = n.attributes();
            let mut changed = false;
            for (name, attribute) in attributes.iter_mut() {
                let Some(prior_attribute) = prior_attributes.get(name) else {
                    continue;
                };
                let attribute_path = path.at_name(name.clone());
                if let Some(v) = compare(registry, &attribute_path, prior_attribute, attribute, diags)
                {
                    *attribute = v;
                    changed = true;
                }
            }
            if !changed {
                return None;
            }
            rebuilt(ObjectValue::new(n.attribute_types().clone(), attributes), diags)
        }
        (Value::Dynamic(p), Value::Dynamic(n)) => {
            let (prior_underlying, proposed_underlying) =
                (p.underlying_value()?, n.underlying_value()?);
            compare(registry, path, prior_underlying, proposed_underlying, diags)
                .map(|v| DynamicValue::new(v).into())
        }
        _ => None,
    }
}

fn compare_indexed(
    registry: &SemanticEqualityRegistry,
    prior: Vec<Value>,
    mut proposed: Vec<Value>,
    diags: &mut Diagnostics,
    path_at: impl Fn(usize) -> Path,
) -> Option<Vec<Value>> {
    let mut changed = false;
    for (i, (p, n)) in prior.iter().zip(proposed.iter_mut()).enumerate() {
        if let Some(v) = compare(registry, &path_at(i), p, n, diags) {
            *n = v;
            changed = true;
        }
    }
    changed.then_some(proposed)
}

fn rebuilt<T: Into<Value>>(built: (T, Diagnostics), diags: &mut Diagnostics) -> Option<Value> {
    let (value, build_diags) = built;
    if build_diags.has_error() {
        diags.append(build_diags);
        return None;
    }
    Some(value.into())
}
