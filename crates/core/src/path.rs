//! Attribute paths: where in a configuration a value or diagnostic lives.

use std::fmt;

use crate::value::Value;

/// One step into a composite value.
#[derive(Debug, Clone, PartialEq)]
pub enum PathStep {
    /// An object attribute.
    AttributeName(String),
    /// A map key.
    ElementKeyString(String),
    /// A list or tuple index.
    ElementKeyInt(i64),
    /// A set element, identified by its value.
    ElementKeyValue(Value),
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::AttributeName(name) => write!(f, "{}", name),
            PathStep::ElementKeyString(key) => write!(f, "[{:?}]", key),
            PathStep::ElementKeyInt(idx) => write!(f, "[{}]", idx),
            PathStep::ElementKeyValue(v) => write!(f, "[Value({})]", v),
        }
    }
}

/// A sequence of steps from the root of a schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    pub fn empty() -> Self {
        Path::default()
    }

    pub fn root(name: impl Into<String>) -> Self {
        Path::empty().at_name(name)
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The path without its last step.
    pub fn parent(&self) -> Path {
        let mut steps = self.steps.clone();
        steps.pop();
        Path { steps }
    }

    pub fn at_step(&self, step: PathStep) -> Path {
        let mut steps = self.steps.clone();
        steps.push(step);
        Path { steps }
    }

    pub fn at_name(&self, name: impl Into<String>) -> Path {
        self.at_step(PathStep::AttributeName(name.into()))
    }

    pub fn at_list_index(&self, idx: usize) -> Path {
        self.at_step(PathStep::ElementKeyInt(idx as i64))
    }

    pub fn at_tuple_index(&self, idx: usize) -> Path {
        self.at_list_index(idx)
    }

    pub fn at_map_key(&self, key: impl Into<String>) -> Path {
        self.at_step(PathStep::ElementKeyString(key.into()))
    }

    pub fn at_set_value(&self, v: Value) -> Path {
        self.at_step(PathStep::ElementKeyValue(v))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i != 0 && matches!(step, PathStep::AttributeName(_)) {
                write!(f, ".")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}
