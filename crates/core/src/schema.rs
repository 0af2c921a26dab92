//! Resource schema attributes.

use std::fmt;
use std::sync::Arc;

use crate::diag::{Diagnostic, Diagnostics};
use crate::path::{Path, PathStep};
use crate::types::{PathStepError, Type};
use crate::value::ListValue;

/// Supplies the planned value of a list attribute whose configuration is
/// null.
pub trait ListDefault: fmt::Debug + Send + Sync {
    fn default_list(&self, path: &Path) -> (ListValue, Diagnostics);
}

/// A fixed default value.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticListDefault(pub ListValue);

impl ListDefault for StaticListDefault {
    fn default_list(&self, _path: &Path) -> (ListValue, Diagnostics) {
        (self.0.clone(), Diagnostics::new())
    }
}

/// A list attribute of a resource schema.
#[derive(Debug, Clone, Default)]
pub struct ListAttribute {
    pub element_type: Option<Type>,
    pub custom_type: Option<Type>,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub description: String,
    pub markdown_description: String,
    pub deprecation_message: String,
    pub default: Option<Arc<dyn ListDefault>>,
}

impl ListAttribute {
    /// The attribute's type. Without an element or custom type this is
    /// `list[dynamic]`, which [`ListAttribute::validate_implementation`]
    /// reports.
    pub fn get_type(&self) -> Type {
        if let Some(custom) = &self.custom_type {
            return custom.clone();
        }
        Type::list(self.element_type.clone().unwrap_or(Type::Dynamic))
    }

    pub fn apply_path_step(&self, step: &PathStep) -> Result<Type, PathStepError> {
        self.get_type().apply_path_step(step)
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_computed(&self) -> bool {
        self.computed
    }

    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    pub fn get_markdown_description(&self) -> &str {
        &self.markdown_description
    }

    pub fn get_deprecation_message(&self) -> &str {
        &self.deprecation_message
    }

    /// Check the definition itself, independent of any configuration.
    pub fn validate_implementation(&self, path: &Path) -> Diagnostics {
        let mut diags = Diagnostics::new();

        if self.custom_type.is_none() {
            match &self.element_type {
                None => diags.push(missing_element_type(path)),
                Some(_) if self.get_type().find_nested_dynamic().is_some() => {
                    diags.push(collection_with_dynamic(path))
                }
                Some(_) => {}
            }
        }

        let Some(default) = &self.default else {
            return diags;
        };

        if !self.computed {
            diags.push(Diagnostic::attribute_error(
                path.clone(),
                "Schema Using Attribute Default For Non-Computed Attribute",
                format!(
                    "Attribute {:?} must be computed when using default. \
                     This is an issue with the provider and should be reported to the provider developers.",
                    path.to_string()
                ),
            ));
        }

        let (planned, default_diags) = default.default_list(path);
        let failed = default_diags.has_error();
        diags.append(default_diags);
        if failed {
            return diags;
        }

        if let Some(expected) = &self.element_type {
            if planned.element_type() != expected {
                diags.push(Diagnostic::attribute_error(
                    path.clone(),
                    "Invalid Attribute Implementation",
                    format!(
                        "When validating the schema, an implementation issue was found. \
                         This is always an issue with the provider and should be reported to the provider developers.\n\n\
                         {:?} has a default value with element type {} that does not match the element type {}.",
                        path.to_string(),
                        planned.element_type(),
                        expected
                    ),
                ));
            }
        }

        diags
    }
}

fn missing_element_type(path: &Path) -> Diagnostic {
    Diagnostic::attribute_error(
        path.clone(),
        "Invalid Attribute Implementation",
        format!(
            "When validating the schema, an implementation issue was found. \
             This is always an issue with the provider and should be reported to the provider developers.\n\n\
             {:?} is missing the CustomType or ElementType field on a collection Attribute. \
             One of these fields is required to prevent other unexpected errors or panics.",
            path.to_string()
        ),
    )
}

fn collection_with_dynamic(path: &Path) -> Diagnostic {
    let name = path.to_string();
    Diagnostic::attribute_error(
        path.clone(),
        "Invalid Schema Implementation",
        format!(
            "When validating the schema, an implementation issue was found. \
             This is always an issue with the provider and should be reported to the provider developers.\n\n\
             {:?} is an attribute that contains a collection type with a nested dynamic type.\n\n\
             Dynamic types inside of collections are not currently supported. \
             If underlying dynamic values are required, replace the {:?} attribute definition with DynamicAttribute instead.",
            name, name
        ),
    )
}
