//! Function definition parts: return and parameter descriptions.

use crate::diag::Diagnostics;
use crate::types::Type;

/// A function return of list type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListReturn {
    pub element_type: Option<Type>,
    /// Replaces the derived list type entirely when set.
    pub custom_type: Option<Type>,
}

impl ListReturn {
    pub fn new(element_type: Type) -> Self {
        ListReturn {
            element_type: Some(element_type),
            custom_type: None,
        }
    }

    pub fn get_type(&self) -> Type {
        if let Some(custom) = &self.custom_type {
            return custom.clone();
        }
        Type::list(self.element_type.clone().unwrap_or(Type::Dynamic))
    }

    /// Collections may not nest `dynamic` anywhere below them. Custom types
    /// are trusted.
    pub fn validate_implementation(&self) -> Diagnostics {
        let mut diags = Diagnostics::new();
        if self.custom_type.is_none() && self.get_type().find_nested_dynamic().is_some() {
            diags.add_error(
                "Invalid Function Definition",
                "When validating the function definition, an implementation issue was found. \
                 This is always an issue with the provider and should be reported to the provider developers.\n\n\
                 Return contains a collection type with a nested dynamic type. \
                 Dynamic types inside of collections are not currently supported.",
            );
        }
        diags
    }
}

/// A function parameter accepting a value of any type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DynamicParameter {
    pub name: String,
    pub allow_null_value: bool,
    pub allow_unknown_values: bool,
    pub custom_type: Option<Type>,
    pub description: String,
    pub markdown_description: String,
}

impl DynamicParameter {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_allow_null_value(&self) -> bool {
        self.allow_null_value
    }

    pub fn get_allow_unknown_values(&self) -> bool {
        self.allow_unknown_values
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    pub fn get_markdown_description(&self) -> &str {
        &self.markdown_description
    }

    pub fn get_type(&self) -> Type {
        self.custom_type.clone().unwrap_or(Type::Dynamic)
    }
}
