//! Documentation links for form fields.

use std::fmt;
use std::sync::Arc;

use hyperform_core::ActionInputParameter;
use serde_json::Value;

/// Supplies a documentation URL for a form field, rendered as a link inside
/// the field's label.
pub trait DocumentationProvider: Send + Sync + fmt::Debug {
    /// URL documenting `param`, given its current value.
    fn documentation_url(
        &self,
        param: &ActionInputParameter,
        value: Option<&Value>,
    ) -> Option<String>;
}

impl<T: DocumentationProvider + ?Sized> DocumentationProvider for Arc<T> {
    fn documentation_url(
        &self,
        param: &ActionInputParameter,
        value: Option<&Value>,
    ) -> Option<String> {
        (**self).documentation_url(param, value)
    }
}

/// No documentation for any field.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDocumentation;

impl DocumentationProvider for NoDocumentation {
    fn documentation_url(
        &self,
        _param: &ActionInputParameter,
        _value: Option<&Value>,
    ) -> Option<String> {
        None
    }
}

/// Documentation under a common prefix, e.g. `http://schema.org/` gives
/// `http://schema.org/eventStatus` for the field `eventStatus`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixDocumentation {
    prefix: String,
}

impl PrefixDocumentation {
    /// Create a provider.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl DocumentationProvider for PrefixDocumentation {
    fn documentation_url(
        &self,
        param: &ActionInputParameter,
        _value: Option<&Value>,
    ) -> Option<String> {
        Some(format!("{}{}", self.prefix, param.leaf_name()))
    }
}
