//! Parameter introspection.
//!
//! Flattens a request body type into body-property parameters, applying the
//! per-property declarations and the affordance-level [`InputSpec`] name sets.

use std::collections::HashSet;

use serde_json::Value;
use tracing::trace;

use crate::bean::BeanType;
use crate::method::HttpMethod;
use crate::param::{ActionInputParameter, InputType, ParamLocation};

/// Affordance-level allow and deny lists for body properties.
///
/// Names match either the dotted path (`workPerformed.name`) or the leaf name
/// (`name`). If any of `read_only`, `hidden` or `include` is non-empty only the
/// properties listed there are rendered; `exclude` always removes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSpec {
    read_only: HashSet<String>,
    hidden: HashSet<String>,
    include: HashSet<String>,
    exclude: HashSet<String>,
    required: HashSet<String>,
}

fn names<I, S>(names: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(Into::into).collect()
}

fn listed(set: &HashSet<String>, path: &str, leaf: &str) -> bool {
    set.contains(path) || set.contains(leaf)
}

impl InputSpec {
    /// No restrictions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Properties rendered read-only.
    #[must_use]
    pub fn with_read_only<I, S>(mut self, read_only: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.read_only = names(read_only);
        self
    }

    /// Properties rendered as hidden fields.
    #[must_use]
    pub fn with_hidden<I, S>(mut self, hidden: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden = names(hidden);
        self
    }

    /// Properties rendered as ordinary inputs.
    #[must_use]
    pub fn with_include<I, S>(mut self, include: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = names(include);
        self
    }

    /// Properties never rendered.
    #[must_use]
    pub fn with_exclude<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = names(exclude);
        self
    }

    /// Properties marked required in addition to their own declaration.
    #[must_use]
    pub fn with_required<I, S>(mut self, required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = names(required);
        self
    }

    /// Whether an allow list is in effect.
    pub fn is_restricted(&self) -> bool {
        !self.read_only.is_empty() || !self.hidden.is_empty() || !self.include.is_empty()
    }

    /// Whether the property is rendered at all.
    pub fn includes(&self, path: &str, leaf: &str) -> bool {
        if listed(&self.exclude, path, leaf) {
            return false;
        }
        !self.is_restricted()
            || listed(&self.read_only, path, leaf)
            || listed(&self.hidden, path, leaf)
            || listed(&self.include, path, leaf)
    }

    /// Whether the property is forced read-only.
    pub fn is_read_only(&self, path: &str, leaf: &str) -> bool {
        listed(&self.read_only, path, leaf)
    }

    /// Whether the property is forced hidden.
    pub fn is_hidden(&self, path: &str, leaf: &str) -> bool {
        listed(&self.hidden, path, leaf)
    }

    /// Whether the property is forced required.
    pub fn is_required(&self, path: &str, leaf: &str) -> bool {
        listed(&self.required, path, leaf)
    }
}

/// Flatten a body type into body-property parameters for one HTTP method.
///
/// `body` carries the bound body value; property values are looked up by
/// name, recursing into nested objects.
pub fn body_parameters(
    bean: &BeanType,
    method: HttpMethod,
    body: Option<&Value>,
    spec: &InputSpec,
) -> Vec<ActionInputParameter> {
    let mut out = Vec::new();
    collect(bean, method, body, spec, "", &mut out);
    out
}

fn collect(
    bean: &BeanType,
    method: HttpMethod,
    body: Option<&Value>,
    spec: &InputSpec,
    prefix: &str,
    out: &mut Vec<ActionInputParameter>,
) {
    for property in bean.properties() {
        let leaf = property.name();
        if !property.is_writable_by(method) {
            trace!(bean = bean.name(), property = leaf, %method, "property not writable");
            continue;
        }

        let path = if prefix.is_empty() {
            leaf.to_string()
        } else {
            format!("{prefix}.{leaf}")
        };
        let value = body.and_then(|b| b.get(leaf)).filter(|v| !v.is_null());

        if let Some(nested) = &property.nested {
            collect(nested, method, value, spec, &path, out);
            continue;
        }

        if !spec.includes(&path, leaf) {
            trace!(property = %path, "property excluded by input spec");
            continue;
        }

        let input_type = if spec.is_hidden(&path, leaf) {
            InputType::Hidden
        } else {
            property.input_type()
        };

        let mut parameter = ActionInputParameter::new(path.clone(), ParamLocation::BodyProperty)
            .with_input_type(input_type)
            .with_read_only(property.read_only || spec.is_read_only(&path, leaf))
            .with_required(property.required || spec.is_required(&path, leaf))
            .with_collection(property.collection)
            .with_suggestions(property.possible_values.resolve())
            .with_constraints(property.constraints.clone());
        if let Some(value) = value {
            parameter = parameter.with_value(value.clone());
        }
        if let Some(remote) = property.possible_values.remote() {
            parameter = parameter.with_remote_suggestions(remote.clone());
        }
        if let Some(description) = &property.description {
            parameter = parameter.with_description(description.clone());
        }
        out.push(parameter);
    }
}
