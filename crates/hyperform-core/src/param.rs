//! Input parameters of an affordance.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::suggest::{RemoteSuggestions, Suggestion, value_to_string};

/// Where a parameter travels in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamLocation {
    /// Path variable of the target URI.
    Path,
    /// Query string parameter.
    Query,
    /// Request header.
    Header,
    /// The whole request body.
    Body,
    /// One (possibly nested) property of the request body.
    BodyProperty,
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Body => "body",
            Self::BodyProperty => "body property",
        };
        f.write_str(s)
    }
}

/// HTML input types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputType {
    /// `text`
    #[default]
    Text,
    /// `hidden`
    Hidden,
    /// `password`
    Password,
    /// `checkbox`
    Checkbox,
    /// `number`
    Number,
    /// `range`
    Range,
    /// `email`
    Email,
    /// `url`
    Url,
    /// `tel`
    Tel,
    /// `search`
    Search,
    /// `date`
    Date,
    /// `datetime-local`
    DatetimeLocal,
    /// `time`
    Time,
    /// `month`
    Month,
    /// `week`
    Week,
    /// `color`
    Color,
}

impl InputType {
    /// Value of the HTML `type` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Hidden => "hidden",
            Self::Password => "password",
            Self::Checkbox => "checkbox",
            Self::Number => "number",
            Self::Range => "range",
            Self::Email => "email",
            Self::Url => "url",
            Self::Tel => "tel",
            Self::Search => "search",
            Self::Date => "date",
            Self::DatetimeLocal => "datetime-local",
            Self::Time => "time",
            Self::Month => "month",
            Self::Week => "week",
            Self::Color => "color",
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field constraints, rendered as HTML validation attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputConstraints {
    /// Minimum numeric value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Number>,
    /// Maximum numeric value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Number>,
    /// Step between numeric values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<Number>,
    /// Minimum text length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Maximum text length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Regular expression the value must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl InputConstraints {
    /// No constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum.
    #[must_use]
    pub fn with_min(mut self, min: impl Into<Number>) -> Self {
        self.min = Some(min.into());
        self
    }

    /// Set the maximum.
    #[must_use]
    pub fn with_max(mut self, max: impl Into<Number>) -> Self {
        self.max = Some(max.into());
        self
    }

    /// Set the step.
    #[must_use]
    pub fn with_step(mut self, step: impl Into<Number>) -> Self {
        self.step = Some(step.into());
        self
    }

    /// Set the minimum length.
    #[must_use]
    pub fn with_min_length(mut self, len: u64) -> Self {
        self.min_length = Some(len);
        self
    }

    /// Set the maximum length.
    #[must_use]
    pub fn with_max_length(mut self, len: u64) -> Self {
        self.max_length = Some(len);
        self
    }

    /// Set the pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Whether any constraint is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// HTML attributes in fixed order: min, max, step, minlength, maxlength, pattern.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = Vec::new();
        if let Some(min) = &self.min {
            attrs.push(("min", min.to_string()));
        }
        if let Some(max) = &self.max {
            attrs.push(("max", max.to_string()));
        }
        if let Some(step) = &self.step {
            attrs.push(("step", step.to_string()));
        }
        if let Some(len) = self.min_length {
            attrs.push(("minlength", len.to_string()));
        }
        if let Some(len) = self.max_length {
            attrs.push(("maxlength", len.to_string()));
        }
        if let Some(pattern) = &self.pattern {
            attrs.push(("pattern", pattern.clone()));
        }
        attrs
    }
}

/// A single input of an affordance, with its current value and everything a
/// renderer needs to pick a widget.
///
/// Built once per request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionInputParameter {
    name: String,
    location: ParamLocation,
    input_type: InputType,
    value: Option<Value>,
    read_only: bool,
    required: bool,
    collection: bool,
    suggestions: Vec<Suggestion>,
    remote: Option<RemoteSuggestions>,
    constraints: InputConstraints,
    description: Option<String>,
}

impl ActionInputParameter {
    /// Create a text parameter without value.
    pub fn new(name: impl Into<String>, location: ParamLocation) -> Self {
        Self {
            name: name.into(),
            location,
            input_type: InputType::Text,
            value: None,
            read_only: false,
            required: false,
            collection: false,
            suggestions: Vec::new(),
            remote: None,
            constraints: InputConstraints::default(),
            description: None,
        }
    }

    /// Set the input type.
    #[must_use]
    pub fn with_input_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    /// Set the current value; `null` counts as no value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.value = (!value.is_null()).then_some(value);
        self
    }

    /// Mark as read-only.
    #[must_use]
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Mark as required.
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Mark as collection-valued.
    #[must_use]
    pub fn with_collection(mut self, collection: bool) -> Self {
        self.collection = collection;
        self
    }

    /// Set the inline suggestions.
    #[must_use]
    pub fn with_suggestions(mut self, suggestions: Vec<Suggestion>) -> Self {
        self.suggestions = suggestions;
        self
    }

    /// Set the remote suggestion source.
    #[must_use]
    pub fn with_remote_suggestions(mut self, remote: RemoteSuggestions) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Set the constraints.
    #[must_use]
    pub fn with_constraints(mut self, constraints: InputConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Name; nested body properties use dotted paths such as `workPerformed.name`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last segment of the dotted name.
    pub fn leaf_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Location in the request.
    pub fn location(&self) -> ParamLocation {
        self.location
    }

    /// Input type.
    pub fn input_type(&self) -> InputType {
        self.input_type
    }

    /// Current value.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Current value as form text; empty when there is none.
    pub fn value_formatted(&self) -> String {
        self.value.as_ref().map(value_to_string).unwrap_or_default()
    }

    /// Current values of a collection parameter. A scalar value is a one
    /// element list.
    pub fn values(&self) -> Vec<&Value> {
        match &self.value {
            None => Vec::new(),
            Some(Value::Array(items)) => items.iter().collect(),
            Some(value) => vec![value],
        }
    }

    /// Whether the field is read-only.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether the field is required.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the field holds several values.
    pub fn is_collection(&self) -> bool {
        self.collection
    }

    /// Whether this parameter stands for the whole request body.
    pub fn is_request_body(&self) -> bool {
        self.location == ParamLocation::Body
    }

    /// Inline suggestions; when non-empty a selection widget must be used.
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Whether the parameter has inline suggestions.
    pub fn has_suggestions(&self) -> bool {
        !self.suggestions.is_empty()
    }

    /// Remote suggestion source.
    pub fn remote_suggestions(&self) -> Option<&RemoteSuggestions> {
        self.remote.as_ref()
    }

    /// Constraints.
    pub fn constraints(&self) -> &InputConstraints {
        &self.constraints
    }

    /// Description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_input_type_names() {
        assert_eq!(InputType::DatetimeLocal.to_string(), "datetime-local");
        assert_eq!(
            serde_json::to_string(&InputType::DatetimeLocal).unwrap(),
            "\"datetime-local\""
        );
        assert_eq!(InputType::Checkbox.as_str(), "checkbox");
    }

    #[test]
    fn test_constraint_attribute_order() {
        let constraints = InputConstraints::new()
            .with_pattern("[a-z]+")
            .with_max(10)
            .with_min(1)
            .with_max_length(20);
        assert_eq!(
            constraints.attributes(),
            vec![
                ("min", "1".to_string()),
                ("max", "10".to_string()),
                ("maxlength", "20".to_string()),
                ("pattern", "[a-z]+".to_string()),
            ]
        );
        assert!(InputConstraints::new().is_empty());
    }

    #[test]
    fn test_value_formatting() {
        let p = ActionInputParameter::new("age", ParamLocation::Query).with_value(json!(42));
        assert_eq!(p.value_formatted(), "42");

        let p = ActionInputParameter::new("name", ParamLocation::Query).with_value("Ann");
        assert_eq!(p.value_formatted(), "Ann");

        let p = ActionInputParameter::new("name", ParamLocation::Query).with_value(Value::Null);
        assert_eq!(p.value(), None);
        assert_eq!(p.value_formatted(), "");
    }

    #[test]
    fn test_values_of_collection() {
        let p = ActionInputParameter::new("tags", ParamLocation::BodyProperty)
            .with_collection(true)
            .with_value(json!(["a", "b"]));
        assert_eq!(p.values(), vec![&json!("a"), &json!("b")]);

        let single = ActionInputParameter::new("tags", ParamLocation::Query).with_value("a");
        assert_eq!(single.values(), vec![&json!("a")]);
    }

    #[test]
    fn test_leaf_name() {
        let p = ActionInputParameter::new("workPerformed.name", ParamLocation::BodyProperty);
        assert_eq!(p.leaf_name(), "name");
        assert_eq!(ParamLocation::BodyProperty.to_string(), "body property");
    }
}
