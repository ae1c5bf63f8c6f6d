//! Suggestions: the selectable options of an enumerated input.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Render a JSON value the way it appears in a form field.
///
/// Strings are used verbatim, `null` becomes the empty string and everything
/// else uses its JSON text.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One selectable option: display text, identifier and the underlying value.
///
/// Two suggestions are equal when their text and id are equal, whatever
/// their underlying values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    text: String,
    id: String,
    value: Value,
}

impl Suggestion {
    /// Create a suggestion.
    pub fn new(text: impl Into<String>, id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            text: text.into(),
            id: id.into(),
            value: value.into(),
        }
    }

    /// Wrap plain values; text and id are both the value's string form.
    pub fn wrap<I, V>(values: I) -> Vec<Suggestion>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        values
            .into_iter()
            .map(|value| {
                let value = value.into();
                let text = value_to_string(&value);
                Self::new(text.clone(), text, value)
            })
            .collect()
    }

    /// Display text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Identifier submitted by a form.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Underlying value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Whether a current parameter value selects this suggestion, either by
    /// value or by its identifier.
    pub fn matches(&self, current: &Value) -> bool {
        !current.is_null() && (self.value == *current || self.id == value_to_string(current))
    }
}

impl PartialEq for Suggestion {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.id == other.id
    }
}

impl Eq for Suggestion {}

impl Hash for Suggestion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
        self.id.hash(state);
    }
}

/// A remote search endpoint that supplies suggestions at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSuggestions {
    /// Search URI, possibly templated.
    pub href: String,
    /// Field of each result used as submitted value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_field: Option<String>,
    /// Field of each result used as display text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_field: Option<String>,
}

impl RemoteSuggestions {
    /// Create a reference to a search endpoint.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            value_field: None,
            prompt_field: None,
        }
    }

    /// Set the value field.
    #[must_use]
    pub fn with_value_field(mut self, field: impl Into<String>) -> Self {
        self.value_field = Some(field.into());
        self
    }

    /// Set the prompt field.
    #[must_use]
    pub fn with_prompt_field(mut self, field: impl Into<String>) -> Self {
        self.prompt_field = Some(field.into());
        self
    }
}

/// Where a parameter's allowed values come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PossibleValues {
    /// Free input.
    #[default]
    None,
    /// A fixed enumeration; each constant is both text and value.
    Enumeration(Vec<String>),
    /// A declared list of suggestions.
    Static(Vec<Suggestion>),
    /// Values found by a remote search; no inline options.
    Remote(RemoteSuggestions),
}

impl PossibleValues {
    /// Enumeration from constant names.
    pub fn enumeration<I, S>(constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enumeration(constants.into_iter().map(Into::into).collect())
    }

    /// Inline suggestions in declaration order. Remote and free input have none.
    pub fn resolve(&self) -> Vec<Suggestion> {
        match self {
            Self::None | Self::Remote(_) => Vec::new(),
            Self::Enumeration(constants) => Suggestion::wrap(constants.iter().cloned()),
            Self::Static(suggestions) => suggestions.clone(),
        }
    }

    /// The remote search reference, if any.
    pub fn remote(&self) -> Option<&RemoteSuggestions> {
        match self {
            Self::Remote(remote) => Some(remote),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::HashSet;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(s: &Suggestion) -> u64 {
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_wrap_uses_string_form() {
        let wrapped = Suggestion::wrap([json!("7-10"), json!(11), json!(true)]);
        let ids: Vec<&str> = wrapped.iter().map(Suggestion::id).collect();
        assert_eq!(ids, vec!["7-10", "11", "true"]);
        assert_eq!(wrapped[1].value(), &json!(11));
    }

    #[test]
    fn test_equality_ignores_value() {
        let a = Suggestion::new("Small", "S", json!({"size": 1}));
        let b = Suggestion::new("Small", "S", json!({"size": 2}));
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_matches_by_value_or_id() {
        let s = Suggestion::new("S2", "2", json!(2));
        assert!(s.matches(&json!(2)));
        assert!(s.matches(&json!("2")));
        assert!(!s.matches(&json!(1)));
        assert!(!s.matches(&Value::Null));
    }

    #[test]
    fn test_enumeration_resolves_in_order() {
        let values = PossibleValues::enumeration(["EVENT_CANCELLED", "EVENT_SCHEDULED"]);
        let texts: Vec<String> = values.resolve().iter().map(|s| s.text().to_string()).collect();
        assert_eq!(texts, vec!["EVENT_CANCELLED", "EVENT_SCHEDULED"]);
    }

    #[test]
    fn test_remote_has_no_inline_suggestions() {
        let values = PossibleValues::Remote(RemoteSuggestions::new("/people{?q}"));
        assert!(values.resolve().is_empty());
        assert_eq!(values.remote().map(|r| r.href.as_str()), Some("/people{?q}"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_equal_text_and_id_hash_equal(text in ".{0,12}", id in ".{0,12}", a in any::<i64>(), b in any::<i64>()) {
            let first = Suggestion::new(text.clone(), id.clone(), a);
            let second = Suggestion::new(text, id, b);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(hash_of(&first), hash_of(&second));
        }

        #[test]
        fn prop_different_id_never_equal(text in ".{0,12}", id in "[a-z]{1,8}") {
            let first = Suggestion::new(text.clone(), id.clone(), 1);
            let second = Suggestion::new(text, format!("{id}x"), 1);
            prop_assert_ne!(first, second);
        }
    }
}
