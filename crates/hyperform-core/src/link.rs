//! Links and the affordances attached to them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::affordance::Affordance;
use crate::error::{AffordanceError, Result};
use crate::uri::{TemplateVariables, UriComponents, UriTemplate};

/// Relation of a link to the resource itself.
pub const SELF_REL: &str = "self";

/// A hypermedia link: href (possibly templated), relation and affordances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    href: String,
    rel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip)]
    affordances: Vec<Affordance>,
}

impl Link {
    /// Create a link.
    pub fn new(href: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            title: None,
            affordances: Vec::new(),
        }
    }

    /// Create a link whose href is the target of the first affordance.
    ///
    /// # Errors
    ///
    /// Returns [`AffordanceError::InvalidArgument`] if `affordances` is empty.
    pub fn from_affordances(rel: impl Into<String>, affordances: Vec<Affordance>) -> Result<Self> {
        let href = affordances
            .first()
            .map(|a| a.target().as_str().to_string())
            .ok_or_else(|| AffordanceError::InvalidArgument("no affordances to link".to_string()))?;
        Ok(Self::new(href, rel).with_affordances(affordances))
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach one affordance.
    #[must_use]
    pub fn with_affordance(mut self, affordance: Affordance) -> Self {
        self.affordances.push(affordance);
        self
    }

    /// Attach several affordances.
    #[must_use]
    pub fn with_affordances(mut self, affordances: impl IntoIterator<Item = Affordance>) -> Self {
        self.affordances.extend(affordances);
        self
    }

    /// Same link under a different relation.
    #[must_use]
    pub fn with_rel(mut self, rel: impl Into<String>) -> Self {
        self.rel = rel.into();
        self
    }

    /// Raw href.
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Relation.
    pub fn rel(&self) -> &str {
        &self.rel
    }

    /// Title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Attached affordances.
    pub fn affordances(&self) -> &[Affordance] {
        &self.affordances
    }

    /// Parsed href.
    pub fn template(&self) -> UriTemplate {
        UriTemplate::new(self.href.as_str())
    }

    /// Whether the href has template variables.
    pub fn is_templated(&self) -> bool {
        self.template().is_templated()
    }

    /// Whether path variables remain before the query part.
    pub fn is_base_uri_templated(&self) -> bool {
        self.template().is_base_uri_templated()
    }

    /// Template variables of the href.
    pub fn variables(&self) -> TemplateVariables {
        self.template().variables().clone()
    }

    /// Href with unbound optional variables removed.
    pub fn expand(&self) -> String {
        self.template().expand_partial(&HashMap::new())
    }

    /// Href expanded with values.
    ///
    /// # Errors
    ///
    /// Returns [`AffordanceError::MissingVariable`] if a path variable has no value.
    pub fn expand_with(&self, values: &HashMap<String, String>) -> Result<String> {
        self.template().expand(values)
    }

    /// Resolved components of [`expand`](Self::expand).
    pub fn components(&self) -> UriComponents {
        UriComponents::parse(&self.expand())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::HttpMethod;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expand_removes_query_variables() {
        let link = Link::new("/events{?name,location}", "search");
        assert!(link.is_templated());
        assert!(!link.is_base_uri_templated());
        assert_eq!(link.expand(), "/events");
        assert_eq!(link.variables().names(), vec!["name", "location"]);
    }

    #[test]
    fn test_from_affordances_uses_first_target() {
        let link = Link::from_affordances(
            SELF_REL,
            vec![
                Affordance::new("findEvent", HttpMethod::Get, "/events/1"),
                Affordance::new("updateEvent", HttpMethod::Put, "/events/1"),
            ],
        )
        .unwrap();
        assert_eq!(link.href(), "/events/1");
        assert_eq!(link.affordances().len(), 2);
        assert!(Link::from_affordances(SELF_REL, Vec::new()).is_err());
    }

    #[test]
    fn test_serializes_without_affordances() {
        let link = Link::new("/events/1", SELF_REL)
            .with_title("Event")
            .with_affordance(Affordance::new("deleteEvent", HttpMethod::Delete, "/events/1"));
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"href": "/events/1", "rel": "self", "title": "Event"})
        );
    }
}
