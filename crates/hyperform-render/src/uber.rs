//! UBER+JSON documents (`application/vnd.amundsen-uber+json`).
//!
//! Everything in UBER is a nested `data` element. Links become elements with
//! `url` and `rel`, affordances become elements with an `action`, and
//! resource content becomes named `value` elements.

use std::fmt;

use hyperform_core::suggest::value_to_string;
use hyperform_core::{
    ActionInputParameter, Affordance, AffordanceError, HttpMethod, Link, MediaType, PageMetadata,
    PagedResources, Resource, Resources, Result, UriComponents,
};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::model::{AffordanceModel, input_properties_of, query_properties_of};

/// What an UBER transition does to the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UberAction {
    /// POST: add to a collection.
    Append,
    /// PATCH: change part of the target.
    Partial,
    /// GET: read without side effects.
    #[default]
    Read,
    /// DELETE: remove the target.
    Remove,
    /// PUT: replace the target.
    Replace,
}

impl UberAction {
    /// Action of an HTTP method.
    ///
    /// # Errors
    ///
    /// Returns [`AffordanceError::UnsupportedMethod`] for OPTIONS, HEAD and
    /// TRACE, which have no UBER action.
    pub fn for_request_method(method: HttpMethod) -> Result<Self> {
        match method {
            HttpMethod::Get => Ok(Self::Read),
            HttpMethod::Post => Ok(Self::Append),
            HttpMethod::Put => Ok(Self::Replace),
            HttpMethod::Patch => Ok(Self::Partial),
            HttpMethod::Delete => Ok(Self::Remove),
            other => Err(AffordanceError::UnsupportedMethod(other)),
        }
    }

    /// HTTP method of the action.
    pub fn http_method(self) -> HttpMethod {
        match self {
            Self::Append => HttpMethod::Post,
            Self::Partial => HttpMethod::Patch,
            Self::Read => HttpMethod::Get,
            Self::Remove => HttpMethod::Delete,
            Self::Replace => HttpMethod::Put,
        }
    }

    /// Whether this is the default `read` action, which is never serialized.
    pub fn is_read(&self) -> bool {
        *self == Self::Read
    }
}

impl fmt::Display for UberAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Append => "append",
            Self::Partial => "partial",
            Self::Read => "read",
            Self::Remove => "remove",
            Self::Replace => "replace",
        };
        f.write_str(s)
    }
}

/// One UBER element.
///
/// `templated` is derived from the url when serializing and ignored when
/// parsing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UberData {
    /// Document-unique identifier.
    pub id: Option<String>,
    /// Name, e.g. a property name.
    pub name: Option<String>,
    /// Human readable label.
    pub label: Option<String>,
    /// Relations.
    pub rel: Vec<String>,
    /// Target.
    pub url: Option<String>,
    /// Transition type.
    pub action: UberAction,
    /// Whether the target is embedded in place.
    pub transclude: bool,
    /// Template of the request body, e.g. `name={name}&rating={rating}`.
    pub model: Option<String>,
    /// Media types accepted for the request body.
    pub sending: Vec<String>,
    /// Media types accepted for the response.
    pub accepting: Vec<String>,
    /// Scalar value.
    pub value: Option<Value>,
    /// Nested elements.
    pub data: Vec<UberData>,
}

impl UberData {
    /// An empty element.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the relations.
    #[must_use]
    pub fn with_rel(mut self, rel: Vec<String>) -> Self {
        self.rel = rel;
        self
    }

    /// Set the url.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the action.
    #[must_use]
    pub fn with_action(mut self, action: UberAction) -> Self {
        self.action = action;
        self
    }

    /// Set the model.
    #[must_use]
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    /// Set the value; `null` counts as no value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.value = (!value.is_null()).then_some(value);
        self
    }

    /// Set the nested elements.
    #[must_use]
    pub fn with_data(mut self, data: Vec<UberData>) -> Self {
        self.data = data;
        self
    }

    /// Whether the url carries a query template.
    pub fn is_templated(&self) -> bool {
        self.url.as_deref().is_some_and(|url| url.contains("{?"))
    }

    /// One link per relation of this element.
    pub fn links(&self) -> Vec<Link> {
        match &self.url {
            Some(url) => self.rel.iter().map(|rel| Link::new(url.clone(), rel.clone())).collect(),
            None => Vec::new(),
        }
    }

    /// One element per distinct href, carrying all relations of that href in
    /// first-seen order.
    pub fn from_links(links: &[Link]) -> Vec<UberData> {
        let mut grouped: Vec<UberData> = Vec::new();
        for link in links {
            match grouped
                .iter_mut()
                .find(|d| d.url.as_deref() == Some(link.href()))
            {
                Some(data) => {
                    if !data.rel.iter().any(|r| r == link.rel()) {
                        data.rel.push(link.rel().to_string());
                    }
                }
                None => grouped.push(
                    UberData::new()
                        .with_url(link.href())
                        .with_rel(vec![link.rel().to_string()]),
                ),
            }
        }
        grouped
    }

    /// Element of a single resource: its links followed by its named content.
    ///
    /// # Errors
    ///
    /// Returns [`AffordanceError::UnsupportedMethod`] if an affordance uses a
    /// method without UBER action.
    pub fn from_resource(resource: &Resource) -> Result<Self> {
        let mut data = link_data(resource.links())?;
        data.push(
            UberData::new()
                .with_name(resource.name().to_lowercase())
                .with_data(content_data(resource.content())),
        );
        Ok(UberData::new().with_data(data))
    }

    /// Elements of a collection: its links followed by one element per item.
    ///
    /// # Errors
    ///
    /// See [`from_resource`](Self::from_resource).
    pub fn from_resources(resources: &Resources) -> Result<Vec<Self>> {
        let mut data = link_data(resources.links())?;
        for item in resources.items() {
            data.push(Self::from_resource(item)?);
        }
        Ok(data)
    }

    /// Elements of a page: the collection followed by a `page` element.
    ///
    /// # Errors
    ///
    /// See [`from_resource`](Self::from_resource).
    pub fn from_paged(paged: &PagedResources) -> Result<Vec<Self>> {
        let mut data = Self::from_resources(paged.resources())?;
        if let Some(page) = paged.page() {
            data.push(page_data(page));
        }
        Ok(data)
    }
}

impl Serialize for UberData {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("UberData", 13)?;
        macro_rules! field {
            ($key:literal, $value:expr, $skip:expr) => {
                if $skip {
                    state.skip_field($key)?;
                } else {
                    state.serialize_field($key, $value)?;
                }
            };
        }
        field!("id", &self.id, self.id.is_none());
        field!("name", &self.name, self.name.is_none());
        field!("label", &self.label, self.label.is_none());
        field!("rel", &self.rel, self.rel.is_empty());
        field!("url", &self.url, self.url.is_none());
        field!("templated", &true, !self.is_templated());
        field!("action", &self.action, self.action.is_read());
        field!("transclude", &self.transclude, !self.transclude);
        field!("model", &self.model, self.model.is_none());
        field!("sending", &self.sending, self.sending.is_empty());
        field!("accepting", &self.accepting, self.accepting.is_empty());
        field!("value", &self.value, self.value.is_none());
        field!("data", &self.data, self.data.is_empty());
        state.end()
    }
}

fn content_data(content: &Value) -> Vec<UberData> {
    match content {
        Value::Object(fields) => fields
            .iter()
            .map(|(name, value)| UberData::new().with_name(name.clone()).with_value(value.clone()))
            .collect(),
        Value::Null => Vec::new(),
        other => vec![UberData::new().with_value(other.clone())],
    }
}

fn page_data(page: &PageMetadata) -> UberData {
    UberData::new().with_name("page").with_data(vec![
        UberData::new().with_name("number").with_value(page.number),
        UberData::new().with_name("size").with_value(page.size),
        UberData::new().with_name("totalElements").with_value(page.total_elements),
        UberData::new().with_name("totalPages").with_value(page.total_pages),
    ])
}

/// Declared links and affordance entries of a set of links, merged.
fn link_data(links: &[Link]) -> Result<Vec<UberData>> {
    let declared = UberData::from_links(links);
    let affordances = links
        .iter()
        .flat_map(Link::affordances)
        .map(|a| UberAffordanceModel::new(a, &a.components()).map(|m| m.to_uber_data()))
        .collect::<Result<Vec<_>>>()?;
    Ok(merge(declared, affordances))
}

/// Fold declared link elements into affordance elements with the same url
/// and action.
///
/// A merged element carries the declared relations first, then its own, and
/// is named after the first relation. Declared elements absorbed by at least
/// one affordance element are dropped; the others come first in the result.
pub fn merge(declared: Vec<UberData>, affordances: Vec<UberData>) -> Vec<UberData> {
    if affordances.is_empty() {
        return declared;
    }

    let mut absorbed = vec![false; declared.len()];
    let merged: Vec<UberData> = affordances
        .into_iter()
        .map(|mut entry| {
            let mut rels: Vec<String> = Vec::new();
            for (i, link) in declared.iter().enumerate() {
                if link.url == entry.url && link.action == entry.action {
                    absorbed[i] = true;
                    for rel in &link.rel {
                        if !rels.contains(rel) {
                            rels.push(rel.clone());
                        }
                    }
                }
            }
            if rels.is_empty() {
                return entry;
            }
            for rel in entry.rel.drain(..) {
                if !rels.contains(&rel) {
                    rels.push(rel);
                }
            }
            debug!(url = ?entry.url, rels = ?rels, "merged declared links into affordance");
            entry.name = rels.first().cloned();
            entry.rel = rels;
            entry
        })
        .collect();

    declared
        .into_iter()
        .zip(absorbed)
        .filter_map(|(link, absorbed)| (!absorbed).then_some(link))
        .chain(merged)
        .collect()
}

/// UBER view of an affordance.
#[derive(Debug, Clone, PartialEq)]
pub struct UberAffordanceModel {
    name: String,
    http_method: HttpMethod,
    action: UberAction,
    uri: String,
    input_properties: Vec<ActionInputParameter>,
    query_properties: Vec<ActionInputParameter>,
}

impl UberAffordanceModel {
    /// Translate an affordance.
    ///
    /// # Errors
    ///
    /// Returns [`AffordanceError::UnsupportedMethod`] if the method has no
    /// UBER action.
    pub fn new(affordance: &Affordance, components: &UriComponents) -> Result<Self> {
        Ok(Self {
            name: affordance.name().to_string(),
            http_method: affordance.http_method(),
            action: UberAction::for_request_method(affordance.http_method())?,
            uri: components.to_uri_string(),
            input_properties: input_properties_of(affordance),
            query_properties: query_properties_of(affordance),
        })
    }

    /// Transition type.
    pub fn action(&self) -> UberAction {
        self.action
    }

    /// Body template `a={a}&b={b}`; `None` without inputs.
    pub fn model(&self) -> Option<String> {
        if self.input_properties.is_empty() {
            return None;
        }
        let pairs: Vec<String> = self
            .input_properties
            .iter()
            .map(|p| format!("{0}={{{0}}}", p.name()))
            .collect();
        Some(pairs.join("&"))
    }

    /// The element of this affordance. GET elements append their query
    /// parameters as a `{?a,b}` template; others carry the body model.
    pub fn to_uber_data(&self) -> UberData {
        let data = UberData::new()
            .with_name(self.name.clone())
            .with_rel(vec![self.name.clone()])
            .with_action(self.action);
        if self.is_get() {
            let url = if self.query_properties.is_empty() {
                self.uri.clone()
            } else {
                let names: Vec<&str> = self.query_properties.iter().map(|p| p.name()).collect();
                format!("{}{{?{}}}", self.uri, names.join(","))
            };
            data.with_url(url)
        } else {
            data.with_url(self.uri.clone()).with_model(self.model())
        }
    }
}

impl AffordanceModel for UberAffordanceModel {
    fn media_types(&self) -> &'static [MediaType] {
        &[MediaType::Uber]
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn http_method(&self) -> HttpMethod {
        self.http_method
    }

    fn uri(&self) -> &str {
        &self.uri
    }

    fn input_properties(&self) -> &[ActionInputParameter] {
        &self.input_properties
    }

    fn query_properties(&self) -> &[ActionInputParameter] {
        &self.query_properties
    }
}

/// Error section of an UBER document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UberError {
    /// Error details.
    #[serde(default)]
    pub data: Vec<UberData>,
}

/// Body of an UBER document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Uber {
    /// Format version.
    pub version: String,
    /// Elements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<UberData>,
    /// Error details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<UberError>,
}

impl Uber {
    /// Links of all top-level elements.
    pub fn links(&self) -> Vec<Link> {
        self.data.iter().flat_map(UberData::links).collect()
    }
}

/// A complete UBER document: `{"uber": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UberDocument {
    /// Document body.
    pub uber: Uber,
}

impl UberDocument {
    /// Document holding `data`.
    pub fn new(version: impl Into<String>, data: Vec<UberData>) -> Self {
        Self {
            uber: Uber {
                version: version.into(),
                data,
                error: None,
            },
        }
    }

    /// Error document; each message becomes a `message` element.
    pub fn error<I, S>(version: impl Into<String>, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let data = messages
            .into_iter()
            .map(|message| {
                let message: String = message.into();
                UberData::new().with_name("message").with_value(message)
            })
            .collect();
        Self {
            uber: Uber {
                version: version.into(),
                data: Vec::new(),
                error: Some(UberError { data }),
            },
        }
    }

    /// Text of every error message.
    pub fn error_messages(&self) -> Vec<String> {
        self.uber
            .error
            .iter()
            .flat_map(|e| e.data.iter())
            .filter_map(|d| d.value.as_ref().map(value_to_string))
            .collect()
    }

    /// Links of all top-level elements.
    pub fn links(&self) -> Vec<Link> {
        self.uber.links()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyperform_core::{ParamLocation, SELF_REL};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_action_for_method() {
        assert_eq!(UberAction::for_request_method(HttpMethod::Get), Ok(UberAction::Read));
        assert_eq!(UberAction::for_request_method(HttpMethod::Post), Ok(UberAction::Append));
        assert_eq!(UberAction::for_request_method(HttpMethod::Put), Ok(UberAction::Replace));
        assert_eq!(UberAction::for_request_method(HttpMethod::Patch), Ok(UberAction::Partial));
        assert_eq!(UberAction::for_request_method(HttpMethod::Delete), Ok(UberAction::Remove));
        assert_eq!(
            UberAction::for_request_method(HttpMethod::Options),
            Err(AffordanceError::UnsupportedMethod(HttpMethod::Options))
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_action_maps_back_to_method(i in 0usize..HttpMethod::ALL.len()) {
            let method = HttpMethod::ALL[i];
            match UberAction::for_request_method(method) {
                Ok(action) => prop_assert_eq!(action.http_method(), method),
                Err(e) => prop_assert_eq!(e, AffordanceError::UnsupportedMethod(method)),
            }
        }
    }

    #[test]
    fn test_serialization_omits_defaults() {
        let data = UberData::new()
            .with_url("/events{?name}")
            .with_rel(vec!["search".to_string()]);
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({"rel": ["search"], "url": "/events{?name}", "templated": true})
        );

        let plain = UberData::new().with_url("/events/1").with_action(UberAction::Remove);
        assert_eq!(
            serde_json::to_value(&plain).unwrap(),
            json!({"url": "/events/1", "action": "remove"})
        );
    }

    #[test]
    fn test_templated_is_ignored_when_parsing() {
        let data: UberData =
            serde_json::from_value(json!({"url": "/events", "templated": true})).unwrap();
        assert_eq!(data, UberData::new().with_url("/events"));
    }

    #[test]
    fn test_links_per_rel() {
        let data = UberData::new()
            .with_url("/events/1")
            .with_rel(vec![SELF_REL.to_string(), "event".to_string()]);
        let rels: Vec<String> = data.links().iter().map(|l| l.rel().to_string()).collect();
        assert_eq!(rels, vec!["self", "event"]);
        assert!(UberData::new().with_rel(vec!["x".to_string()]).links().is_empty());
    }

    #[test]
    fn test_links_grouped_by_href() {
        let data = UberData::from_links(&[
            Link::new("/events/1", SELF_REL),
            Link::new("/events", "collection"),
            Link::new("/events/1", "event"),
        ]);
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].rel, vec!["self", "event"]);
        assert_eq!(data[1].url.as_deref(), Some("/events"));
    }

    #[test]
    fn test_affordance_entries() {
        let get = Affordance::new("findEvents", HttpMethod::Get, "/events{?name,location}")
            .with_query_parameter(ActionInputParameter::new("name", ParamLocation::Query))
            .with_query_parameter(ActionInputParameter::new("location", ParamLocation::Query));
        let entry = UberAffordanceModel::new(&get, &get.components()).unwrap().to_uber_data();
        assert_eq!(entry.url.as_deref(), Some("/events{?name,location}"));
        assert_eq!(entry.model, None);

        let post = Affordance::new("createEvent", HttpMethod::Post, "/events")
            .with_input_parameter(ActionInputParameter::new("name", ParamLocation::BodyProperty))
            .with_input_parameter(ActionInputParameter::new("rating", ParamLocation::BodyProperty));
        let entry = UberAffordanceModel::new(&post, &post.components()).unwrap().to_uber_data();
        assert_eq!(entry.model.as_deref(), Some("name={name}&rating={rating}"));
        assert_eq!(entry.action, UberAction::Append);
        assert_eq!(entry.name.as_deref(), Some("createEvent"));
    }

    #[test]
    fn test_merge_same_url_and_action() {
        let link = Link::new("/events/1", SELF_REL)
            .with_affordance(Affordance::new("findEvent", HttpMethod::Get, "/events/1"));
        let data = link_data(&[link]).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].rel, vec!["self", "findEvent"]);
        assert_eq!(data[0].name.as_deref(), Some("self"));
    }

    #[test]
    fn test_differing_action_is_not_merged() {
        let link = Link::new("/events/1", SELF_REL)
            .with_affordance(Affordance::new("updateEvent", HttpMethod::Put, "/events/1"));
        let data = link_data(&[link]).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].rel, vec!["self"]);
        assert_eq!(data[0].action, UberAction::Read);
        assert_eq!(data[1].rel, vec!["updateEvent"]);
        assert_eq!(data[1].action, UberAction::Replace);
    }

    #[test]
    fn test_string_content_is_single_value() {
        let resource = Resource::new("String", json!("Hello"));
        let data = UberData::from_resource(&resource).unwrap();
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({"data": [{"name": "string", "data": [{"value": "Hello"}]}]})
        );
    }

    #[test]
    fn test_page_element() {
        let paged = PagedResources::new(Resources::default(), Some(PageMetadata::new(10, 1, 25)));
        let data = UberData::from_paged(&paged).unwrap();
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!([{"name": "page", "data": [
                {"name": "number", "value": 1},
                {"name": "size", "value": 10},
                {"name": "totalElements", "value": 25},
                {"name": "totalPages", "value": 3}
            ]}])
        );
    }

    #[test]
    fn test_error_document() {
        let doc = UberDocument::error("1.0", ["Event not found"]);
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({"uber": {"version": "1.0", "error": {"data": [
                {"name": "message", "value": "Event not found"}
            ]}}})
        );
        assert_eq!(doc.error_messages(), vec!["Event not found"]);
    }
}
