//! HAL-FORMS documents (`application/prs.hal-forms+json`).
//!
//! A HAL-FORMS document is a HAL document with an extra `_templates` object.
//! Every non-GET affordance of the resource's links becomes a template; the
//! first one is keyed `default`, the others by affordance name.

use std::collections::HashMap;

use hyperform_core::suggest::value_to_string;
use hyperform_core::{
    ActionInputParameter, Affordance, DefaultRelProvider, HttpMethod, Link, MediaType,
    PageMetadata, PagedResources, RelProvider, Resource, Resources, UriComponents,
};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::model::{AffordanceModel, input_properties_of, query_properties_of};

/// One inline option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalFormsOption {
    /// Display text.
    pub prompt: String,
    /// Submitted value.
    pub value: String,
}

/// Where remote options are fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalFormsOptionsLink {
    /// Target of the options lookup.
    pub href: String,
}

/// Allowed values of a property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HalFormsOptions {
    /// Options listed in the document.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inline: Vec<HalFormsOption>,
    /// Options fetched from elsewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<HalFormsOptionsLink>,
    /// Field of a remote option holding the submitted value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_field: Option<String>,
    /// Field of a remote option holding the display text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_field: Option<String>,
    /// Values selected initially.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_values: Vec<String>,
}

/// One input of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HalFormsProperty {
    /// Property name.
    pub name: String,
    /// Whether the value may be edited. Always emitted.
    #[serde(default)]
    pub read_only: bool,
    /// Current value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Human readable caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Pattern the value must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    /// Whether a value must be supplied.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Allowed values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<HalFormsOptions>,
}

impl HalFormsProperty {
    /// Property for one input parameter of a `method` affordance. PATCH
    /// never marks a property required.
    pub fn from_parameter(param: &ActionInputParameter, method: HttpMethod) -> Self {
        let value = if param.is_collection() {
            None
        } else {
            param.value().map(value_to_string)
        };
        Self {
            name: param.name().to_string(),
            read_only: param.is_read_only(),
            value,
            prompt: param.description().map(str::to_string),
            regex: param.constraints().pattern.clone(),
            required: param.is_required() && matches!(method, HttpMethod::Post | HttpMethod::Put),
            options: options_of(param),
        }
    }
}

fn options_of(param: &ActionInputParameter) -> Option<HalFormsOptions> {
    let current = param.values();
    if param.has_suggestions() {
        let inline = param
            .suggestions()
            .iter()
            .map(|s| HalFormsOption {
                prompt: s.text().to_string(),
                value: s.id().to_string(),
            })
            .collect();
        let selected_values = param
            .suggestions()
            .iter()
            .filter(|s| current.iter().any(|v| s.matches(v)))
            .map(|s| s.id().to_string())
            .collect();
        return Some(HalFormsOptions {
            inline,
            selected_values,
            ..HalFormsOptions::default()
        });
    }
    param.remote_suggestions().map(|remote| HalFormsOptions {
        link: Some(HalFormsOptionsLink {
            href: remote.href.clone(),
        }),
        value_field: remote.value_field.clone(),
        prompt_field: remote.prompt_field.clone(),
        selected_values: current.into_iter().map(value_to_string).collect(),
        ..HalFormsOptions::default()
    })
}

/// A form: method plus properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalFormsTemplate {
    /// HTTP method, serialized uppercase.
    pub method: HttpMethod,
    /// Inputs; omitted when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<HalFormsProperty>,
}

/// HAL-FORMS view of an affordance.
#[derive(Debug, Clone, PartialEq)]
pub struct HalFormsAffordanceModel {
    name: String,
    http_method: HttpMethod,
    uri: String,
    input_properties: Vec<ActionInputParameter>,
    query_properties: Vec<ActionInputParameter>,
}

impl HalFormsAffordanceModel {
    /// Translate an affordance.
    pub fn new(affordance: &Affordance, components: &UriComponents) -> Self {
        Self {
            name: affordance.name().to_string(),
            http_method: affordance.http_method(),
            uri: components.to_uri_string(),
            input_properties: input_properties_of(affordance),
            query_properties: query_properties_of(affordance),
        }
    }

    /// Template properties, in declaration order.
    pub fn properties(&self) -> Vec<HalFormsProperty> {
        self.input_properties
            .iter()
            .map(|p| HalFormsProperty::from_parameter(p, self.http_method))
            .collect()
    }

    /// The template, or `None` for GET affordances.
    pub fn template(&self) -> Option<HalFormsTemplate> {
        (!self.is_get()).then(|| HalFormsTemplate {
            method: self.http_method,
            properties: self.properties(),
        })
    }
}

impl AffordanceModel for HalFormsAffordanceModel {
    fn media_types(&self) -> &'static [MediaType] {
        &[MediaType::HalForms]
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

/// A link in `_links`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalLink {
    /// Target, possibly templated.
    pub href: String,
    /// Present and `true` only for templated hrefs.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub templated: bool,
    /// Title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl From<&Link> for HalLink {
    fn from(link: &Link) -> Self {
        Self {
            href: link.href().to_string(),
            templated: link.is_templated(),
            title: link.title().map(str::to_string),
        }
    }
}

/// A HAL-FORMS document ready to serialize.
///
/// Object content is inlined at the top level; any other content is placed
/// under `content`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HalFormsDocument {
    content: Value,
    links: Vec<Link>,
    embedded: Vec<(String, Vec<HalFormsDocument>)>,
    page: Option<PageMetadata>,
    templates: Vec<(String, HalFormsTemplate)>,
}

impl HalFormsDocument {
    /// Document of a single resource.
    pub fn from_resource(resource: &Resource, default_template: &str) -> Self {
        Self {
            content: resource.content().clone(),
            links: resource.links().to_vec(),
            templates: templates_of(resource.links(), default_template),
            ..Self::default()
        }
    }

    /// Document of a collection; items are embedded under the collection
    /// relation of their type.
    pub fn from_resources(
        resources: &Resources,
        rel_provider: &dyn RelProvider,
        default_template: &str,
    ) -> Self {
        let mut embedded: Vec<(String, Vec<HalFormsDocument>)> = Vec::new();
        for item in resources.items() {
            let rel = rel_provider
                .collection_rel(item.name())
                .or_else(|| DefaultRelProvider.collection_rel(item.name()))
                .unwrap_or_default();
            let document = Self::from_resource(item, default_template);
            match embedded.iter_mut().find(|(r, _)| *r == rel) {
                Some((_, items)) => items.push(document),
                None => embedded.push((rel, vec![document])),
            }
        }
        Self {
            links: resources.links().to_vec(),
            embedded,
            templates: templates_of(resources.links(), default_template),
            ..Self::default()
        }
    }

    /// Document of one page of a collection.
    pub fn from_paged(
        paged: &PagedResources,
        rel_provider: &dyn RelProvider,
        default_template: &str,
    ) -> Self {
        Self {
            page: paged.page().copied(),
            ..Self::from_resources(paged.resources(), rel_provider, default_template)
        }
    }

    /// Templates in document order.
    pub fn templates(&self) -> &[(String, HalFormsTemplate)] {
        &self.templates
    }

    /// Template by key.
    pub fn template(&self, key: &str) -> Option<&HalFormsTemplate> {
        self.templates.iter().find(|(k, _)| k == key).map(|(_, t)| t)
    }

    /// Links.
    pub fn links(&self) -> &[Link] {
        &self.links
    }
}

fn templates_of(links: &[Link], default_template: &str) -> Vec<(String, HalFormsTemplate)> {
    let mut templates: Vec<(String, HalFormsTemplate)> = Vec::new();
    for affordance in links.iter().flat_map(Link::affordances) {
        let model = HalFormsAffordanceModel::new(affordance, &affordance.components());
        let Some(template) = model.template() else {
            continue;
        };
        let key = if templates.is_empty() {
            default_template.to_string()
        } else {
            model.name().to_string()
        };
        if templates.iter().any(|(k, _)| *k == key) {
            trace!(key = %key, "duplicate HAL-FORMS template dropped");
            continue;
        }
        templates.push((key, template));
    }
    templates
}

struct LinksByRel<'a>(&'a [Link]);

impl Serialize for LinksByRel<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut order: Vec<&str> = Vec::new();
        let mut by_rel: HashMap<&str, Vec<HalLink>> = HashMap::new();
        for link in self.0 {
            by_rel
                .entry(link.rel())
                .or_insert_with(|| {
                    order.push(link.rel());
                    Vec::new()
                })
                .push(HalLink::from(link));
        }

        let mut map = serializer.serialize_map(Some(order.len()))?;
        for rel in order {
            match by_rel.get(rel).map(Vec::as_slice) {
                Some([single]) => map.serialize_entry(rel, single)?,
                Some(many) => map.serialize_entry(rel, many)?,
                None => {}
            }
        }
        map.end()
    }
}

struct Keyed<'a, T>(&'a [(String, T)]);

impl<T: Serialize> Serialize for Keyed<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for HalFormsDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match &self.content {
            Value::Object(fields) => {
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
            }
            Value::Null => {}
            other => map.serialize_entry("content", other)?,
        }
        if !self.links.is_empty() {
            map.serialize_entry("_links", &LinksByRel(&self.links))?;
        }
        if !self.embedded.is_empty() {
            map.serialize_entry("_embedded", &Keyed(&self.embedded))?;
        }
        if let Some(page) = &self.page {
            map.serialize_entry("page", page)?;
        }
        if !self.templates.is_empty() {
            map.serialize_entry("_templates", &Keyed(&self.templates))?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyperform_core::{ParamLocation, RemoteSuggestions, SELF_REL, Suggestion};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn body(name: &str) -> ActionInputParameter {
        ActionInputParameter::new(name, ParamLocation::BodyProperty)
    }

    #[test]
    fn test_required_only_for_post_and_put() {
        let param = body("name").with_required(true);
        assert!(HalFormsProperty::from_parameter(&param, HttpMethod::Post).required);
        assert!(HalFormsProperty::from_parameter(&param, HttpMethod::Put).required);
        assert!(!HalFormsProperty::from_parameter(&param, HttpMethod::Patch).required);
    }

    #[test]
    fn test_property_serialization_omits_defaults() {
        let property = HalFormsProperty::from_parameter(&body("name"), HttpMethod::Post);
        assert_eq!(
            serde_json::to_value(&property).unwrap(),
            json!({"name": "name", "readOnly": false})
        );
    }

    #[test]
    fn test_inline_options_with_selection() {
        let param = body("status")
            .with_suggestions(Suggestion::wrap(["OPEN", "CLOSED"]))
            .with_value("CLOSED");
        let property = HalFormsProperty::from_parameter(&param, HttpMethod::Put);
        assert_eq!(
            serde_json::to_value(&property).unwrap(),
            json!({
                "name": "status",
                "readOnly": false,
                "value": "CLOSED",
                "options": {
                    "inline": [
                        {"prompt": "OPEN", "value": "OPEN"},
                        {"prompt": "CLOSED", "value": "CLOSED"}
                    ],
                    "selectedValues": ["CLOSED"]
                }
            })
        );
    }

    #[test]
    fn test_remote_options() {
        let param = body("performer").with_remote_suggestions(
            RemoteSuggestions::new("/performers").with_value_field("id"),
        );
        let options = HalFormsProperty::from_parameter(&param, HttpMethod::Post)
            .options
            .unwrap();
        assert_eq!(options.link.map(|l| l.href), Some("/performers".to_string()));
        assert_eq!(options.value_field.as_deref(), Some("id"));
        assert!(options.inline.is_empty());
    }

    #[test]
    fn test_get_affordance_has_no_template() {
        let a = Affordance::new("findEvents", HttpMethod::Get, "/events");
        let model = HalFormsAffordanceModel::new(&a, &a.components());
        assert_eq!(model.template(), None);
    }

    #[test]
    fn test_document_layout() {
        let link = Link::new("/events/1", SELF_REL)
            .with_affordance(Affordance::new("findEvent", HttpMethod::Get, "/events/1"))
            .with_affordance(
                Affordance::new("updateEvent", HttpMethod::Put, "/events/1")
                    .with_input_parameter(body("name").with_value("Tour")),
            )
            .with_affordance(Affordance::new("deleteEvent", HttpMethod::Delete, "/events/1"));
        let resource = Resource::new("Event", json!({"name": "Tour"}))
            .with_link(link)
            .with_link(Link::new("/events{?name}", "search"));

        let document = HalFormsDocument::from_resource(&resource, "default");
        assert_eq!(
            serde_json::to_value(&document).unwrap(),
            json!({
                "name": "Tour",
                "_links": {
                    "self": {"href": "/events/1"},
                    "search": {"href": "/events{?name}", "templated": true}
                },
                "_templates": {
                    "default": {
                        "method": "PUT",
                        "properties": [{"name": "name", "readOnly": false, "value": "Tour"}]
                    },
                    "deleteEvent": {"method": "DELETE"}
                }
            })
        );
    }

    #[test]
    fn test_repeated_rel_becomes_array() {
        let resource = Resource::new("Event", json!("plain"))
            .with_link(Link::new("/a", "item"))
            .with_link(Link::new("/b", "item"));
        let json = serde_json::to_value(HalFormsDocument::from_resource(&resource, "default")).unwrap();
        assert_eq!(
            json,
            json!({
                "content": "plain",
                "_links": {"item": [{"href": "/a"}, {"href": "/b"}]}
            })
        );
    }

    #[test]
    fn test_embedded_collection_with_page() {
        let resources = Resources::new([
            Resource::new("Event", json!({"name": "A"})),
            Resource::new("Event", json!({"name": "B"})),
        ])
        .with_link(Link::new("/events", SELF_REL));
        let paged = PagedResources::new(resources, Some(PageMetadata::new(2, 0, 3)));
        let json = serde_json::to_value(HalFormsDocument::from_paged(
            &paged,
            &DefaultRelProvider,
            "default",
        ))
        .unwrap();
        assert_eq!(
            json,
            json!({
                "_links": {"self": {"href": "/events"}},
                "_embedded": {"eventList": [{"name": "A"}, {"name": "B"}]},
                "page": {"size": 2, "number": 0, "totalElements": 3, "totalPages": 2}
            })
        );
    }
}
