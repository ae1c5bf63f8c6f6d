//! Collection+JSON documents (`application/vnd.collection+json`).

use hyperform_core::{
    ActionInputParameter, Affordance, HttpMethod, Link, MediaType, PagedResources, Resource,
    Resources, SELF_REL, UriComponents,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{AffordanceModel, input_properties_of, query_properties_of};

/// A name/value pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionJsonData {
    /// Field name.
    pub name: String,
    /// Field value.
    #[serde(default)]
    pub value: Value,
    /// Human readable caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl CollectionJsonData {
    /// Create a pair.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            prompt: None,
        }
    }

    fn from_parameter(param: &ActionInputParameter) -> Self {
        Self {
            name: param.name().to_string(),
            value: Value::String(param.value_formatted()),
            prompt: param.description().map(str::to_string),
        }
    }
}

/// A link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionJsonLink {
    /// Relation.
    pub rel: String,
    /// Target.
    pub href: String,
    /// Human readable caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl From<&Link> for CollectionJsonLink {
    fn from(link: &Link) -> Self {
        Self {
            rel: link.rel().to_string(),
            href: link.href().to_string(),
            prompt: link.title().map(str::to_string),
        }
    }
}

/// One item of the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionJsonItem {
    /// Item URI.
    pub href: String,
    /// Item fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<CollectionJsonData>,
    /// Item links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<CollectionJsonLink>,
}

/// A parameterised GET.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionJsonQuery {
    /// Relation.
    pub rel: String,
    /// Target.
    pub href: String,
    /// Human readable caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Query parameters.
    #[serde(default)]
    pub data: Vec<CollectionJsonData>,
}

/// Fields a client fills in to write an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionJsonTemplate {
    /// Fields.
    #[serde(default)]
    pub data: Vec<CollectionJsonData>,
}

/// Error details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionJsonError {
    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Application error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of a Collection+JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionJson {
    /// Format version.
    pub version: String,
    /// URI of the collection.
    pub href: String,
    /// Links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<CollectionJsonLink>,
    /// Items.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<CollectionJsonItem>,
    /// Queries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub queries: Vec<CollectionJsonQuery>,
    /// Write template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<CollectionJsonTemplate>,
    /// Error details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CollectionJsonError>,
}

/// A complete document: `{"collection": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionJsonDocument {
    /// Document body.
    pub collection: CollectionJson,
}

impl CollectionJsonDocument {
    /// Empty collection at `href`.
    pub fn new(version: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            collection: CollectionJson {
                version: version.into(),
                href: href.into(),
                links: Vec::new(),
                items: Vec::new(),
                queries: Vec::new(),
                template: None,
                error: None,
            },
        }
    }

    /// A single resource as a one-item collection.
    pub fn from_resource(version: impl Into<String>, resource: &Resource) -> Self {
        let mut document = Self::new(version, self_href(resource.links()));
        document.collection.links = other_links(resource.links());
        document.collection.items.push(CollectionJsonItem {
            href: document.collection.href.clone(),
            data: content_data(resource.content()),
            links: Vec::new(),
        });
        document.add_affordances(resource.links());
        document
    }

    /// A collection of resources.
    pub fn from_resources(version: impl Into<String>, resources: &Resources) -> Self {
        let mut document = Self::new(version, self_href(resources.links()));
        document.collection.links = other_links(resources.links());
        document.collection.items = resources
            .items()
            .iter()
            .map(|item| CollectionJsonItem {
                href: self_href(item.links()),
                data: content_data(item.content()),
                links: other_links(item.links()),
            })
            .collect();
        document.add_affordances(resources.links());
        document
    }

    /// One page of a collection; paging travels in the links.
    pub fn from_paged(version: impl Into<String>, paged: &PagedResources) -> Self {
        Self::from_resources(version, paged.resources())
    }

    /// Error document.
    pub fn error(
        version: impl Into<String>,
        href: impl Into<String>,
        error: CollectionJsonError,
    ) -> Self {
        let mut document = Self::new(version, href);
        document.collection.error = Some(error);
        document
    }

    /// Queries from GET affordances, template from the first affordance with
    /// inputs.
    fn add_affordances(&mut self, links: &[Link]) {
        for affordance in links.iter().flat_map(Link::affordances) {
            let model = CollectionJsonAffordanceModel::new(affordance, &affordance.components());
            if let Some(query) = model.query() {
                if query.href != self.collection.href || !query.data.is_empty() {
                    self.collection.queries.push(query);
                }
            } else if self.collection.template.is_none() && !model.input_properties.is_empty() {
                self.collection.template = Some(model.template());
            }
        }
    }
}

fn self_href(links: &[Link]) -> String {
    links
        .iter()
        .find(|l| l.rel() == SELF_REL)
        .map(Link::expand)
        .unwrap_or_default()
}

fn other_links(links: &[Link]) -> Vec<CollectionJsonLink> {
    links
        .iter()
        .filter(|l| l.rel() != SELF_REL)
        .map(CollectionJsonLink::from)
        .collect()
}

fn content_data(content: &Value) -> Vec<CollectionJsonData> {
    match content {
        Value::Object(fields) => fields
            .iter()
            .map(|(name, value)| CollectionJsonData::new(name.clone(), value.clone()))
            .collect(),
        Value::Null => Vec::new(),
        other => vec![CollectionJsonData::new("content", other.clone())],
    }
}

/// Collection+JSON view of an affordance.
///
/// Only GET affordances have a relation and URI; the others contribute
/// template fields.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionJsonAffordanceModel {
    name: String,
    http_method: HttpMethod,
    rel: String,
    uri: String,
    input_properties: Vec<ActionInputParameter>,
    query_properties: Vec<ActionInputParameter>,
}

impl CollectionJsonAffordanceModel {
    /// Translate an affordance.
    pub fn new(affordance: &Affordance, components: &UriComponents) -> Self {
        let is_get = affordance.http_method().is_get();
        Self {
            name: affordance.name().to_string(),
            http_method: affordance.http_method(),
            rel: if is_get {
                affordance.name().to_string()
            } else {
                String::new()
            },
            uri: if is_get {
                components.to_uri_string()
            } else {
                String::new()
            },
            input_properties: input_properties_of(affordance),
            query_properties: query_properties_of(affordance),
        }
    }

    /// Relation; empty for non-GET affordances.
    pub fn rel(&self) -> &str {
        &self.rel
    }

    /// Template fields.
    pub fn template(&self) -> CollectionJsonTemplate {
        CollectionJsonTemplate {
            data: self
                .input_properties
                .iter()
                .map(CollectionJsonData::from_parameter)
                .collect(),
        }
    }

    /// The query of a GET affordance.
    pub fn query(&self) -> Option<CollectionJsonQuery> {
        self.is_get().then(|| CollectionJsonQuery {
            rel: self.rel.clone(),
            href: self.uri.clone(),
            prompt: None,
            data: self
                .query_properties
                .iter()
                .map(CollectionJsonData::from_parameter)
                .collect(),
        })
    }
}

impl AffordanceModel for CollectionJsonAffordanceModel {
    fn media_types(&self) -> &'static [MediaType] {
        &[MediaType::CollectionJson]
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
