//! Resources: content plus links, single or as (paged) collections.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::link::{Link, SELF_REL};

/// A single resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    name: String,
    content: Value,
    links: Vec<Link>,
}

impl Resource {
    /// Create a resource from its type name and content.
    pub fn new(name: impl Into<String>, content: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            links: Vec::new(),
        }
    }

    /// Add a link.
    #[must_use]
    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// Add several links.
    #[must_use]
    pub fn with_links(mut self, links: impl IntoIterator<Item = Link>) -> Self {
        self.links.extend(links);
        self
    }

    /// Type name of the content, e.g. `Event`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Content.
    pub fn content(&self) -> &Value {
        &self.content
    }

    /// Links.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// The `self` link, if present.
    pub fn self_link(&self) -> Option<&Link> {
        find_rel(&self.links, SELF_REL)
    }
}

/// A collection of resources with links of its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resources {
    items: Vec<Resource>,
    links: Vec<Link>,
}

impl Resources {
    /// Create a collection.
    pub fn new(items: impl IntoIterator<Item = Resource>) -> Self {
        Self {
            items: items.into_iter().collect(),
            links: Vec::new(),
        }
    }

    /// Add a link.
    #[must_use]
    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// Items.
    pub fn items(&self) -> &[Resource] {
        &self.items
    }

    /// Links.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// The `self` link, if present.
    pub fn self_link(&self) -> Option<&Link> {
        find_rel(&self.links, SELF_REL)
    }
}

/// Page information of a [`PagedResources`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Requested page size.
    pub size: u64,
    /// Zero-based page number.
    pub number: u64,
    /// Total number of elements.
    pub total_elements: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl PageMetadata {
    /// Metadata with the page count derived from size and total.
    pub fn new(size: u64, number: u64, total_elements: u64) -> Self {
        let total_pages = if size == 0 {
            0
        } else {
            total_elements.div_ceil(size)
        };
        Self {
            size,
            number,
            total_elements,
            total_pages,
        }
    }
}

/// One page of a collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagedResources {
    resources: Resources,
    page: Option<PageMetadata>,
}

impl PagedResources {
    /// Create a page.
    pub fn new(resources: Resources, page: Option<PageMetadata>) -> Self {
        Self { resources, page }
    }

    /// The collection on this page.
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Page information.
    pub fn page(&self) -> Option<&PageMetadata> {
        self.page.as_ref()
    }
}

fn find_rel<'a>(links: &'a [Link], rel: &str) -> Option<&'a Link> {
    links.iter().find(|l| l.rel() == rel)
}
