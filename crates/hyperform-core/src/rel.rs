//! Relation names for resource types.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Declared relation names of a type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalRelation {
    /// Relation of a single item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    /// Relation of a collection of items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

impl HalRelation {
    /// Declare both relations.
    pub fn new(item: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            item: Some(item.into()),
            collection: Some(collection.into()),
        }
    }
}

/// Resolves relation names for resource types.
pub trait RelProvider: Send + Sync + fmt::Debug {
    /// Relation of a single item of the type.
    fn item_rel(&self, type_name: &str) -> Option<String>;

    /// Relation of a collection of items of the type.
    fn collection_rel(&self, type_name: &str) -> Option<String>;

    /// Whether this provider knows the type.
    fn supports(&self, type_name: &str) -> bool;
}

/// Derives relations from the type name: `Event` gives `event` and `eventList`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRelProvider;

fn uncapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

impl RelProvider for DefaultRelProvider {
    fn item_rel(&self, type_name: &str) -> Option<String> {
        Some(uncapitalize(type_name))
    }

    fn collection_rel(&self, type_name: &str) -> Option<String> {
        Some(format!("{}List", uncapitalize(type_name)))
    }

    fn supports(&self, _type_name: &str) -> bool {
        true
    }
}

/// Looks up the relation declared for a type name.
pub type RelationLookup = Arc<dyn Fn(&str) -> Option<HalRelation> + Send + Sync>;

/// Relations declared on types, with a per-type cache in front of the lookup.
///
/// Each type is looked up at most once in the absence of races. Two threads
/// missing the cache at the same time both run the lookup and the last
/// insert wins, which is harmless since the result only depends on the type.
pub struct AnnotationRelProvider {
    lookup: RelationLookup,
    cache: DashMap<String, Option<HalRelation>>,
}

impl AnnotationRelProvider {
    /// Create a provider around a lookup function.
    pub fn new(lookup: RelationLookup) -> Self {
        Self {
            lookup,
            cache: DashMap::new(),
        }
    }

    /// Create a provider from a fixed set of declarations.
    pub fn from_declarations<I, S>(declarations: I) -> Self
    where
        I: IntoIterator<Item = (S, HalRelation)>,
        S: Into<String>,
    {
        let declared: std::collections::HashMap<String, HalRelation> = declarations
            .into_iter()
            .map(|(name, relation)| (name.into(), relation))
            .collect();
        Self::new(Arc::new(move |type_name: &str| declared.get(type_name).cloned()))
    }

    /// The declared relation of a type, cached.
    pub fn relation(&self, type_name: &str) -> Option<HalRelation> {
        if let Some(cached) = self.cache.get(type_name) {
            return cached.clone();
        }
        let found = (self.lookup)(type_name);
        trace!(type_name, found = found.is_some(), "caching relation lookup");
        self.cache.insert(type_name.to_string(), found.clone());
        found
    }

    /// Number of cached types, including types without relation.
    pub fn cached_types(&self) -> usize {
        self.cache.len()
    }
}

impl fmt::Debug for AnnotationRelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationRelProvider")
            .field("cached_types", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl RelProvider for AnnotationRelProvider {
    fn item_rel(&self, type_name: &str) -> Option<String> {
        self.relation(type_name).and_then(|r| r.item)
    }

    fn collection_rel(&self, type_name: &str) -> Option<String> {
        self.relation(type_name).and_then(|r| r.collection)
    }

    fn supports(&self, type_name: &str) -> bool {
        self.relation(type_name).is_some()
    }
}
