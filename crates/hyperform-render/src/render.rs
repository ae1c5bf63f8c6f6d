//! One entry point for all formats.

use std::sync::Arc;

use hyperform_core::{
    DefaultRelProvider, MediaType, PagedResources, RelProvider, Resource, Resources,
};
use tracing::debug;

use crate::collection_json::CollectionJsonDocument;
use crate::config::RenderConfig;
use crate::error::{RenderError, Result};
use crate::hal_forms::HalFormsDocument;
use crate::uber::{UberData, UberDocument};
use crate::xhtml::{DocumentationProvider, NoDocumentation, XhtmlWriter};

/// Renders resources into any supported media type.
///
/// Cheap to clone and safe to share between threads; rendering never mutates
/// the renderer.
#[derive(Debug, Clone)]
pub struct Renderer {
    config: RenderConfig,
    rel_provider: Arc<dyn RelProvider>,
    docs: Arc<dyn DocumentationProvider>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl Renderer {
    /// Renderer with default relations and no documentation links.
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            rel_provider: Arc::new(DefaultRelProvider),
            docs: Arc::new(NoDocumentation),
        }
    }

    /// Resolve embedded collection relations with `provider`.
    #[must_use]
    pub fn with_rel_provider(mut self, provider: Arc<dyn RelProvider>) -> Self {
        self.rel_provider = provider;
        self
    }

    /// Link XHTML field labels to documentation.
    #[must_use]
    pub fn with_documentation(mut self, docs: Arc<dyn DocumentationProvider>) -> Self {
        self.docs = docs;
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Pick the first renderable type of an `Accept` header. Wildcards pick
    /// HAL-FORMS.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedMediaType`] if no listed type is
    /// rendered.
    pub fn negotiate(&self, accept: &str) -> Result<MediaType> {
        for candidate in accept.split(',') {
            let essence = candidate.split(';').next().unwrap_or_default().trim();
            if essence == "*/*" || essence == "application/*" {
                return Ok(MediaType::HalForms);
            }
            if let Ok(media_type) = essence.parse::<MediaType>() {
                return Ok(media_type);
            }
        }
        Err(RenderError::UnsupportedMediaType(accept.to_string()))
    }

    /// Render a single resource.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Affordance`] if an affordance cannot be
    /// expressed in `media_type`, [`RenderError::Json`] or [`RenderError::Io`]
    /// if serialization fails.
    pub fn render_resource(&self, media_type: MediaType, resource: &Resource) -> Result<Vec<u8>> {
        debug!(%media_type, resource = resource.name(), "rendering resource");
        match media_type {
            MediaType::HalForms => Ok(serde_json::to_vec(&HalFormsDocument::from_resource(
                resource,
                &self.config.hal_forms_default_template,
            ))?),
            MediaType::Uber => {
                let data = UberData::from_resource(resource)?.data;
                Ok(serde_json::to_vec(&UberDocument::new(&self.config.uber_version, data))?)
            }
            MediaType::CollectionJson => {
                let document = CollectionJsonDocument::from_resource(
                    &self.config.collection_json_version,
                    resource,
                );
                Ok(serde_json::to_vec(&document)?)
            }
            MediaType::Xhtml => {
                let mut writer = self.xhtml_writer();
                writer.begin_html(resource.name())?;
                writer.write_resource(resource)?;
                writer.end_html()?;
                Ok(writer.into_inner())
            }
        }
    }

    /// Render a collection.
    ///
    /// # Errors
    ///
    /// See [`render_resource`](Self::render_resource).
    pub fn render_resources(
        &self,
        media_type: MediaType,
        resources: &Resources,
    ) -> Result<Vec<u8>> {
        debug!(%media_type, items = resources.items().len(), "rendering collection");
        match media_type {
            MediaType::HalForms => Ok(serde_json::to_vec(&HalFormsDocument::from_resources(
                resources,
                self.rel_provider.as_ref(),
                &self.config.hal_forms_default_template,
            ))?),
            MediaType::Uber => Ok(serde_json::to_vec(&UberDocument::new(
                &self.config.uber_version,
                UberData::from_resources(resources)?,
            ))?),
            MediaType::CollectionJson => {
                let document = CollectionJsonDocument::from_resources(
                    &self.config.collection_json_version,
                    resources,
                );
                Ok(serde_json::to_vec(&document)?)
            }
            MediaType::Xhtml => {
                let mut writer = self.xhtml_writer();
                writer.begin_html("Resources")?;
                writer.write_resources(resources)?;
                writer.end_html()?;
                Ok(writer.into_inner())
            }
        }
    }

    /// Render one page of a collection.
    ///
    /// # Errors
    ///
    /// See [`render_resource`](Self::render_resource).
    pub fn render_paged(&self, media_type: MediaType, paged: &PagedResources) -> Result<Vec<u8>> {
        match media_type {
            MediaType::HalForms => Ok(serde_json::to_vec(&HalFormsDocument::from_paged(
                paged,
                self.rel_provider.as_ref(),
                &self.config.hal_forms_default_template,
            ))?),
            MediaType::Uber => Ok(serde_json::to_vec(&UberDocument::new(
                &self.config.uber_version,
                UberData::from_paged(paged)?,
            ))?),
            MediaType::CollectionJson => Ok(serde_json::to_vec(&CollectionJsonDocument::from_paged(
                &self.config.collection_json_version,
                paged,
            ))?),
            MediaType::Xhtml => self.render_resources(media_type, paged.resources()),
        }
    }

    fn xhtml_writer(&self) -> XhtmlWriter<Vec<u8>> {
        XhtmlWriter::new(Vec::new())
            .with_config(self.config.xhtml.clone())
            .with_documentation(Arc::clone(&self.docs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyperform_core::{Link, SELF_REL};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    #[test]
    fn test_negotiate() {
        let renderer = Renderer::default();
        assert_eq!(
            renderer
                .negotiate("application/json, application/vnd.amundsen-uber+json;q=0.9")
                .unwrap(),
            MediaType::Uber
        );
        assert_eq!(renderer.negotiate("text/html").unwrap(), MediaType::Xhtml);
        assert_eq!(renderer.negotiate("*/*").unwrap(), MediaType::HalForms);
        assert!(matches!(
            renderer.negotiate("application/json"),
            Err(RenderError::UnsupportedMediaType(_))
        ));
    }

    #[test]
    fn test_every_media_type_renders() {
        let renderer = Renderer::default();
        let resource = Resource::new("Event", json!({"name": "Tour"}))
            .with_link(Link::new("/events/1", SELF_REL));
        for media_type in MediaType::ALL {
            let bytes = renderer.render_resource(media_type, &resource).unwrap();
            if media_type.is_json() {
                serde_json::from_slice::<Value>(&bytes).unwrap();
            } else {
                assert!(String::from_utf8(bytes).unwrap().contains("<dd>Tour</dd>"));
            }
        }
    }

    #[test]
    fn test_uber_version_from_config() {
        let renderer = Renderer::new(RenderConfig::default().with_uber_version("2.0"));
        let bytes = renderer
            .render_resources(MediaType::Uber, &Resources::default())
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json, json!({"uber": {"version": "2.0"}}));
    }
}
