//! # hyperform-render
//!
//! Renders resources, links and their affordances into hypermedia formats:
//!
//! - [`hal_forms`] - `application/prs.hal-forms+json`
//! - [`uber`] - `application/vnd.amundsen-uber+json`
//! - [`collection_json`] - `application/vnd.collection+json`
//! - [`xhtml`] - `application/xhtml+xml` forms and pages
//!
//! Each format translates an [`Affordance`](hyperform_core::Affordance)
//! through its own [`AffordanceModel`]; [`Renderer`] picks the format by
//! [`MediaType`](hyperform_core::MediaType).
//!
//! # Example
//!
//! ```rust
//! use hyperform_core::{Affordance, HttpMethod, Link, MediaType, Resource};
//! use hyperform_render::Renderer;
//! use serde_json::json;
//!
//! let link = Link::new("/events/1", "self")
//!     .with_affordance(Affordance::new("deleteEvent", HttpMethod::Delete, "/events/1"));
//! let resource = Resource::new("Event", json!({"name": "Tour"})).with_link(link);
//!
//! let bytes = Renderer::default().render_resource(MediaType::HalForms, &resource)?;
//! let document: serde_json::Value = serde_json::from_slice(&bytes)?;
//! assert_eq!(document["_templates"]["default"]["method"], "DELETE");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod collection_json;
pub mod config;
mod error;
pub mod hal_forms;
pub mod model;
mod render;
pub mod uber;
pub mod xhtml;

pub use collection_json::{CollectionJsonAffordanceModel, CollectionJsonDocument};
pub use config::{ConfigError, RenderConfig, XhtmlConfig};
pub use error::{RenderError, Result};
pub use hal_forms::{HalFormsAffordanceModel, HalFormsDocument};
pub use model::{AffordanceModel, FormatModel};
pub use render::Renderer;
pub use uber::{UberAction, UberAffordanceModel, UberData, UberDocument};
pub use xhtml::{
    DocumentationProvider, NoDocumentation, PrefixDocumentation, XhtmlAffordanceModel, XhtmlWriter,
};

/// Prelude for common imports.
pub mod prelude {
    pub use super::{
        AffordanceModel, DocumentationProvider, FormatModel, RenderConfig, RenderError, Renderer,
        XhtmlWriter,
    };
}
