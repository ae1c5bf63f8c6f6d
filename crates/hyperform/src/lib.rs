//! # hyperform - Hypermedia affordances for Rust web APIs
//!
//! Describe what a client can do next with a resource, then render it in the
//! hypermedia format the client asked for.
//!
//! ## Features
//!
//! - **Explicit handler descriptors** - HTTP methods, URI template and
//!   parameters of a request handler, bound to argument values per request
//! - **Body introspection** - request body types flattened into form inputs
//!   with read-only, hidden, required and include/exclude rules
//! - **Suggestions** - enumerations, static option lists and remote lookups
//! - **Four formats** - HAL-FORMS, UBER+JSON, Collection+JSON and XHTML5
//!   forms from the same affordances
//! - **URI templates** - RFC 6570 level 3 subset with partial expansion
//!
//! ## Quick Start
//!
//! ```rust
//! use hyperform::prelude::*;
//!
//! let handler = HandlerMethod::new("updateEvent", "/events/{eventId}")
//!     .method(HttpMethod::Get)
//!     .method(HttpMethod::Put)
//!     .param(MethodParameter::path_variable("eventId"))
//!     .param(MethodParameter::request_body(
//!         "event",
//!         BeanType::new("Event").property(PropertyDescriptor::new("name", ValueType::String)),
//!     ));
//!
//! let affordances = AffordanceAssembler::new()
//!     .assemble(&handler, &Arguments::new().bind("eventId", 1))?;
//! let resource = Resource::new("Event", serde_json::json!({"name": "Tour"}))
//!     .with_link(Link::from_affordances("self", affordances)?);
//!
//! let renderer = Renderer::default();
//! let media_type = renderer.negotiate("application/xhtml+xml")?;
//! let page = String::from_utf8(renderer.render_resource(media_type, &resource)?)?;
//! assert!(page.contains(r#"<input name="_method" type="hidden" class="form-control" value="PUT"/>"#));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub use hyperform_core::{
    ActionInputParameter, Affordance, AffordanceAssembler, AffordanceError, AnnotationRelProvider,
    Arguments, BeanType, DefaultRelProvider, HalRelation, HandlerMethod, HttpMethod,
    InputConstraints, InputSpec, InputType, Link, MediaType, MethodParameter, PageMetadata,
    PagedResources, ParamLocation, PossibleValues, PropertyAccess, PropertyDescriptor,
    RelProvider, RemoteSuggestions, Resource, Resources, SELF_REL, Suggestion, UriComponents,
    UriTemplate, ValueType,
};
pub use hyperform_render::{
    AffordanceModel, CollectionJsonDocument, DocumentationProvider, FormatModel, HalFormsDocument,
    NoDocumentation, PrefixDocumentation, RenderConfig, RenderError, Renderer, UberAction,
    UberDocument, XhtmlConfig, XhtmlWriter,
};

/// Prelude for common imports.
pub mod prelude {
    pub use hyperform_core::prelude::*;
    pub use hyperform_render::prelude::*;
}
