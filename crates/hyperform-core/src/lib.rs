//! # hyperform-core
//!
//! The affordance model behind hyperform: descriptions of the state
//! transitions a hypermedia resource offers, independent of any wire format.
//!
//! - [`HandlerMethod`] describes a request handler explicitly (methods, URI
//!   template, parameters)
//! - [`AffordanceAssembler`] binds argument values and yields one
//!   [`Affordance`] per HTTP method
//! - [`Link`] carries affordances; [`Resource`] carries links
//! - [`Suggestion`] and [`PossibleValues`] describe enumerated inputs
//!
//! # Example
//!
//! ```rust
//! use hyperform_core::prelude::*;
//!
//! let handler = HandlerMethod::new("updateEvent", "/events/{eventId}")
//!     .method(HttpMethod::Put)
//!     .param(MethodParameter::path_variable("eventId"))
//!     .param(MethodParameter::request_body(
//!         "event",
//!         BeanType::new("Event").property(PropertyDescriptor::new("name", ValueType::String)),
//!     ));
//!
//! let affordances = AffordanceAssembler::new()
//!     .assemble(&handler, &Arguments::new().bind("eventId", 1))?;
//! let link = Link::from_affordances("self", affordances)?;
//! assert_eq!(link.href(), "/events/1");
//! # Ok::<(), hyperform_core::AffordanceError>(())
//! ```

#![deny(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod affordance;
pub mod bean;
mod error;
pub mod introspect;
pub mod link;
pub mod media;
mod method;
pub mod param;
pub mod rel;
pub mod resource;
pub mod suggest;
pub mod uri;

pub use affordance::{
    Affordance, AffordanceAssembler, Arguments, HandlerMethod, MethodParameter, ParameterKind,
};
pub use bean::{BeanType, PropertyAccess, PropertyDescriptor, ValueType};
pub use error::{AffordanceError, Result};
pub use introspect::InputSpec;
pub use link::{Link, SELF_REL};
pub use media::MediaType;
pub use method::HttpMethod;
pub use param::{ActionInputParameter, InputConstraints, InputType, ParamLocation};
pub use rel::{AnnotationRelProvider, DefaultRelProvider, HalRelation, RelProvider};
pub use resource::{PageMetadata, PagedResources, Resource, Resources};
pub use suggest::{PossibleValues, RemoteSuggestions, Suggestion};
pub use uri::{TemplateVariable, TemplateVariables, UriComponents, UriTemplate, VariableKind};

/// Prelude for common imports.
pub mod prelude {
    pub use super::{
        ActionInputParameter, Affordance, AffordanceAssembler, AffordanceError, Arguments,
        BeanType, HandlerMethod, HttpMethod, InputSpec, Link, MediaType, MethodParameter,
        PossibleValues, PropertyAccess, PropertyDescriptor, Resource, Resources, Suggestion,
        ValueType,
    };
}
