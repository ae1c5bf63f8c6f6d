//! Per-format views of an affordance.
//!
//! Each media type looks at an [`Affordance`] differently: HAL-FORMS only
//! renders body inputs for POST, PUT and PATCH, UBER needs an action and a
//! `model` string, XHTML renders every parameter as a form field. The
//! translation is a pure function of the affordance and the resolved URI of
//! the link carrying it.

use hyperform_core::{
    ActionInputParameter, Affordance, HttpMethod, MediaType, Result, UriComponents,
};

use crate::collection_json::CollectionJsonAffordanceModel;
use crate::hal_forms::HalFormsAffordanceModel;
use crate::uber::UberAffordanceModel;
use crate::xhtml::XhtmlAffordanceModel;

/// What every format knows about an affordance.
pub trait AffordanceModel {
    /// Media types this model renders.
    fn media_types(&self) -> &'static [MediaType];

    /// Affordance name.
    fn name(&self) -> &str;

    /// HTTP method.
    fn http_method(&self) -> HttpMethod;

    /// Target URI as rendered by this format.
    fn uri(&self) -> &str;

    /// Body properties the format renders as inputs.
    fn input_properties(&self) -> &[ActionInputParameter];

    /// Query parameters the format renders.
    fn query_properties(&self) -> &[ActionInputParameter];

    /// Whether this is a safe GET transition.
    fn is_get(&self) -> bool {
        self.http_method().is_get()
    }
}

/// Body properties for methods carrying a body, none otherwise.
pub(crate) fn input_properties_of(affordance: &Affordance) -> Vec<ActionInputParameter> {
    if affordance.http_method().accepts_input() {
        affordance.input_parameters().to_vec()
    } else {
        Vec::new()
    }
}

/// Query parameters of GET affordances, none otherwise.
pub(crate) fn query_properties_of(affordance: &Affordance) -> Vec<ActionInputParameter> {
    if affordance.http_method().is_get() {
        affordance.query_parameters().to_vec()
    } else {
        Vec::new()
    }
}

/// An affordance translated for one media type.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatModel {
    /// `application/prs.hal-forms+json`
    HalForms(HalFormsAffordanceModel),
    /// `application/vnd.amundsen-uber+json`
    Uber(UberAffordanceModel),
    /// `application/vnd.collection+json`
    CollectionJson(CollectionJsonAffordanceModel),
    /// `application/xhtml+xml`
    Xhtml(XhtmlAffordanceModel),
}

impl FormatModel {
    /// Translate `affordance` for `media_type`.
    ///
    /// # Errors
    ///
    /// Returns [`AffordanceError::UnsupportedMethod`](hyperform_core::AffordanceError::UnsupportedMethod)
    /// for UBER models of methods without an UBER action.
    pub fn for_media_type(
        media_type: MediaType,
        affordance: &Affordance,
        components: &UriComponents,
    ) -> Result<Self> {
        Ok(match media_type {
            MediaType::HalForms => {
                Self::HalForms(HalFormsAffordanceModel::new(affordance, components))
            }
            MediaType::Uber => Self::Uber(UberAffordanceModel::new(affordance, components)?),
            MediaType::CollectionJson => {
                Self::CollectionJson(CollectionJsonAffordanceModel::new(affordance, components))
            }
            MediaType::Xhtml => Self::Xhtml(XhtmlAffordanceModel::new(affordance, components)),
        })
    }

    fn inner(&self) -> &dyn AffordanceModel {
        match self {
            Self::HalForms(model) => model,
            Self::Uber(model) => model,
            Self::CollectionJson(model) => model,
            Self::Xhtml(model) => model,
        }
    }
}

impl AffordanceModel for FormatModel {
    fn media_types(&self) -> &'static [MediaType] {
        self.inner().media_types()
    }

    fn name(&self) -> &str {
        self.inner().name()
    }

    fn http_method(&self) -> HttpMethod {
        self.inner().http_method()
    }

    fn uri(&self) -> &str {
        self.inner().uri()
    }

    fn input_properties(&self) -> &[ActionInputParameter] {
        self.inner().input_properties()
    }

    fn query_properties(&self) -> &[ActionInputParameter] {
        self.inner().query_properties()
    }
}
