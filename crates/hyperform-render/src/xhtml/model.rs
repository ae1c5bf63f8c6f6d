use hyperform_core::{
    ActionInputParameter, Affordance, HttpMethod, MediaType, TemplateVariable, UriComponents,
    UriTemplate,
};

use crate::model::{AffordanceModel, input_properties_of};

/// XHTML view of an affordance: an anchor or a form.
///
/// Forms submit query parameters whatever the method, so unlike the JSON
/// formats every query parameter is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct XhtmlAffordanceModel {
    name: String,
    http_method: HttpMethod,
    uri: String,
    target: UriTemplate,
    input_properties: Vec<ActionInputParameter>,
    query_properties: Vec<ActionInputParameter>,
}

impl XhtmlAffordanceModel {
    /// Translate an affordance.
    pub fn new(affordance: &Affordance, components: &UriComponents) -> Self {
        Self {
            name: affordance.name().to_string(),
            http_method: affordance.http_method(),
            uri: components.to_uri_string(),
            target: affordance.target().clone(),
            input_properties: input_properties_of(affordance),
            query_properties: affordance.query_parameters().to_vec(),
        }
    }

    /// Query parameters followed by body properties.
    pub fn parameters(&self) -> impl Iterator<Item = &ActionInputParameter> {
        self.query_properties.iter().chain(self.input_properties.iter())
    }

    /// Template variables of the target that no parameter describes.
    pub fn uncovered_variables(&self) -> Vec<&TemplateVariable> {
        self.target
            .variables()
            .iter()
            .filter(|v| !self.parameters().any(|p| p.name() == v.name()))
            .collect()
    }

    /// Whether the affordance is a plain GET rendered as an anchor.
    pub fn is_anchor(&self) -> bool {
        self.is_get() && self.query_properties.is_empty() && self.uncovered_variables().is_empty()
    }

    /// Whether path variables remain unbound, so no form action exists.
    pub fn is_base_uri_templated(&self) -> bool {
        self.target.is_base_uri_templated()
    }

    /// Method of the `<form>` element: GET stays GET, everything else is
    /// posted.
    pub fn form_method(&self) -> HttpMethod {
        if self.is_get() {
            HttpMethod::Get
        } else {
            HttpMethod::Post
        }
    }

    /// The real method when HTML cannot express it.
    pub fn method_override(&self) -> Option<HttpMethod> {
        (!self.http_method.is_form_native()).then_some(self.http_method)
    }
}

impl AffordanceModel for XhtmlAffordanceModel {
    fn media_types(&self) -> &'static [MediaType] {
        &[MediaType::Xhtml]
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

#[cfg(test)]
mod tests {
    use super::*;
    use hyperform_core::ParamLocation;
    use pretty_assertions::assert_eq;

    fn model(affordance: &Affordance) -> XhtmlAffordanceModel {
        XhtmlAffordanceModel::new(affordance, &affordance.components())
    }

    #[test]
    fn test_plain_get_is_anchor() {
        assert!(model(&Affordance::new("findEvent", HttpMethod::Get, "/events/1")).is_anchor());
        let search = Affordance::new("findEvents", HttpMethod::Get, "/events{?name}")
            .with_query_parameter(ActionInputParameter::new("name", ParamLocation::Query));
        assert!(!model(&search).is_anchor());
        assert!(model(&search).uncovered_variables().is_empty());
    }

    #[test]
    fn test_undeclared_template_variable_is_uncovered() {
        let a = Affordance::new("list", HttpMethod::Get, "/events{?sort}");
        let m = model(&a);
        assert!(!m.is_anchor());
        let names: Vec<&str> = m.uncovered_variables().iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["sort"]);
        assert_eq!(m.uri(), "/events");
    }

    #[test]
    fn test_method_override() {
        let put = model(&Affordance::new("updateEvent", HttpMethod::Put, "/events/1"));
        assert_eq!(put.form_method(), HttpMethod::Post);
        assert_eq!(put.method_override(), Some(HttpMethod::Put));
        let post = model(&Affordance::new("createEvent", HttpMethod::Post, "/events"));
        assert_eq!(post.method_override(), None);
    }
}
