//! Affordances and their assembly from handler descriptors.
//!
//! A [`HandlerMethod`] states explicitly what a request handler accepts: its
//! HTTP methods, URI template and parameters. [`AffordanceAssembler`] binds
//! argument values to it and yields one immutable [`Affordance`] per HTTP
//! method.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::bean::{BeanType, ValueType};
use crate::error::{AffordanceError, Result};
use crate::introspect::{InputSpec, body_parameters};
use crate::method::HttpMethod;
use crate::param::{ActionInputParameter, InputConstraints, InputType, ParamLocation};
use crate::suggest::{PossibleValues, value_to_string};
use crate::uri::{TemplateVariable, TemplateVariables, UriComponents, UriTemplate, VariableKind};

/// What a handler parameter binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterKind {
    /// A variable of the handler's URI template.
    PathVariable,
    /// A query string parameter.
    RequestParam,
    /// The request body, described by its type.
    RequestBody(BeanType),
    /// A request header.
    Header,
}

/// One declared parameter of a [`HandlerMethod`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodParameter {
    name: String,
    kind: ParameterKind,
    value_type: ValueType,
    required: bool,
    collection: bool,
    input_type: Option<InputType>,
    possible_values: PossibleValues,
    constraints: InputConstraints,
    description: Option<String>,
}

impl MethodParameter {
    fn new(name: impl Into<String>, kind: ParameterKind, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            kind,
            value_type,
            required: false,
            collection: false,
            input_type: None,
            possible_values: PossibleValues::None,
            constraints: InputConstraints::default(),
            description: None,
        }
    }

    /// A path variable; always required.
    pub fn path_variable(name: impl Into<String>) -> Self {
        let mut param = Self::new(name, ParameterKind::PathVariable, ValueType::String);
        param.required = true;
        param
    }

    /// An optional query parameter.
    pub fn request_param(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(name, ParameterKind::RequestParam, value_type)
    }

    /// The request body.
    pub fn request_body(name: impl Into<String>, bean: BeanType) -> Self {
        Self::new(name, ParameterKind::RequestBody(bean), ValueType::Object)
    }

    /// A request header.
    pub fn header(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Header, ValueType::String)
    }

    /// Mark as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark as collection-valued.
    #[must_use]
    pub fn collection(mut self) -> Self {
        self.collection = true;
        self
    }

    /// Override the input type derived from the value type.
    #[must_use]
    pub fn with_input_type(mut self, input_type: InputType) -> Self {
        self.input_type = Some(input_type);
        self
    }

    /// Declare allowed values.
    #[must_use]
    pub fn with_possible_values(mut self, possible_values: PossibleValues) -> Self {
        self.possible_values = possible_values;
        self
    }

    /// Set constraints.
    #[must_use]
    pub fn with_constraints(mut self, constraints: InputConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Set a description, also used as template variable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// What the parameter binds to.
    pub fn kind(&self) -> &ParameterKind {
        &self.kind
    }

    fn to_input_parameter(
        &self,
        location: ParamLocation,
        value: Option<&Value>,
    ) -> ActionInputParameter {
        let mut param = ActionInputParameter::new(self.name.clone(), location)
            .with_input_type(self.input_type.unwrap_or_else(|| self.value_type.input_type()))
            .with_required(self.required)
            .with_collection(self.collection)
            .with_suggestions(self.possible_values.resolve())
            .with_constraints(self.constraints.clone());
        if let Some(value) = value {
            param = param.with_value(value.clone());
        }
        if let Some(remote) = self.possible_values.remote() {
            param = param.with_remote_suggestions(remote.clone());
        }
        if let Some(description) = &self.description {
            param = param.with_description(description.clone());
        }
        param
    }
}

/// An explicit description of a request handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerMethod {
    name: String,
    methods: Vec<HttpMethod>,
    uri_template: String,
    parameters: Vec<MethodParameter>,
    input_spec: InputSpec,
}

impl HandlerMethod {
    /// Describe a handler by name and URI template, e.g. `/events/{eventId}`.
    pub fn new(name: impl Into<String>, uri_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
            uri_template: uri_template.into(),
            parameters: Vec::new(),
            input_spec: InputSpec::default(),
        }
    }

    /// Add an HTTP method the handler answers to.
    #[must_use]
    pub fn method(mut self, method: HttpMethod) -> Self {
        if !self.methods.contains(&method) {
            self.methods.push(method);
        }
        self
    }

    /// Add a parameter.
    #[must_use]
    pub fn param(mut self, parameter: MethodParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Set the allow and deny lists applied to body properties.
    #[must_use]
    pub fn input_spec(mut self, spec: InputSpec) -> Self {
        self.input_spec = spec;
        self
    }

    /// Handler name; used as affordance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared HTTP methods.
    pub fn methods(&self) -> &[HttpMethod] {
        &self.methods
    }

    /// Declared parameters.
    pub fn parameters(&self) -> &[MethodParameter] {
        &self.parameters
    }

    fn parameters_of<'a>(
        &'a self,
        wanted: fn(&ParameterKind) -> bool,
    ) -> impl Iterator<Item = &'a MethodParameter> + 'a {
        self.parameters.iter().filter(move |p| wanted(&p.kind))
    }
}

/// Argument values bound to a handler's parameters by name. A missing or
/// `null` value leaves the parameter unbound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(HashMap<String, Value>);

impl Arguments {
    /// No bound values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value.
    #[must_use]
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Bound value, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }
}

/// A possible state transition: target URI, HTTP method and inputs.
///
/// Immutable once built. Query parameters come before body properties in
/// [`parameters`](Self::parameters).
#[derive(Debug, Clone, PartialEq)]
pub struct Affordance {
    name: String,
    http_method: HttpMethod,
    target: UriTemplate,
    path_parameters: Vec<ActionInputParameter>,
    query_parameters: Vec<ActionInputParameter>,
    input_parameters: Vec<ActionInputParameter>,
    header_parameters: Vec<ActionInputParameter>,
    request_body: Option<ActionInputParameter>,
    body_type: Option<String>,
}

impl Affordance {
    /// Create an affordance without parameters.
    pub fn new(
        name: impl Into<String>,
        http_method: HttpMethod,
        target: impl Into<UriTemplate>,
    ) -> Self {
        Self {
            name: name.into(),
            http_method,
            target: target.into(),
            path_parameters: Vec::new(),
            query_parameters: Vec::new(),
            input_parameters: Vec::new(),
            header_parameters: Vec::new(),
            request_body: None,
            body_type: None,
        }
    }

    /// Add a query parameter.
    #[must_use]
    pub fn with_query_parameter(mut self, parameter: ActionInputParameter) -> Self {
        self.query_parameters.push(parameter);
        self
    }

    /// Add a body input parameter.
    #[must_use]
    pub fn with_input_parameter(mut self, parameter: ActionInputParameter) -> Self {
        self.input_parameters.push(parameter);
        self
    }

    /// Name, e.g. the handler name `updateEvent`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// HTTP method.
    pub fn http_method(&self) -> HttpMethod {
        self.http_method
    }

    /// Target URI template.
    pub fn target(&self) -> &UriTemplate {
        &self.target
    }

    /// Whether the target still has variables.
    pub fn is_templated(&self) -> bool {
        self.target.is_templated()
    }

    /// Target with unbound optional variables removed.
    pub fn components(&self) -> UriComponents {
        UriComponents::from_template(&self.target)
    }

    /// Path variables.
    pub fn path_parameters(&self) -> &[ActionInputParameter] {
        &self.path_parameters
    }

    /// Query parameters.
    pub fn query_parameters(&self) -> &[ActionInputParameter] {
        &self.query_parameters
    }

    /// Body properties.
    pub fn input_parameters(&self) -> &[ActionInputParameter] {
        &self.input_parameters
    }

    /// Header parameters.
    pub fn header_parameters(&self) -> &[ActionInputParameter] {
        &self.header_parameters
    }

    /// The whole request body, if the method carries one.
    pub fn request_body(&self) -> Option<&ActionInputParameter> {
        self.request_body.as_ref()
    }

    /// Name of the request body type.
    pub fn body_type(&self) -> Option<&str> {
        self.body_type.as_deref()
    }

    /// Query parameters followed by body properties.
    pub fn parameters(&self) -> impl Iterator<Item = &ActionInputParameter> {
        self.query_parameters.iter().chain(self.input_parameters.iter())
    }

    /// Names of the query parameters.
    pub fn request_param_names(&self) -> Vec<&str> {
        self.query_parameters.iter().map(ActionInputParameter::name).collect()
    }
}

/// Builds affordances from handler descriptors and bound arguments.
#[derive(Debug, Clone, Default)]
pub struct AffordanceAssembler {
    base_uri: Option<String>,
}

impl AffordanceAssembler {
    /// Assembler producing relative targets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix every target with a base URI, e.g. `http://localhost:8080`.
    #[must_use]
    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into().trim_end_matches('/').to_string());
        self
    }

    /// Produce one affordance per HTTP method of `handler`.
    ///
    /// Bound path variables are expanded into the target; unbound ones stay
    /// templated. Request parameters are appended as a `{?a,b}` expression and
    /// their bound values are carried on the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`AffordanceError::InvalidArgument`] if the handler declares no
    /// HTTP method, more than one request body, or a path variable missing from
    /// its template, and [`AffordanceError::InvalidTemplate`] if the template is
    /// malformed.
    pub fn assemble(&self, handler: &HandlerMethod, args: &Arguments) -> Result<Vec<Affordance>> {
        if handler.methods.is_empty() {
            return Err(AffordanceError::InvalidArgument(format!(
                "handler '{}' declares no HTTP method",
                handler.name
            )));
        }

        let bodies: Vec<(&MethodParameter, &BeanType)> = handler
            .parameters
            .iter()
            .filter_map(|p| match &p.kind {
                ParameterKind::RequestBody(bean) => Some((p, bean)),
                _ => None,
            })
            .collect();
        if bodies.len() > 1 {
            return Err(AffordanceError::InvalidArgument(format!(
                "handler '{}' declares {} request bodies",
                handler.name,
                bodies.len()
            )));
        }

        let target = self.target(handler, args)?;

        let path_parameters: Vec<_> = handler
            .parameters_of(|k| matches!(k, ParameterKind::PathVariable))
            .map(|p| p.to_input_parameter(ParamLocation::Path, args.get(&p.name)))
            .collect();
        let query_parameters: Vec<_> = handler
            .parameters_of(|k| matches!(k, ParameterKind::RequestParam))
            .map(|p| p.to_input_parameter(ParamLocation::Query, args.get(&p.name)))
            .collect();
        let header_parameters: Vec<_> = handler
            .parameters_of(|k| matches!(k, ParameterKind::Header))
            .map(|p| p.to_input_parameter(ParamLocation::Header, args.get(&p.name)))
            .collect();

        let affordances = handler
            .methods
            .iter()
            .map(|&method| {
                let (request_body, input_parameters, body_type) = match bodies.first() {
                    Some((param, bean)) if method.accepts_input() => {
                        let value = args.get(&param.name);
                        (
                            Some(param.to_input_parameter(ParamLocation::Body, value)),
                            body_parameters(bean, method, value, &handler.input_spec),
                            Some(bean.name().to_string()),
                        )
                    }
                    _ => (None, Vec::new(), None),
                };

                debug!(
                    handler = %handler.name,
                    %method,
                    target = %target,
                    query = query_parameters.len(),
                    inputs = input_parameters.len(),
                    "assembled affordance"
                );

                Affordance {
                    name: handler.name.clone(),
                    http_method: method,
                    target: target.clone(),
                    path_parameters: path_parameters.clone(),
                    query_parameters: query_parameters.clone(),
                    input_parameters,
                    header_parameters: header_parameters.clone(),
                    request_body,
                    body_type,
                }
            })
            .collect();

        Ok(affordances)
    }

    fn target(&self, handler: &HandlerMethod, args: &Arguments) -> Result<UriTemplate> {
        let raw = match &self.base_uri {
            Some(base) => format!("{base}{}", handler.uri_template),
            None => handler.uri_template.clone(),
        };
        let template = UriTemplate::parse(&raw)?;

        let mut bound = HashMap::new();
        for param in handler.parameters_of(|k| matches!(k, ParameterKind::PathVariable)) {
            let declared = template
                .variables()
                .iter()
                .any(|v| v.name() == param.name && v.kind() == VariableKind::PathVariable);
            if !declared {
                return Err(AffordanceError::InvalidArgument(format!(
                    "path variable '{}' is not part of '{}'",
                    param.name, raw
                )));
            }
            if let Some(value) = args.get(&param.name) {
                bound.insert(param.name.clone(), value_to_string(value));
            }
        }

        let optional: TemplateVariables = template
            .variables()
            .iter()
            .filter(|v| v.kind().is_optional())
            .cloned()
            .collect();
        let query: TemplateVariables = handler
            .parameters_of(|k| matches!(k, ParameterKind::RequestParam))
            .map(|p| {
                let variable = TemplateVariable::new(p.name.clone(), VariableKind::RequestParam);
                match &p.description {
                    Some(description) => variable.with_description(description.clone()),
                    None => variable,
                }
            })
            .collect();

        Ok(UriTemplate::new(template.expand_partial(&bound))
            .with_variables(&optional)
            .with_variables(&query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bean::PropertyDescriptor;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn review_handler() -> HandlerMethod {
        HandlerMethod::new("addReview", "/events/{eventId}/reviews")
            .method(HttpMethod::Post)
            .param(MethodParameter::path_variable("eventId"))
            .param(MethodParameter::request_body(
                "review",
                BeanType::new("Review")
                    .property(PropertyDescriptor::new("reviewBody", ValueType::String).required())
                    .property(PropertyDescriptor::new("rating", ValueType::Integer)),
            ))
    }

    #[test]
    fn test_bound_path_variable_is_expanded() {
        let affordances = AffordanceAssembler::new()
            .assemble(&review_handler(), &Arguments::new().bind("eventId", 1))
            .unwrap();
        assert_eq!(affordances.len(), 1);
        let a = &affordances[0];
        assert_eq!(a.target().as_str(), "/events/1/reviews");
        assert!(!a.is_templated());
        assert_eq!(a.body_type(), Some("Review"));
        let names: Vec<&str> = a.parameters().map(ActionInputParameter::name).collect();
        assert_eq!(names, vec!["reviewBody", "rating"]);
        assert!(a.request_body().is_some_and(ActionInputParameter::is_request_body));
    }

    #[test]
    fn test_unbound_path_variable_stays_templated() {
        let affordances = AffordanceAssembler::new()
            .assemble(&review_handler(), &Arguments::new())
            .unwrap();
        let target = affordances[0].target();
        assert_eq!(target.as_str(), "/events/{eventId}/reviews");
        assert!(target.is_base_uri_templated());
    }

    #[test]
    fn test_one_affordance_per_method() {
        let handler = HandlerMethod::new("event", "/events/{eventId}")
            .method(HttpMethod::Get)
            .method(HttpMethod::Put)
            .method(HttpMethod::Delete)
            .param(MethodParameter::path_variable("eventId"))
            .param(MethodParameter::request_body(
                "event",
                BeanType::new("Event").property(PropertyDescriptor::new("name", ValueType::String)),
            ));
        let affordances = AffordanceAssembler::new()
            .assemble(&handler, &Arguments::new().bind("eventId", "7"))
            .unwrap();
        let methods: Vec<HttpMethod> = affordances.iter().map(Affordance::http_method).collect();
        assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Put, HttpMethod::Delete]);
        assert!(affordances.iter().all(|a| a.target().as_str() == "/events/7"));
        assert_eq!(affordances[0].input_parameters().len(), 0);
        assert_eq!(affordances[1].input_parameters().len(), 1);
        assert_eq!(affordances[2].input_parameters().len(), 0);
    }

    #[test]
    fn test_request_params_become_query_template() {
        let handler = HandlerMethod::new("findEvents", "/events")
            .method(HttpMethod::Get)
            .param(MethodParameter::request_param("name", ValueType::String))
            .param(MethodParameter::request_param("minRating", ValueType::Integer));
        let affordances = AffordanceAssembler::new()
            .with_base_uri("http://localhost/")
            .assemble(&handler, &Arguments::new().bind("name", "Tour"))
            .unwrap();
        let a = &affordances[0];
        assert_eq!(a.target().as_str(), "http://localhost/events{?name,minRating}");
        assert_eq!(a.request_param_names(), vec!["name", "minRating"]);
        assert_eq!(a.query_parameters()[0].value_formatted(), "Tour");
        assert_eq!(a.query_parameters()[1].input_type(), InputType::Number);
        assert_eq!(a.components().to_uri_string(), "http://localhost/events");
    }

    #[test]
    fn test_template_query_variables_are_kept() {
        let handler = HandlerMethod::new("list", "/events{?sort}")
            .method(HttpMethod::Get)
            .param(MethodParameter::request_param("page", ValueType::Integer));
        let affordances = AffordanceAssembler::new()
            .assemble(&handler, &Arguments::new())
            .unwrap();
        assert_eq!(affordances[0].target().as_str(), "/events{?sort}{&page}");
    }

    #[test]
    fn test_rejects_handler_without_method() {
        let err = AffordanceAssembler::new()
            .assemble(&HandlerMethod::new("nothing", "/x"), &Arguments::new())
            .unwrap_err();
        assert!(matches!(err, AffordanceError::InvalidArgument(_)));
    }

    #[test]
    fn test_rejects_undeclared_path_variable() {
        let handler = HandlerMethod::new("event", "/events")
            .method(HttpMethod::Get)
            .param(MethodParameter::path_variable("eventId"));
        let err = AffordanceAssembler::new()
            .assemble(&handler, &Arguments::new())
            .unwrap_err();
        assert!(matches!(err, AffordanceError::InvalidArgument(_)));
    }

    #[test]
    fn test_null_argument_is_unbound() {
        let affordances = AffordanceAssembler::new()
            .assemble(&review_handler(), &Arguments::new().bind("eventId", json!(null)))
            .unwrap();
        assert!(affordances[0].is_templated());
    }
}
