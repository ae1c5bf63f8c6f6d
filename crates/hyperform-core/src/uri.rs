//! URI templates and resolved URI components.
//!
//! Supports the subset of RFC 6570 that affordance targets use:
//!
//! | expression | kind                          | optional |
//! |------------|-------------------------------|----------|
//! | `{id}`     | [`VariableKind::PathVariable`] | no       |
//! | `{/id}`    | [`VariableKind::Segment`]      | yes      |
//! | `{?a,b}`   | [`VariableKind::RequestParam`] | yes      |
//! | `{&a,b}`   | [`VariableKind::RequestParamContinued`] | yes |
//! | `{#frag}`  | [`VariableKind::Fragment`]     | yes      |
//!
//! Optional variables without a value disappear on expansion. Path variables
//! without a value are an error for [`UriTemplate::expand`] and stay literal
//! for [`UriTemplate::expand_partial`].

use std::collections::HashMap;
use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::error::{AffordanceError, Result};

/// Characters left alone when encoding a variable value (RFC 3986 unreserved).
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, UNRESERVED).to_string()
}

/// The expression operator a template variable appears under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    /// `{name}`: a required path variable.
    PathVariable,
    /// `{/name}`: an optional path segment.
    Segment,
    /// `{?name}`: an optional query parameter starting the query string.
    RequestParam,
    /// `{&name}`: an optional query parameter continuing an existing query.
    RequestParamContinued,
    /// `{#name}`: an optional fragment.
    Fragment,
}

impl VariableKind {
    /// The RFC 6570 operator of this kind.
    pub fn operator(self) -> &'static str {
        match self {
            Self::PathVariable => "",
            Self::Segment => "/",
            Self::RequestParam => "?",
            Self::RequestParamContinued => "&",
            Self::Fragment => "#",
        }
    }

    fn from_operator(op: char) -> Option<Self> {
        match op {
            '/' => Some(Self::Segment),
            '?' => Some(Self::RequestParam),
            '&' => Some(Self::RequestParamContinued),
            '#' => Some(Self::Fragment),
            _ => None,
        }
    }

    /// Whether expansion may drop a variable of this kind.
    pub fn is_optional(self) -> bool {
        self != Self::PathVariable
    }

    /// Whether this kind contributes to the query string.
    pub fn is_query(self) -> bool {
        matches!(self, Self::RequestParam | Self::RequestParamContinued)
    }

    /// Whether variables of both kinds can share one expression.
    pub fn combines_with(self, other: Self) -> bool {
        self == other || (self.is_query() && other.is_query())
    }
}

/// A single variable of a URI template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateVariable {
    name: String,
    kind: VariableKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl TemplateVariable {
    /// Create a variable of the given kind.
    pub fn new(name: impl Into<String>, kind: VariableKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
        }
    }

    /// Attach a human readable description, used as form label.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variable kind.
    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    /// Optional description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether expansion fails when this variable is unbound.
    pub fn is_required(&self) -> bool {
        !self.kind.is_optional()
    }

    /// Same name and interchangeable kind. `{?a}` and `{&a}` are equivalent,
    /// `{?a}` and `{#a}` are not.
    pub fn is_equivalent(&self, other: &TemplateVariable) -> bool {
        self.name == other.name && self.kind.combines_with(other.kind)
    }
}

/// An ordered list of template variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVariables(Vec<TemplateVariable>);

impl TemplateVariables {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append variables, dropping any that are equivalent to one already present.
    #[must_use]
    pub fn concat(mut self, variables: impl IntoIterator<Item = TemplateVariable>) -> Self {
        for variable in variables {
            if !self.0.iter().any(|v| v.is_equivalent(&variable)) {
                self.0.push(variable);
            }
        }
        self
    }

    /// Iterate in order.
    pub fn iter(&self) -> std::slice::Iter<'_, TemplateVariable> {
        self.0.iter()
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no variables.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names in order.
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(TemplateVariable::name).collect()
    }

    /// Whether a variable with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|v| v.name == name)
    }

    /// Render as template expressions. When `appended` is set the URI
    /// already carries a query, so request parameters continue it with `&`.
    pub fn render(&self, appended: bool) -> String {
        let mut out = String::new();
        let mut previous: Option<VariableKind> = None;
        let mut query_started = appended;

        for variable in &self.0 {
            match previous {
                Some(kind) if kind.combines_with(variable.kind) => out.push(','),
                Some(_) => {
                    out.push_str("}{");
                    out.push_str(prefix(variable.kind, &mut query_started));
                }
                None => {
                    out.push('{');
                    out.push_str(prefix(variable.kind, &mut query_started));
                }
            }
            out.push_str(&variable.name);
            previous = Some(variable.kind);
        }

        if previous.is_some() {
            out.push('}');
        }
        out
    }
}

fn prefix(kind: VariableKind, query_started: &mut bool) -> &'static str {
    match kind {
        VariableKind::RequestParam if *query_started => "&",
        VariableKind::RequestParam | VariableKind::RequestParamContinued => {
            *query_started = true;
            kind.operator()
        }
        _ => kind.operator(),
    }
}

impl fmt::Display for TemplateVariables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

impl FromIterator<TemplateVariable> for TemplateVariables {
    fn from_iter<I: IntoIterator<Item = TemplateVariable>>(iter: I) -> Self {
        Self::new().concat(iter)
    }
}

impl<'a> IntoIterator for &'a TemplateVariables {
    type Item = &'a TemplateVariable;
    type IntoIter = std::slice::Iter<'a, TemplateVariable>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Expression {
        kind: VariableKind,
        names: Vec<String>,
    },
}

fn parse_expression(body: &str) -> Option<Part> {
    let mut chars = body.chars();
    let (kind, names) = match chars.next().and_then(VariableKind::from_operator) {
        Some(kind) => (kind, chars.as_str()),
        None => (VariableKind::PathVariable, body),
    };

    let names: Vec<String> = names.split(',').map(str::to_string).collect();
    let valid = names.iter().all(|name| {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    });
    valid.then_some(Part::Expression { kind, names })
}

fn push_literal(parts: &mut Vec<Part>, literal: &str) {
    if literal.is_empty() {
        return;
    }
    if let Some(Part::Literal(previous)) = parts.last_mut() {
        previous.push_str(literal);
    } else {
        parts.push(Part::Literal(literal.to_string()));
    }
}

fn scan(template: &str, strict: bool) -> Result<Vec<Part>> {
    let mut parts = Vec::new();
    let mut rest = template;

    loop {
        let Some(open) = rest.find('{') else {
            if strict && rest.contains('}') {
                return Err(AffordanceError::invalid_template(template, "unmatched '}'"));
            }
            push_literal(&mut parts, rest);
            break;
        };

        let literal = &rest[..open];
        if strict && literal.contains('}') {
            return Err(AffordanceError::invalid_template(template, "unmatched '}'"));
        }

        let Some(close) = rest[open..].find('}').map(|i| open + i) else {
            if strict {
                return Err(AffordanceError::invalid_template(
                    template,
                    "unclosed expression",
                ));
            }
            push_literal(&mut parts, rest);
            break;
        };

        let body = &rest[open + 1..close];
        match parse_expression(body) {
            Some(expression) => {
                push_literal(&mut parts, literal);
                parts.push(expression);
            }
            None if strict => {
                return Err(AffordanceError::invalid_template(
                    template,
                    format!("malformed expression '{{{body}}}'"),
                ));
            }
            None => push_literal(&mut parts, &rest[..=close]),
        }
        rest = &rest[close + 1..];
    }

    Ok(parts)
}

/// A parsed URI template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    template: String,
    parts: Vec<Part>,
    variables: TemplateVariables,
}

impl UriTemplate {
    /// Parse leniently: anything that is not a well-formed expression is kept
    /// as literal text.
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let parts =
            scan(&template, false).unwrap_or_else(|_| vec![Part::Literal(template.clone())]);
        Self::from_parts(template, parts)
    }

    /// Parse strictly, rejecting unbalanced braces and malformed expressions.
    ///
    /// # Errors
    ///
    /// Returns [`AffordanceError::InvalidTemplate`] if the template is malformed.
    pub fn parse(template: &str) -> Result<Self> {
        let parts = scan(template, true)?;
        Ok(Self::from_parts(template.to_string(), parts))
    }

    fn from_parts(template: String, parts: Vec<Part>) -> Self {
        let variables = parts
            .iter()
            .filter_map(|part| match part {
                Part::Expression { kind, names } => Some((kind, names)),
                Part::Literal(_) => None,
            })
            .flat_map(|(kind, names)| {
                names
                    .iter()
                    .map(move |n| TemplateVariable::new(n.clone(), *kind))
            })
            .collect();
        Self {
            template,
            parts,
            variables,
        }
    }

    /// The raw template string.
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// All variables in order of appearance.
    pub fn variables(&self) -> &TemplateVariables {
        &self.variables
    }

    /// Variable names in order of appearance.
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.names()
    }

    /// Whether the template has any variables.
    pub fn is_templated(&self) -> bool {
        !self.variables.is_empty()
    }

    /// Everything before the first optional expression, e.g. `/events/{id}`
    /// for `/events/{id}{?expand}`.
    pub fn base_uri(&self) -> String {
        let mut base = String::new();
        for part in &self.parts {
            match part {
                Part::Literal(text) => base.push_str(text),
                Part::Expression { kind, .. } if kind.is_optional() => break,
                Part::Expression { names, .. } => {
                    base.push('{');
                    base.push_str(&names.join(","));
                    base.push('}');
                }
            }
        }
        base
    }

    /// Whether the base URI still contains path variables. Such templates
    /// cannot be used as a form action even after dropping the query.
    pub fn is_base_uri_templated(&self) -> bool {
        self.parts
            .iter()
            .take_while(|part| !matches!(part, Part::Expression { kind, .. } if kind.is_optional()))
            .any(|part| matches!(part, Part::Expression { .. }))
    }

    /// Whether the expanded URI will carry a query string.
    fn has_query(&self) -> bool {
        self.parts.iter().any(|part| match part {
            Part::Literal(text) => text.contains('?'),
            Part::Expression { kind, .. } => kind.is_query(),
        })
    }

    /// Append variables not yet present, continuing an existing query with `&`.
    #[must_use]
    pub fn with_variables(&self, variables: &TemplateVariables) -> Self {
        let missing: TemplateVariables = variables
            .iter()
            .filter(|v| !self.variables.iter().any(|own| own.is_equivalent(v)))
            .cloned()
            .collect();
        if missing.is_empty() {
            return self.clone();
        }
        Self::new(format!("{}{}", self.template, missing.render(self.has_query())))
    }

    /// Expand with the given values; optional variables without a value are removed.
    ///
    /// # Errors
    ///
    /// Returns [`AffordanceError::MissingVariable`] if a path variable has no value.
    pub fn expand(&self, values: &HashMap<String, String>) -> Result<String> {
        self.expand_inner(values, false)
    }

    /// Expand like [`expand`](Self::expand) but keep unbound path variables as
    /// literal `{name}` expressions.
    pub fn expand_partial(&self, values: &HashMap<String, String>) -> String {
        self.expand_inner(values, true)
            .unwrap_or_else(|_| self.template.clone())
    }

    fn expand_inner(&self, values: &HashMap<String, String>, keep_unbound: bool) -> Result<String> {
        let mut out = String::with_capacity(self.template.len());

        for part in &self.parts {
            let (kind, names) = match part {
                Part::Literal(text) => {
                    out.push_str(text);
                    continue;
                }
                Part::Expression { kind, names } => (*kind, names),
            };

            match kind {
                VariableKind::PathVariable => {
                    let mut rendered = Vec::with_capacity(names.len());
                    for name in names {
                        match values.get(name) {
                            Some(value) => rendered.push(encode(value)),
                            None if keep_unbound => rendered.push(format!("{{{name}}}")),
                            None => return Err(AffordanceError::MissingVariable(name.clone())),
                        }
                    }
                    out.push_str(&rendered.join(","));
                }
                VariableKind::Segment => {
                    for value in names.iter().filter_map(|n| values.get(n)) {
                        out.push('/');
                        out.push_str(&encode(value));
                    }
                }
                VariableKind::RequestParam | VariableKind::RequestParamContinued => {
                    for name in names {
                        if let Some(value) = values.get(name) {
                            out.push(if out.contains('?') { '&' } else { '?' });
                            out.push_str(&encode(name));
                            out.push('=');
                            out.push_str(&encode(value));
                        }
                    }
                }
                VariableKind::Fragment => {
                    let bound: Vec<String> = names
                        .iter()
                        .filter_map(|n| values.get(n))
                        .map(|v| encode(v))
                        .collect();
                    if !bound.is_empty() {
                        out.push('#');
                        out.push_str(&bound.join(","));
                    }
                }
            }
        }

        Ok(out)
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

impl From<&str> for UriTemplate {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

/// A resolved URI split into origin, path, query and fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UriComponents {
    origin: Option<String>,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl UriComponents {
    /// Split a resolved URI. Relative references have no origin.
    pub fn parse(uri: &str) -> Self {
        let (rest, fragment) = match uri.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_string())),
            None => (uri, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, Some(query.to_string())),
            None => (rest, None),
        };
        let (origin, path) = match rest.find("://") {
            Some(scheme_end) => {
                let authority_start = scheme_end + 3;
                match rest[authority_start..].find('/') {
                    Some(i) => (
                        Some(rest[..authority_start + i].to_string()),
                        rest[authority_start + i..].to_string(),
                    ),
                    None => (Some(rest.to_string()), String::new()),
                }
            }
            None => (None, rest.to_string()),
        };
        Self {
            origin,
            path,
            query,
            fragment,
        }
    }

    /// Resolve a template by dropping unbound optional variables.
    pub fn from_template(template: &UriTemplate) -> Self {
        Self::parse(&template.expand_partial(&HashMap::new()))
    }

    /// Scheme and authority, e.g. `http://localhost:8080`.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Path component.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Fragment, without the leading `#`.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Append an encoded query parameter.
    #[must_use]
    pub fn with_query_param(mut self, name: &str, value: &str) -> Self {
        let pair = format!("{}={}", encode(name), encode(value));
        self.query = Some(match self.query.take() {
            Some(query) if !query.is_empty() => format!("{query}&{pair}"),
            _ => pair,
        });
        self
    }

    /// Reassemble into a URI string.
    pub fn to_uri_string(&self) -> String {
        let mut uri = String::new();
        if let Some(origin) = &self.origin {
            uri.push_str(origin);
        }
        uri.push_str(&self.path);
        if let Some(query) = &self.query {
            uri.push('?');
            uri.push_str(query);
        }
        if let Some(fragment) = &self.fragment {
            uri.push('#');
            uri.push_str(fragment);
        }
        uri
    }
}

impl fmt::Display for UriComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uri_string())
    }
}
