//! Form fields: the widget chosen for one input parameter.

use hyperform_core::suggest::value_to_string;
use hyperform_core::{ActionInputParameter, AffordanceError, InputType, Result};

use super::documentation::DocumentationProvider;
use super::markup::{Attributes, Markup};
use crate::config::XhtmlConfig;

/// One `<option>` of a select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Display text.
    pub text: String,
    /// Submitted value.
    pub id: String,
    /// Whether the current value selects it.
    pub selected: bool,
}

/// How a parameter is presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    /// A hidden input per value, without label.
    Hidden {
        /// Values to submit.
        values: Vec<String>,
    },
    /// A select over the parameter's suggestions.
    Select {
        /// Options in suggestion order.
        options: Vec<SelectOption>,
        /// Whether several options may be selected.
        multiple: bool,
    },
    /// One input per value; a single input for scalar parameters.
    Inputs {
        /// HTML input type.
        input_type: InputType,
        /// Values, at least one.
        values: Vec<String>,
    },
}

/// A parameter ready to render: label, documentation link and widget.
///
/// Read-only fields render their widget disabled, followed by hidden inputs
/// carrying the current values, since disabled controls are not submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    name: String,
    documentation: Option<String>,
    widget: Widget,
    read_only: bool,
    required: bool,
    constraints: Vec<(&'static str, String)>,
}

impl FormField {
    /// Choose the widget for `param`.
    ///
    /// # Errors
    ///
    /// Returns [`AffordanceError::RequestBodyAsScalar`] if `param` stands for
    /// a whole request body.
    pub fn for_parameter(
        param: &ActionInputParameter,
        docs: &dyn DocumentationProvider,
    ) -> Result<Self> {
        if param.is_request_body() {
            return Err(AffordanceError::RequestBodyAsScalar(param.name().to_string()));
        }

        let current = param.values();
        let widget = if param.has_suggestions() {
            Widget::Select {
                options: param
                    .suggestions()
                    .iter()
                    .map(|s| SelectOption {
                        text: s.text().to_string(),
                        id: s.id().to_string(),
                        selected: current.iter().any(|v| s.matches(v)),
                    })
                    .collect(),
                multiple: param.is_collection(),
            }
        } else if param.input_type() == InputType::Hidden {
            Widget::Hidden {
                values: current.iter().copied().map(value_to_string).collect(),
            }
        } else if param.is_collection() {
            let mut values: Vec<String> = current.iter().copied().map(value_to_string).collect();
            if values.is_empty() {
                values.push(String::new());
            }
            Widget::Inputs {
                input_type: param.input_type(),
                values,
            }
        } else {
            Widget::Inputs {
                input_type: param.input_type(),
                values: vec![param.value_formatted()],
            }
        };

        Ok(Self {
            name: param.name().to_string(),
            documentation: docs.documentation_url(param, param.value()),
            widget,
            read_only: param.is_read_only(),
            required: param.is_required(),
            constraints: param.constraints().attributes(),
        })
    }

    /// A plain text field, used for template variables without parameter.
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documentation: None,
            widget: Widget::Inputs {
                input_type: InputType::Text,
                values: vec![String::new()],
            },
            read_only: false,
            required: false,
            constraints: Vec::new(),
        }
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Chosen widget.
    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    /// Whether the field is read-only.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Values a read-only field submits through hidden inputs.
    fn shadow_values(&self) -> Vec<&str> {
        match &self.widget {
            Widget::Hidden { .. } => Vec::new(),
            Widget::Select { options, .. } => options
                .iter()
                .filter(|o| o.selected)
                .map(|o| o.id.as_str())
                .collect(),
            Widget::Inputs { values, .. } => values.iter().map(String::as_str).collect(),
        }
    }

    /// Append the field's markup.
    pub fn render(&self, config: &XhtmlConfig, out: &mut Markup) {
        if let Widget::Hidden { values } = &self.widget {
            for value in values {
                hidden_input(out, &self.name, value);
            }
            return;
        }

        out.open("div", &Attributes::new().with("class", config.form_group_class.as_str()));
        self.render_label(config, out);
        match &self.widget {
            Widget::Select { options, multiple } => {
                out.open(
                    "select",
                    &Attributes::new()
                        .with("name", self.name.as_str())
                        .with("id", self.name.as_str())
                        .with_flag("multiple", *multiple)
                        .with("class", config.form_control_class.as_str())
                        .with_flag("disabled", self.read_only),
                );
                for option in options {
                    out.element(
                        "option",
                        &Attributes::new()
                            .with_flag("selected", option.selected)
                            .with("value", option.id.as_str()),
                        &option.text,
                    );
                }
                out.close("select");
            }
            Widget::Inputs { input_type, values } => {
                for (i, value) in values.iter().enumerate() {
                    out.empty(
                        "input",
                        &Attributes::new()
                            .with("name", self.name.as_str())
                            .with_opt("id", (i == 0).then_some(self.name.as_str()))
                            .with("type", input_type.as_str())
                            .with("class", config.form_control_class.as_str())
                            .with("value", value.as_str())
                            .extend(self.constraints.iter().cloned())
                            .with_flag("required", self.required && !self.read_only)
                            .with_flag("disabled", self.read_only),
                    );
                }
            }
            Widget::Hidden { .. } => {}
        }
        out.close("div");

        if self.read_only {
            for value in self.shadow_values() {
                hidden_input(out, &self.name, value);
            }
        }
    }

    fn render_label(&self, config: &XhtmlConfig, out: &mut Markup) {
        out.open(
            "label",
            &Attributes::new()
                .with("for", self.name.as_str())
                .with("class", config.control_label_class.as_str()),
        );
        match &self.documentation {
            Some(href) => {
                out.element(
                    "a",
                    &Attributes::new().with("href", href.as_str()).with("title", href.as_str()),
                    &self.name,
                );
            }
            None => {
                out.text(&self.name);
            }
        }
        out.close("label");
    }
}

fn hidden_input(out: &mut Markup, name: &str, value: &str) {
    out.empty(
        "input",
        &Attributes::new()
            .with("name", name)
            .with("type", "hidden")
            .with("value", value),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xhtml::documentation::{NoDocumentation, PrefixDocumentation};
    use hyperform_core::{ParamLocation, Suggestion};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(field: &FormField) -> String {
        let mut out = Markup::new();
        field.render(&XhtmlConfig::default(), &mut out);
        out.into_string()
    }

    fn param(name: &str) -> ActionInputParameter {
        ActionInputParameter::new(name, ParamLocation::BodyProperty)
    }

    #[test]
    fn test_single_input() {
        let field = FormField::for_parameter(&param("name").with_value("Tour"), &NoDocumentation).unwrap();
        assert_eq!(
            render(&field),
            concat!(
                r#"<div class="form-group"><label for="name" class="control-label">name</label>"#,
                r#"<input name="name" id="name" type="text" class="form-control" value="Tour"/></div>"#
            )
        );
    }

    #[test]
    fn test_select_marks_current_value() {
        let p = param("rating")
            .with_suggestions(vec![Suggestion::new("S1", "1", "1"), Suggestion::new("S2", "2", "2")])
            .with_value("2");
        let field = FormField::for_parameter(&p, &NoDocumentation).unwrap();
        let html = render(&field);
        assert_eq!(html.matches("selected=\"selected\"").count(), 1);
        assert!(html.contains(r#"<option selected="selected" value="2">S2</option>"#));
        assert!(html.contains(r#"<option value="1">S1</option>"#));
    }

    #[test]
    fn test_multi_select_for_collection() {
        let p = param("tags")
            .with_collection(true)
            .with_suggestions(Suggestion::wrap(["a", "b", "c"]))
            .with_value(json!(["a", "c"]));
        let field = FormField::for_parameter(&p, &NoDocumentation).unwrap();
        assert!(matches!(field.widget(), Widget::Select { multiple: true, .. }));
        let html = render(&field);
        assert!(html.contains(r#"multiple="multiple""#));
        assert_eq!(html.matches("selected=\"selected\"").count(), 2);
        assert!(html.ends_with("</select></div>"));
    }

    #[test]
    fn test_collection_without_values_has_one_empty_input() {
        let field =
            FormField::for_parameter(&param("tags").with_collection(true), &NoDocumentation).unwrap();
        assert_eq!(
            field.widget(),
            &Widget::Inputs {
                input_type: InputType::Text,
                values: vec![String::new()]
            }
        );
    }

    #[test]
    fn test_read_only_is_disabled_with_hidden_shadow() {
        let p = param("performer").with_value("Ann").with_read_only(true);
        let html = render(&FormField::for_parameter(&p, &NoDocumentation).unwrap());
        assert!(html.contains(r#"disabled="disabled""#));
        assert!(html.ends_with(r#"</div><input name="performer" type="hidden" value="Ann"/>"#));
    }

    #[test]
    fn test_read_only_multi_value_shadows_each_value() {
        let p = param("tags")
            .with_collection(true)
            .with_read_only(true)
            .with_value(json!(["a", "b"]));
        let html = render(&FormField::for_parameter(&p, &NoDocumentation).unwrap());
        assert_eq!(html.matches(r#"type="hidden""#).count(), 2);
    }

    #[test]
    fn test_hidden_with_suggestions_is_still_a_select() {
        let p = param("status")
            .with_input_type(InputType::Hidden)
            .with_suggestions(Suggestion::wrap(["A", "B"]))
            .with_value("B");
        let field = FormField::for_parameter(&p, &NoDocumentation).unwrap();
        assert!(matches!(field.widget(), Widget::Select { multiple: false, .. }));
        let html = render(&field);
        assert!(html.contains(r#"<select name="status" id="status" class="form-control">"#));
        assert!(html.contains(r#"<option selected="selected" value="B">B</option>"#));
        assert!(!html.contains(r#"type="hidden""#));
    }

    #[test]
    fn test_only_first_collection_input_carries_label_target() {
        let p = param("tags").with_collection(true).with_value(json!(["a", "b"]));
        let html = render(&FormField::for_parameter(&p, &NoDocumentation).unwrap());
        assert!(html.contains(r#"<label for="tags" class="control-label">tags</label>"#));
        assert_eq!(html.matches(r#"id="tags""#).count(), 1);
        assert!(html.contains(r#"<input name="tags" id="tags" type="text" class="form-control" value="a"/>"#));
        assert!(html.contains(r#"<input name="tags" type="text" class="form-control" value="b"/>"#));
    }

    #[test]
    fn test_hidden_has_no_label() {
        let p = param("id").with_input_type(InputType::Hidden).with_value(7);
        let html = render(&FormField::for_parameter(&p, &NoDocumentation).unwrap());
        assert_eq!(html, r#"<input name="id" type="hidden" value="7"/>"#);
    }

    #[test]
    fn test_constraints_and_documentation() {
        let p = param("rating")
            .with_input_type(InputType::Number)
            .with_required(true)
            .with_constraints(hyperform_core::InputConstraints::new().with_min(1).with_max(5));
        let field = FormField::for_parameter(&p, &PrefixDocumentation::new("http://schema.org/")).unwrap();
        let html = render(&field);
        assert!(html.contains(r#"<a href="http://schema.org/rating" title="http://schema.org/rating">rating</a>"#));
        assert!(html.contains(
            r#"<input name="rating" id="rating" type="number" class="form-control" value="" min="1" max="5" required="required"/>"#
        ));
    }

    #[test]
    fn test_request_body_is_rejected() {
        let body = ActionInputParameter::new("event", ParamLocation::Body);
        assert_eq!(
            FormField::for_parameter(&body, &NoDocumentation),
            Err(AffordanceError::RequestBodyAsScalar("event".to_string()))
        );
    }
}
