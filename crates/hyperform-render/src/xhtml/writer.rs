//! Streaming XHTML output: pages, plain links and affordance forms.

use std::fmt;
use std::io::Write;

use hyperform_core::suggest::value_to_string;
use hyperform_core::{Affordance, Link, Resource, Resources};
use serde_json::Value;
use tracing::{trace, warn};

use super::documentation::{DocumentationProvider, NoDocumentation};
use super::field::FormField;
use super::markup::{Attributes, Markup};
use super::model::XhtmlAffordanceModel;
use crate::config::XhtmlConfig;
use crate::error::Result;
use crate::model::AffordanceModel;

/// Writes links and their affordances as XHTML5 anchors and forms.
///
/// Every `write_*` call renders into a buffer first and hands the sink
/// complete output only; a failing parameter leaves the sink untouched.
pub struct XhtmlWriter<W: Write> {
    sink: W,
    config: XhtmlConfig,
    docs: Box<dyn DocumentationProvider>,
}

impl<W: Write> XhtmlWriter<W> {
    /// Writer with default markup settings and no documentation links.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            config: XhtmlConfig::default(),
            docs: Box::new(NoDocumentation),
        }
    }

    /// Use other markup settings.
    #[must_use]
    pub fn with_config(mut self, config: XhtmlConfig) -> Self {
        self.config = config;
        self
    }

    /// Link field labels to documentation.
    #[must_use]
    pub fn with_documentation(mut self, docs: impl DocumentationProvider + 'static) -> Self {
        self.docs = Box::new(docs);
        self
    }

    /// Start a page: doctype, head with title and stylesheets, and the
    /// opening container elements.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Io`](crate::RenderError::Io) if the sink fails.
    pub fn begin_html(&mut self, title: &str) -> Result<()> {
        let mut out = Markup::new();
        out.raw("<!DOCTYPE html>")
            .open("html", &Attributes::new().with("xmlns", "http://www.w3.org/1999/xhtml"))
            .open("head", &Attributes::new())
            .empty("meta", &Attributes::new().with("charset", "utf-8"))
            .element("title", &Attributes::new(), title);
        for href in &self.config.stylesheets {
            out.empty(
                "link",
                &Attributes::new().with("rel", "stylesheet").with("href", href.as_str()),
            );
        }
        out.close("head")
            .open("body", &Attributes::new())
            .open("div", &Attributes::new().with("class", "container"))
            .open("div", &Attributes::new().with("class", "row"));
        self.flush(out)
    }

    /// Close what [`begin_html`](Self::begin_html) opened.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Io`](crate::RenderError::Io) if the sink fails.
    pub fn end_html(&mut self) -> Result<()> {
        let mut out = Markup::new();
        out.close("div").close("div").close("body").close("html");
        self.flush(out)
    }

    /// Write every link: anchors for plain links and GETs without
    /// parameters, forms for everything else.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Affordance`](crate::RenderError::Affordance) if
    /// a parameter cannot be rendered, [`RenderError::Io`](crate::RenderError::Io)
    /// if the sink fails.
    pub fn write_links(&mut self, links: &[Link]) -> Result<()> {
        let mut out = Markup::new();
        self.render_links(links, &mut out)?;
        self.flush(out)
    }

    /// Write a resource: its content as a definition list, then its links.
    ///
    /// # Errors
    ///
    /// See [`write_links`](Self::write_links).
    pub fn write_resource(&mut self, resource: &Resource) -> Result<()> {
        let mut out = Markup::new();
        self.render_resource(resource, &mut out)?;
        self.flush(out)
    }

    /// Write a collection: its links, then one list item per resource.
    ///
    /// # Errors
    ///
    /// See [`write_links`](Self::write_links).
    pub fn write_resources(&mut self, resources: &Resources) -> Result<()> {
        let mut out = Markup::new();
        self.render_links(resources.links(), &mut out)?;
        out.open("ul", &Attributes::new());
        for item in resources.items() {
            out.open("li", &Attributes::new());
            self.render_resource(item, &mut out)?;
            out.close("li");
        }
        out.close("ul");
        self.flush(out)
    }

    /// The sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn flush(&mut self, out: Markup) -> Result<()> {
        self.sink.write_all(out.as_str().as_bytes())?;
        Ok(())
    }

    fn render_resource(&self, resource: &Resource, out: &mut Markup) -> Result<()> {
        write_value(resource.content(), out);
        self.render_links(resource.links(), out)
    }

    fn render_links(&self, links: &[Link], out: &mut Markup) -> Result<()> {
        for link in links {
            if link.affordances().is_empty() {
                self.render_plain_link(link, out);
            } else {
                for affordance in link.affordances() {
                    self.render_affordance(link, affordance, out)?;
                }
            }
        }
        Ok(())
    }

    fn render_plain_link(&self, link: &Link, out: &mut Markup) {
        if !link.is_templated() {
            anchor(out, link.href(), link.rel(), link.title());
            return;
        }
        if link.is_base_uri_templated() {
            trace!(href = link.href(), "link with unbound path variables not rendered");
            return;
        }

        self.open_form(out, link.rel(), &link.expand(), "GET");
        for variable in link.variables().iter() {
            FormField::text(variable.name()).render(&self.config, out);
        }
        submit(out, "Get");
        out.close("form");
    }

    fn render_affordance(
        &self,
        link: &Link,
        affordance: &Affordance,
        out: &mut Markup,
    ) -> Result<()> {
        let model = XhtmlAffordanceModel::new(affordance, &affordance.components());

        if model.is_anchor() {
            out.open("div", &Attributes::new());
            anchor(out, model.uri(), link.rel(), None);
            out.close("div");
            return Ok(());
        }

        let uncovered = model.uncovered_variables();
        if !uncovered.is_empty() {
            if model.is_base_uri_templated() {
                trace!(
                    affordance = model.name(),
                    "affordance with unbound path variables not rendered"
                );
                return Ok(());
            }
            if !model.is_get() {
                warn!(
                    affordance = model.name(),
                    method = %model.http_method(),
                    "templated non-GET affordance cannot be rendered as a form"
                );
                return Ok(());
            }
        }

        // Fields are resolved before any markup so a failing parameter
        // leaves no half-written form behind.
        let mut fields = model
            .parameters()
            .map(|p| FormField::for_parameter(p, self.docs.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        fields.extend(uncovered.iter().map(|v| FormField::text(v.name())));

        self.open_form(out, model.name(), model.uri(), model.form_method().as_str());
        if let Some(method) = model.method_override() {
            out.empty(
                "input",
                &Attributes::new()
                    .with("name", self.config.method_param.as_str())
                    .with("type", "hidden")
                    .with("class", self.config.form_control_class.as_str())
                    .with("value", method.as_str()),
            );
        }
        for field in &fields {
            field.render(&self.config, out);
        }
        submit(out, &model.http_method().capitalized());
        out.close("form");
        Ok(())
    }

    fn open_form(&self, out: &mut Markup, name: &str, action: &str, method: &str) {
        out.open(
            "form",
            &Attributes::new()
                .with("class", self.config.form_class.as_str())
                .with("action", action)
                .with("method", method)
                .with("name", name),
        )
        .element("h4", &Attributes::new(), name);
    }
}

impl<W: Write> fmt::Debug for XhtmlWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XhtmlWriter")
            .field("config", &self.config)
            .field("docs", &self.docs)
            .finish_non_exhaustive()
    }
}

fn anchor(out: &mut Markup, href: &str, rel: &str, title: Option<&str>) {
    out.element(
        "a",
        &Attributes::new().with("href", href).with("rel", rel),
        title.unwrap_or(rel),
    );
}

fn submit(out: &mut Markup, caption: &str) {
    out.empty("input", &Attributes::new().with("type", "submit").with("value", caption));
}

fn write_value(value: &Value, out: &mut Markup) {
    match value {
        Value::Object(fields) => {
            out.open("dl", &Attributes::new());
            for (name, value) in fields {
                out.element("dt", &Attributes::new(), name);
                out.open("dd", &Attributes::new());
                write_value(value, out);
                out.close("dd");
            }
            out.close("dl");
        }
        Value::Array(items) => {
            out.open("ul", &Attributes::new());
            for item in items {
                out.open("li", &Attributes::new());
                write_value(item, out);
                out.close("li");
            }
            out.close("ul");
        }
        Value::Null => {}
        scalar => {
            out.text(&value_to_string(scalar));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RenderError;
    use hyperform_core::{ActionInputParameter, HttpMethod, ParamLocation, SELF_REL};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(links: &[Link]) -> String {
        let mut writer = XhtmlWriter::new(Vec::new());
        writer.write_links(links).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_get_without_parameters_is_anchor() {
        let link = Link::new("/events/1", SELF_REL)
            .with_affordance(Affordance::new("findEvent", HttpMethod::Get, "/events/1"));
        let html = render(&[link]);
        assert_eq!(html, r#"<div><a href="/events/1" rel="self">self</a></div>"#);
        assert_eq!(html.matches("<form").count(), 0);
    }

    #[test]
    fn test_put_form_with_method_override() {
        let link = Link::new("/events/1", SELF_REL).with_affordance(
            Affordance::new("updateEvent", HttpMethod::Put, "/events/1").with_input_parameter(
                ActionInputParameter::new("name", ParamLocation::BodyProperty).with_value("Tour"),
            ),
        );
        assert_eq!(
            render(&[link]),
            concat!(
                r#"<form class="well" action="/events/1" method="POST" name="updateEvent">"#,
                r#"<h4>updateEvent</h4>"#,
                r#"<input name="_method" type="hidden" class="form-control" value="PUT"/>"#,
                r#"<div class="form-group"><label for="name" class="control-label">name</label>"#,
                r#"<input name="name" id="name" type="text" class="form-control" value="Tour"/></div>"#,
                r#"<input type="submit" value="Put"/>"#,
                r#"</form>"#
            )
        );
    }

    #[test]
    fn test_get_form_for_query_parameters() {
        let link = Link::new("/events{?name}", "search").with_affordance(
            Affordance::new("findEvents", HttpMethod::Get, "/events{?name}")
                .with_query_parameter(ActionInputParameter::new("name", ParamLocation::Query)),
        );
        let html = render(&[link]);
        assert!(html.starts_with(r#"<form class="well" action="/events" method="GET" name="findEvents">"#));
        assert!(!html.contains("_method"));
        assert!(html.ends_with(r#"<input type="submit" value="Get"/></form>"#));
    }

    #[test]
    fn test_templated_affordance_rules() {
        let link = Link::new("/events{?sort}", "list")
            .with_affordance(Affordance::new("list", HttpMethod::Get, "/events{?sort}"))
            .with_affordance(Affordance::new("bulkDelete", HttpMethod::Delete, "/events{?sort}"));
        let html = render(&[link]);
        assert_eq!(html.matches("<form").count(), 1);
        assert!(html.contains(r#"<input name="sort" id="sort" type="text" class="form-control" value=""/>"#));

        let unbound = Link::new("/events/{id}", "event")
            .with_affordance(Affordance::new("findEvent", HttpMethod::Get, "/events/{id}"));
        assert_eq!(render(&[unbound]), "");
    }

    #[test]
    fn test_templated_plain_link_becomes_closed_form() {
        let html = render(&[Link::new("/events{?name,city}", "search")]);
        assert!(html.starts_with(r#"<form class="well" action="/events" method="GET" name="search">"#));
        assert_eq!(html.matches(r#"class="form-group""#).count(), 2);
        assert!(html.ends_with(r#"<input type="submit" value="Get"/></form>"#));
        assert_eq!(render(&[Link::new("/events", "events")]), r#"<a href="/events" rel="events">events</a>"#);
    }

    #[test]
    fn test_failed_render_leaves_sink_untouched() {
        let body = ActionInputParameter::new("event", ParamLocation::Body);
        let links = [
            Link::new("/a", "a"),
            Link::new("/events", "create")
                .with_affordance(Affordance::new("createEvent", HttpMethod::Post, "/events").with_input_parameter(body)),
        ];
        let mut writer = XhtmlWriter::new(Vec::new());
        let err = writer.write_links(&links).unwrap_err();
        assert!(matches!(err, RenderError::Affordance(_)));
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn test_page_with_resource() {
        let config = XhtmlConfig::default().with_stylesheet("/bootstrap.css");
        let mut writer = XhtmlWriter::new(Vec::new()).with_config(config);
        writer.begin_html("Event").unwrap();
        writer
            .write_resource(&Resource::new("Event", json!({"name": "Tour", "tags": ["a"]})))
            .unwrap();
        writer.end_html().unwrap();
        let html = String::from_utf8(writer.into_inner()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html><html xmlns=\"http://www.w3.org/1999/xhtml\">"));
        assert!(html.contains(r#"<title>Event</title><link rel="stylesheet" href="/bootstrap.css"/></head>"#));
        assert!(html.contains("<dl><dt>name</dt><dd>Tour</dd><dt>tags</dt><dd><ul><li>a</li></ul></dd></dl>"));
        assert!(html.ends_with("</div></div></body></html>"));
    }
}
