//! Minimal markup buffer with escaping.

/// Escapes HTML special characters in a string.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Ordered attributes of an element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(&'static str, String)>);

impl Attributes {
    /// No attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute.
    #[must_use]
    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.0.push((name, value.into()));
        self
    }

    /// Append an attribute if a value is present.
    #[must_use]
    pub fn with_opt(self, name: &'static str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    /// Append a boolean attribute in XHTML form, `disabled="disabled"`.
    #[must_use]
    pub fn with_flag(self, name: &'static str, set: bool) -> Self {
        if set { self.with(name, name) } else { self }
    }

    /// Append several attributes.
    #[must_use]
    pub fn extend(mut self, attrs: impl IntoIterator<Item = (&'static str, String)>) -> Self {
        self.0.extend(attrs);
        self
    }

    fn write_to(&self, out: &mut String) {
        for (name, value) in &self.0 {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_html(value));
            out.push('"');
        }
    }
}

/// Markup under construction.
#[derive(Debug, Clone, Default)]
pub struct Markup(String);

impl Markup {
    /// Empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// `<tag attrs>`
    pub fn open(&mut self, tag: &str, attrs: &Attributes) -> &mut Self {
        self.0.push('<');
        self.0.push_str(tag);
        attrs.write_to(&mut self.0);
        self.0.push('>');
        self
    }

    /// `<tag attrs/>`
    pub fn empty(&mut self, tag: &str, attrs: &Attributes) -> &mut Self {
        self.0.push('<');
        self.0.push_str(tag);
        attrs.write_to(&mut self.0);
        self.0.push_str("/>");
        self
    }

    /// `</tag>`
    pub fn close(&mut self, tag: &str) -> &mut Self {
        self.0.push_str("</");
        self.0.push_str(tag);
        self.0.push('>');
        self
    }

    /// Escaped text.
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.0.push_str(&escape_html(text));
        self
    }

    /// `<tag attrs>text</tag>`
    pub fn element(&mut self, tag: &str, attrs: &Attributes, text: &str) -> &mut Self {
        self.open(tag, attrs).text(text).close(tag)
    }

    /// Verbatim markup.
    pub fn raw(&mut self, markup: &str) -> &mut Self {
        self.0.push_str(markup);
        self
    }

    /// Buffered markup.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the buffered markup.
    pub fn into_string(self) -> String {
        self.0
    }
}
