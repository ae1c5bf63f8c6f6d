//! XHTML5 forms (`application/xhtml+xml`).
//!
//! Rendering follows these rules, first match wins:
//!
//! 1. A GET affordance without parameters or template variables is an
//!    anchor.
//! 2. An affordance whose target has template variables no parameter
//!    describes renders nothing if path variables are unbound. Otherwise
//!    only GET affordances become forms, with one text input per such
//!    variable; other methods are skipped.
//! 3. Everything else is a `<form>`. Methods HTML cannot express are posted
//!    with a hidden method override field.
//!
//! Links without affordances are anchors, or GET forms when templated.

mod documentation;
mod field;
mod markup;
mod model;
mod writer;

pub use documentation::{DocumentationProvider, NoDocumentation, PrefixDocumentation};
pub use field::{FormField, SelectOption, Widget};
pub use markup::{Attributes, Markup, escape_html};
pub use model::XhtmlAffordanceModel;
pub use writer::XhtmlWriter;
