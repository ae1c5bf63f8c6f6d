//! Renderer configuration.
//!
//! Every field has a default, so an empty file or no file at all yields a
//! working configuration.
//!
//! ```toml
//! uber_version = "1.0"
//!
//! [xhtml]
//! method_param = "_method"
//! stylesheets = ["https://cdn.example.com/bootstrap.min.css"]
//! ```

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Markup settings of the XHTML writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XhtmlConfig {
    /// Name of the hidden field carrying the real HTTP method of forms that
    /// HTML cannot express natively.
    pub method_param: String,
    /// Stylesheets linked from pages started with `begin_html`.
    pub stylesheets: Vec<String>,
    /// Class of every `<form>`.
    pub form_class: String,
    /// Class of every input and select.
    pub form_control_class: String,
    /// Class of the `<div>` around each field.
    pub form_group_class: String,
    /// Class of every `<label>`.
    pub control_label_class: String,
}

impl Default for XhtmlConfig {
    fn default() -> Self {
        Self {
            method_param: "_method".to_string(),
            stylesheets: Vec::new(),
            form_class: "well".to_string(),
            form_control_class: "form-control".to_string(),
            form_group_class: "form-group".to_string(),
            control_label_class: "control-label".to_string(),
        }
    }
}

impl XhtmlConfig {
    /// Set the method override field name.
    #[must_use]
    pub fn with_method_param(mut self, name: impl Into<String>) -> Self {
        self.method_param = name.into();
        self
    }

    /// Add a stylesheet.
    #[must_use]
    pub fn with_stylesheet(mut self, href: impl Into<String>) -> Self {
        self.stylesheets.push(href.into());
        self
    }

    /// Set the form class.
    #[must_use]
    pub fn with_form_class(mut self, class: impl Into<String>) -> Self {
        self.form_class = class.into();
        self
    }
}

/// Settings of all renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// XHTML markup.
    pub xhtml: XhtmlConfig,
    /// `uber.version` of UBER documents.
    pub uber_version: String,
    /// `collection.version` of Collection+JSON documents.
    pub collection_json_version: String,
    /// Key of the first non-GET template of a HAL-FORMS document.
    pub hal_forms_default_template: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            xhtml: XhtmlConfig::default(),
            uber_version: "1.0".to_string(),
            collection_json_version: "1.0".to_string(),
            hal_forms_default_template: "default".to_string(),
        }
    }
}

/// Why a configuration could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No file at the given path.
    #[error("render configuration {0} does not exist")]
    FileNotFound(PathBuf),

    /// The extension names no known format.
    #[error("render configuration {path} has no .toml, .yaml, .yml or .json extension")]
    UnsupportedFormat {
        /// The rejected file.
        path: PathBuf,
    },

    /// The file or an environment override could not be read into
    /// [`RenderConfig`].
    #[error("cannot read render configuration: {0}")]
    ParseError(#[from] config::ConfigError),

    /// A setting was read but cannot produce valid documents.
    #[error("invalid render setting `{key}`: {reason}")]
    Invalid {
        /// Dotted key of the setting, e.g. `xhtml.method_param`.
        key: &'static str,
        /// What is wrong with its value.
        reason: &'static str,
    },
}

fn file_format(path: &Path) -> Result<FileFormat, ConfigError> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => Ok(FileFormat::Toml),
        Some("yaml" | "yml") => Ok(FileFormat::Yaml),
        Some("json") => Ok(FileFormat::Json),
        _ => Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

fn non_empty(key: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid {
            key,
            reason: "must not be empty",
        });
    }
    Ok(())
}

impl XhtmlConfig {
    /// Check that the settings produce well-formed forms.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the method override field name is
    /// empty or not a single HTML name token, or if a stylesheet href is
    /// empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_empty("xhtml.method_param", &self.method_param)?;
        if self
            .method_param
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>' | '&' | '='))
        {
            return Err(ConfigError::Invalid {
                key: "xhtml.method_param",
                reason: "must be a single HTML name token",
            });
        }
        if self.stylesheets.iter().any(|href| href.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                key: "xhtml.stylesheets",
                reason: "must not contain empty hrefs",
            });
        }
        Ok(())
    }
}

impl RenderConfig {
    /// Load settings from a TOML, YAML or JSON file, chosen by extension.
    ///
    /// Environment variables prefixed `HYPERFORM_` override the file, with
    /// `__` between nested keys: `HYPERFORM_XHTML__FORM_CLASS=card`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`], [`ConfigError::UnsupportedFormat`]
    /// or [`ConfigError::ParseError`] if the file cannot be read, and
    /// [`ConfigError::Invalid`] if the result fails [`validate`](Self::validate).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_file_with_prefix(path, "HYPERFORM")
    }

    /// Like [`from_file`](Self::from_file), reading overrides from
    /// `<env_prefix>_*` variables instead.
    ///
    /// # Errors
    ///
    /// See [`from_file`](Self::from_file).
    pub fn from_file_with_prefix(
        path: impl AsRef<Path>,
        env_prefix: &str,
    ) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let loaded: Self = Config::builder()
            .add_source(File::from(path).format(file_format(path)?))
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        loaded.validate()?;

        debug!(
            path = %path.display(),
            default_template = %loaded.hal_forms_default_template,
            stylesheets = loaded.xhtml.stylesheets.len(),
            "loaded render configuration"
        );
        Ok(loaded)
    }

    /// Check that every renderer can work with these settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty document version or
    /// HAL-FORMS default template key, and for invalid XHTML settings (see
    /// [`XhtmlConfig::validate`]).
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_empty("uber_version", &self.uber_version)?;
        non_empty("collection_json_version", &self.collection_json_version)?;
        non_empty("hal_forms_default_template", &self.hal_forms_default_template)?;
        self.xhtml.validate()
    }

    /// Replace the XHTML settings.
    #[must_use]
    pub fn with_xhtml(mut self, xhtml: XhtmlConfig) -> Self {
        self.xhtml = xhtml;
        self
    }

    /// Set the UBER version.
    #[must_use]
    pub fn with_uber_version(mut self, version: impl Into<String>) -> Self {
        self.uber_version = version.into();
        self
    }

    /// Set the Collection+JSON version.
    #[must_use]
    pub fn with_collection_json_version(mut self, version: impl Into<String>) -> Self {
        self.collection_json_version = version.into();
        self
    }
}
