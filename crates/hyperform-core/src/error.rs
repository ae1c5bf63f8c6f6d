//! Error types for affordance assembly and URI handling.

use thiserror::Error;

use crate::method::HttpMethod;

/// Result type for affordance operations.
pub type Result<T> = std::result::Result<T, AffordanceError>;

/// Errors raised while describing or resolving affordances.
///
/// All variants are contract violations: they are returned immediately and
/// never downgraded to partial output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AffordanceError {
    /// An argument did not satisfy the operation's contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The HTTP method has no meaning for the requested operation.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(HttpMethod),

    /// A string could not be parsed as an HTTP method.
    #[error("unknown HTTP method: {0}")]
    UnknownMethod(String),

    /// A whole request body was about to be rendered as one scalar field.
    #[error("cannot render request body parameter '{0}' as a single input field")]
    RequestBodyAsScalar(String),

    /// A URI template could not be parsed.
    #[error("invalid URI template '{template}': {reason}")]
    InvalidTemplate {
        /// The offending template.
        template: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A required template variable had no value during expansion.
    #[error("missing value for required template variable '{0}'")]
    MissingVariable(String),

    /// A string could not be parsed as a supported media type.
    #[error("unknown media type: {0}")]
    UnknownMediaType(String),
}

impl AffordanceError {
    pub(crate) fn invalid_template(template: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}
