//! Error types for stubgen

use crate::signature::ParameterListError;
use crate::value::TypeDescriptor;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// stubgen errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid specification: {0}")]
    InvalidSpecification(String),

    #[error("Invalid parameter list: {0}")]
    InvalidParameterList(#[from] ParameterListError),

    #[error("Unsupported generation type: {0}")]
    UnsupportedGenerationType(TypeDescriptor),

    #[error("Undefined method `{name}` for {receiver}")]
    UndefinedMethod { name: String, receiver: String },

    #[error("Private method `{name}` called for {receiver}")]
    PrivateMethodCalled { name: String, receiver: String },

    #[error("Wrong arguments for `{name}({signature})`: {reason}")]
    ArgumentMismatch {
        name: String,
        signature: String,
        reason: String,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_spec(message: impl Into<String>) -> Self {
        Error::InvalidSpecification(message.into())
    }
}
