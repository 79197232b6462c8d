//! Error types for form generation and lookup

use axum::http::StatusCode;
use thiserror::Error;

use super::form::SchemaErrors;

/// Errors raised while turning a prompt into a form
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Provider answered with a non-success status
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The model declined to produce a form
    #[error("Model refused the request: {0}")]
    Refused(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Output parsed but breaks the form invariants
    #[error("Generated form is invalid: {0}")]
    InvalidSchema(#[from] SchemaErrors),
}

impl GenerationError {
    /// Short label used for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Api { .. } => "api",
            Self::Network(_) => "network",
            Self::Authentication(_) => "authentication",
            Self::Refused(_) => "refused",
            Self::Parse(_) => "parse",
            Self::InvalidSchema(_) => "invalid_schema",
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenerationError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            GenerationError::Network(format!("Connection error: {}", err))
        } else {
            GenerationError::Network(err.to_string())
        }
    }
}

/// Errors surfaced by the form boundary operations
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Form not found: {0}")]
    NotFound(String),

    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("Form generation failed: {0}")]
    Generation(#[from] GenerationError),
}

impl FormError {
    /// Convert to HTTP status code for responses
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::EmptyPrompt => StatusCode::BAD_REQUEST,
            Self::Generation(GenerationError::Authentication(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Generation(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

pub type FormResult<T> = Result<T, FormError>;
