//! Handler error taxonomy and status mapping.

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::handler::context::ContextError;
use crate::handler::template::TemplateError;
use crate::render::RenderError;
use crate::routing::input::InputError;

/// Boxed error for failures raised by caller-supplied code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while handling a request.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Failure carrying an explicit status, passed through verbatim.
    #[error("{message}")]
    Status { code: StatusCode, message: String },

    /// No registered route matches the pathname.
    #[error("no route matches '{0}'")]
    NotFound(String),

    /// The encoded input could not be decoded.
    #[error("bad input: {0}")]
    BadInput(#[from] InputError),

    /// Partial-render requests must be GET or POST.
    #[error("unsupported method '{0}'")]
    UnsupportedMethod(Method),

    /// The handler was assembled inconsistently.
    #[error("invalid handler configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Render(RenderError),

    #[error("{0}")]
    Unexpected(#[source] BoxError),
}

/// Result type for handler operations.
pub type HandlerResult<T> = Result<T, HandlerError>;

impl HandlerError {
    /// An error with an explicit status code.
    pub fn status(code: StatusCode, message: impl Into<String>) -> Self {
        HandlerError::Status {
            code,
            message: message.into(),
        }
    }

    pub fn unexpected(err: impl Into<BoxError>) -> Self {
        HandlerError::Unexpected(err.into())
    }

    /// The explicit status carried by this error, if any.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            HandlerError::Status { code, .. } => Some(*code),
            HandlerError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            HandlerError::BadInput(_) => Some(StatusCode::BAD_REQUEST),
            _ => None,
        }
    }
}

impl From<RenderError> for HandlerError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Input(e) => HandlerError::BadInput(e),
            other => HandlerError::Render(other),
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = match &self {
            HandlerError::UnsupportedMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
            other => other.status_code().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        };
        status.into_response()
    }
}
