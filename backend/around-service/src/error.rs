/// HTTP-facing error type.
///
/// Every variant renders as a short fixed plain-text message; dependency
/// failures keep their cause for the log only.
use crate::services::pipeline::IngestError;
use crate::services::users::{AuthError, UserError};
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(&'static str),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    PayloadTooLarge(&'static str),

    #[error("{message}: {cause}")]
    Dependency {
        message: &'static str,
        cause: String,
    },
}

impl AppError {
    pub fn dependency(message: &'static str, cause: impl std::fmt::Display) -> Self {
        AppError::Dependency {
            message,
            cause: cause.to_string(),
        }
    }

    /// Text returned to the client.
    pub fn message(&self) -> &'static str {
        match self {
            AppError::BadRequest(message)
            | AppError::Unauthorized(message)
            | AppError::PayloadTooLarge(message)
            | AppError::Dependency { message, .. } => *message,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Dependency { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Dependency { message, cause } = self {
            error!(cause = %cause, "{}", message);
        }

        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.message())
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::MediaMissing => AppError::BadRequest("Image is not available"),
            IngestError::Storage(e) => {
                AppError::dependency("Failed to save image to object storage", e)
            }
            IngestError::Annotation(e) => AppError::dependency("Failed to annotate the image", e),
            IngestError::Index(e) => {
                AppError::dependency("Failed to save post to the search index", e)
            }
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::AlreadyExists => AppError::BadRequest("User already exists"),
            UserError::Password(e) => AppError::dependency("Failed to hash password", e),
            UserError::Storage(e) => AppError::dependency("Failed to save to the search index", e),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::Unauthorized("Wrong username or password"),
            AuthError::Storage(e) => {
                AppError::dependency("Failed to read from the search index", e)
            }
        }
    }
}
