use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::validation::ValidationErrors;

/// Where an unauthenticated caller is sent to obtain a token.
pub const SIGN_IN_PATH: &str = "/api/v1/auth/login";

pub type AppResult<T> = Result<T, AppError>;

/// Terminal outcomes of a request.
///
/// The first four are the expected, user-facing failures of the gram/comment
/// flow. `BadRequest` and `PayloadTooLarge` are transport failures of an
/// upload. `Conflict` and `InvalidCredentials` belong to the authentication
/// endpoints. `Internal` wraps infrastructure faults.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("you are not allowed to modify this {0}")]
    Forbidden(&'static str),
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("{0}")]
    BadRequest(String),
    #[error("upload too large")]
    PayloadTooLarge,
    #[error("{0}")]
    Conflict(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::Unauthenticated => (
                status,
                [
                    (header::WWW_AUTHENTICATE, "Bearer"),
                    (header::LOCATION, SIGN_IN_PATH),
                ],
                Json(json!({ "error": "authentication required", "sign_in": SIGN_IN_PATH })),
            )
                .into_response(),
            AppError::Validation(errors) => (
                status,
                Json(json!({ "error": "validation failed", "errors": errors })),
            )
                .into_response(),
            AppError::Internal(e) => {
                error!(error = ?e, "internal error");
                (status, Json(json!({ "error": "internal server error" }))).into_response()
            }
            other => (status, Json(json!({ "error": other.to_string() }))).into_response(),
        }
    }
}
