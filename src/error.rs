use std::fmt::Display;

use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use log::{error, warn};
use serde_json::json;
use thiserror::Error;

use crate::db::store::StoreError;
use crate::models::plan_request::RequestError;
use crate::services::account_service::AccountError;
use crate::services::itinerary_generation_service::PlanGenerationError;

const GENERATION_FAILED: &str = "Failed to generate travel plan";

/// Errors returned to HTTP callers. Upstream and storage failures only carry a
/// generic message; their detail is logged where they are converted.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Persistence(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn persistence(message: &str, err: impl Display) -> Self {
        error!("{}: {}", message, err);
        Self::Persistence(message.to_string())
    }

    pub fn internal(message: &str, err: impl Display) -> Self {
        error!("{}: {}", message, err);
        Self::Internal(message.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) | ApiError::Persistence(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::persistence("Internal server error", err)
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<PlanGenerationError> for ApiError {
    fn from(err: PlanGenerationError) -> Self {
        error!("Travel plan generation error: {}", err);
        ApiError::Upstream(GENERATION_FAILED.to_string())
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::MissingCredentials
            | AccountError::InvalidEmail
            | AccountError::AlreadyExists => {
                ApiError::Validation(err.to_string())
            }
            AccountError::InvalidCredentials => ApiError::Unauthorized,
            AccountError::Hash(_) | AccountError::Token(_) => {
                ApiError::internal("Account operation failed", err)
            }
            AccountError::Store(err) => ApiError::persistence("Account operation failed", err),
        }
    }
}

/// Maps body extraction failures (bad JSON, wrong content type) onto the
/// same 400 shape as field validation.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected request body for {}: {}", req.path(), err);
    ApiError::Validation("Invalid request body".to_string()).into()
}
