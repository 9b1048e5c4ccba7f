// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for the proxy routes

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

use crate::services::AzureMapsError;

/// Proxy error types
/// DOCUMENTATION: Each variant maps to an HTTP status code and error code
#[derive(Error, Debug)]
pub enum ServicesError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden access")]
    Forbidden,

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Not configured: {0}")]
    NotConfigured(String),
}

impl ServicesError {
    fn error_code(&self) -> &'static str {
        match self {
            ServicesError::InvalidInput(_) => "INVALID_INPUT",
            ServicesError::ValidationError(_) => "VALIDATION_ERROR",
            ServicesError::Unauthorized => "UNAUTHORIZED",
            ServicesError::Forbidden => "FORBIDDEN",
            ServicesError::ExternalApiError(_) => "EXTERNAL_API_ERROR",
            ServicesError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            ServicesError::NotConfigured(_) => "SERVICE_UNAVAILABLE",
        }
    }
}

impl From<AzureMapsError> for ServicesError {
    fn from(e: AzureMapsError) -> Self {
        match e {
            AzureMapsError::RateLimited => ServicesError::RateLimitExceeded,
            other => ServicesError::ExternalApiError(other.to_string()),
        }
    }
}

/// Convert ServicesError to HTTP response
/// DOCUMENTATION: JSON body `{"error": {code, message, timestamp}}`
impl ResponseError for ServicesError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ServicesError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServicesError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ServicesError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServicesError::Forbidden => StatusCode::FORBIDDEN,
            ServicesError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
            ServicesError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ServicesError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
