//! Unified error types for the newsroom pipeline
//!
//! This module defines error types for each layer:
//! - `FetchError`: feed and search acquisition errors (skippable per source)
//! - `MediaError`: image download and spool errors (never fatal to a run)
//! - `DeliveryError`: MIME assembly and SMTP errors (fatal to a run)
//! - `PipelineError`: terminal outcome of one newsletter run
//! - `AppError`: application layer errors (wraps validation for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Content acquisition errors from feeds or the search API
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed could not be parsed: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),

    #[error("Rate limited")]
    RateLimited,

    #[error("Unauthorized - invalid API key")]
    Unauthorized,

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Image download and spool errors
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Image request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image URL returned status {0}")]
    Status(u16),

    #[error("Payload is not a recognized image format")]
    UnrecognizedFormat,

    #[error("Invalid image URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Image spool I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Email assembly and SMTP hand-off errors
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Could not assemble MIME message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("Invalid inline image content type: {0}")]
    ContentType(String),

    #[error("SMTP delivery failed: {0}")]
    Smtp(String),

    #[error("Could not read spooled image: {0}")]
    Spool(#[from] std::io::Error),
}

impl From<lettre::transport::smtp::Error> for DeliveryError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        DeliveryError::Smtp(err.to_string())
    }
}

/// Terminal outcome of one newsletter run
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Every configured source failed or yielded nothing.
    #[error("No content available from any configured source")]
    NoContentAvailable,

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable {0} must be set")]
    MissingVar(&'static str),
}

/// Application layer errors returned to HTTP clients
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Standard error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(message))
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
