//! Unified error types for the Leadflow API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic errors (validation, configuration, state conflicts)
//! - `ExternalServiceError`: Failures of any external collaborator (CRM, completion API, social APIs)
//! - `AppError`: Application layer errors (wraps both for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown industry, template or intent tier
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// External collaborator a request was sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Crm,
    Completion,
    Social,
    ProspectSource,
    Notifier,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Service::Crm => write!(f, "CRM"),
            Service::Completion => write!(f, "completion API"),
            Service::Social => write!(f, "social API"),
            Service::ProspectSource => write!(f, "prospect source"),
            Service::Notifier => write!(f, "notifier"),
        }
    }
}

/// Errors raised by external collaborators
///
/// Every external call is at-most-once: nothing in this crate retries on these.
#[derive(Debug, Error)]
pub enum ExternalServiceError {
    #[error("{service} request failed: {source}")]
    Request {
        service: Service,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} API error: {status} - {message}")]
    Api {
        service: Service,
        status: u16,
        message: String,
    },

    #[error("{service} rate limited")]
    RateLimited { service: Service },

    #[error("{service} unauthorized - invalid credentials")]
    Unauthorized { service: Service },

    #[error("{service} deserialization error: {message}")]
    Deserialization { service: Service, message: String },
}

impl ExternalServiceError {
    pub fn service(&self) -> Service {
        match self {
            ExternalServiceError::Request { service, .. }
            | ExternalServiceError::Api { service, .. }
            | ExternalServiceError::RateLimited { service }
            | ExternalServiceError::Unauthorized { service }
            | ExternalServiceError::Deserialization { service, .. } => *service,
        }
    }
}

/// Application layer errors - used by services and HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("External service error: {0}")]
    External(#[from] ExternalServiceError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Domain(DomainError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "Not found", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Validation(msg)) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::Configuration(msg)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Configuration error",
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "Conflict", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Domain(DomainError::Internal(msg)) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::External(e) => {
                tracing::error!(service = %e.service(), "External service error: {}", e);
                match e {
                    ExternalServiceError::RateLimited { .. } => {
                        (StatusCode::TOO_MANY_REQUESTS, "Rate limited", None)
                    }
                    ExternalServiceError::Api { message, .. } => (
                        StatusCode::BAD_GATEWAY,
                        "External service error",
                        Some(message.clone()),
                    ),
                    _ => (StatusCode::BAD_GATEWAY, "External service error", None),
                }
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone()))
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized", None),
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}
