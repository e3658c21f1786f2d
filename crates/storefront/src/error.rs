//! Route error type and Sentry reporting.
//!
//! Fallible handlers return [`Result`]. Converting an [`AppError`] into a
//! response picks the client-facing status and message, and ships anything
//! classified as a server fault to Sentry first.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::commerce::CommerceError;
use crate::services::klaviyo::KlaviyoError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Commerce API operation failed.
    #[error("Commerce error: {0}")]
    Commerce(#[from] CommerceError),

    /// Klaviyo API operation failed.
    #[error("Klaviyo error: {0}")]
    Klaviyo(#[from] KlaviyoError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the error is a server fault worth capturing to Sentry.
    ///
    /// Expected client outcomes (missing resources, validation failures,
    /// throttling) are excluded so the project does not drown in noise.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Klaviyo(_) | Self::Internal(_) => true,
            Self::Commerce(inner) => !matches!(
                inner,
                CommerceError::NotFound(_)
                    | CommerceError::RateLimited { .. }
                    | CommerceError::UserError(_)
            ),
            Self::NotFound(_) | Self::BadRequest(_) | Self::RateLimited => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Upstream failures collapse to a generic message; only user-caused
        // commerce errors carry their text through to the client.
        let (status, message) = match self {
            Self::Commerce(CommerceError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Not found".to_string())
            }
            Self::Commerce(CommerceError::RateLimited { .. }) => {
                (StatusCode::TOO_MANY_REQUESTS, "Rate limited".to_string())
            }
            Self::Commerce(CommerceError::UserError(msg)) => (StatusCode::BAD_REQUEST, msg),
            Self::Commerce(_) | Self::Klaviyo(_) => {
                (StatusCode::BAD_GATEWAY, "External service error".to_string())
            }
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            err @ Self::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
            err @ Self::BadRequest(_) => (StatusCode::BAD_REQUEST, err.to_string()),
            err @ Self::RateLimited => (StatusCode::TOO_MANY_REQUESTS, err.to_string()),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Record a user action on the Sentry breadcrumb trail.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item to cart", &[("variant_id", "var_19")]);
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        data: data
            .iter()
            .map(|(key, value)| ((*key).to_string(), serde_json::Value::from(*value)))
            .collect(),
        ..Default::default()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context() {
        assert_eq!(
            AppError::NotFound("post-zero-proof-basics".to_string()).to_string(),
            "Not found: post-zero-proof-basics"
        );
        assert_eq!(
            AppError::BadRequest("invalid input".to_string()).to_string(),
            "Bad request: invalid input"
        );
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                AppError::NotFound("gone".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::BadRequest("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (
                AppError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Commerce(CommerceError::NotFound("col_2210".to_string())),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::Commerce(CommerceError::UserError(
                    "Quantity must be at least 1".to_string(),
                )),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_sentry_capture_classification() {
        let client_side = AppError::Commerce(CommerceError::UserError(
            "Quantity must be at least 1".to_string(),
        ));
        assert!(!client_side.is_server_error());
        assert!(!AppError::RateLimited.is_server_error());
        assert!(AppError::Internal("boom".to_string()).is_server_error());
    }
}
