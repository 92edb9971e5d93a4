//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. Route handlers return
//! `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::cart::CartError;
use crate::checkout::CheckoutError;
use crate::shop::ShopError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart or checkout operation failed.
    #[error("Shop error: {0}")]
    Shop(#[from] ShopError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Shop(err) => match err {
                ShopError::CheckoutInProgress
                | ShopError::Checkout(CheckoutError::InvalidTransition { .. }) => {
                    StatusCode::CONFLICT
                }
                ShopError::Checkout(CheckoutError::MissingField(_))
                | ShopError::Cart(CartError::InvalidPrice(_)) => StatusCode::BAD_REQUEST,
                ShopError::Cart(CartError::InvalidIndex { .. } | CartError::ItemNotFound(_)) => {
                    StatusCode::NOT_FOUND
                }
                ShopError::Cart(CartError::QuantityOverflow(_)) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                ShopError::Cart(CartError::Persistence(_)) | ShopError::Persistence(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, %status, "Request rejected");
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Shop(err) if !status.is_server_error() => err.to_string(),
            _ => "Internal server error".to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
