//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. `AppError` decides the HTTP
//! status and the client-facing message, and captures server errors to
//! Sentry before responding.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use storekeep_core::Role;

use crate::services::{AuthError, CartError, CatalogError, OrderError};
use crate::validation::ValidationError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request fields failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Authentication or authorization failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// No route matched the request.
    #[error("Route not found")]
    RouteNotFound,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials
                | AuthError::MissingToken
                | AuthError::InvalidToken
                | AuthError::UserNotFound => StatusCode::UNAUTHORIZED,
                AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
                AuthError::DuplicateEmail => StatusCode::BAD_REQUEST,
                AuthError::PasswordHash | AuthError::Store(_) | AuthError::TokenSigning(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Catalog(CatalogError::NotFound(_))
            | Self::Cart(CartError::ProductNotFound(_))
            | Self::Order(OrderError::ProductNotFound(_) | OrderError::NotFound(_))
            | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::Cart(CartError::InsufficientStock { .. })
            | Self::Order(
                OrderError::EmptyCart
                | OrderError::InsufficientStock { .. }
                | OrderError::TotalTooLarge,
            ) => StatusCode::BAD_REQUEST,
            Self::Catalog(CatalogError::Store(_)) | Self::Order(OrderError::Store(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the client. Server error details stay in the logs.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid email or password".to_string(),
                AuthError::DuplicateEmail => "Email already registered".to_string(),
                AuthError::MissingToken => "Missing authorization token".to_string(),
                AuthError::InvalidToken => "Invalid or expired token".to_string(),
                AuthError::UserNotFound => "User not found".to_string(),
                AuthError::Forbidden(Role::Admin) => "Admin access required".to_string(),
                AuthError::Forbidden(Role::User) => "User access required".to_string(),
                AuthError::PasswordHash | AuthError::Store(_) | AuthError::TokenSigning(_) => {
                    "Internal server error".to_string()
                }
            },
            Self::Catalog(CatalogError::NotFound(_)) | Self::Cart(CartError::ProductNotFound(_)) => {
                "Product not found".to_string()
            }
            Self::Catalog(CatalogError::Store(_)) => "Internal server error".to_string(),
            Self::Cart(CartError::InsufficientStock { .. }) => "Insufficient stock".to_string(),
            Self::Order(err) => match err {
                OrderError::EmptyCart => "Cart is empty".to_string(),
                OrderError::ProductNotFound(id) => format!("Product {id} not found"),
                OrderError::InsufficientStock { product_name, .. } => {
                    format!("Insufficient stock for {product_name}")
                }
                OrderError::TotalTooLarge => "Order total is too large".to_string(),
                OrderError::NotFound(_) => "Order not found".to_string(),
                OrderError::Store(_) => "Internal server error".to_string(),
            },
            Self::RouteNotFound => "Route not found".to_string(),
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
            tracing::debug!(error = %self, status = status.as_u16(), "request failed");
        }

        let body = ErrorBody {
            status: "error",
            message: self.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the authenticated user.
///
/// Called by the auth extractors so errors are associated with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}
