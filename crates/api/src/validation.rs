//! Request validation.
//!
//! Request bodies are deserialized loosely (every field an optional JSON
//! value) and then checked field by field, so a bad request reports every
//! problem at once as `Validation failed: <msg>, <msg>`.

use std::str::FromStr;

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AppError;

/// One or more request fields failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation failed: {}", .messages.join(", "))]
pub struct ValidationError {
    messages: Vec<String>,
}

impl ValidationError {
    /// A single-message validation error.
    #[must_use]
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

/// Collects validation failures for one request.
#[derive(Debug, Default)]
pub struct Violations {
    messages: Vec<String>,
}

impl Violations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure.
    pub fn add(&mut self, message: impl Into<String>) -> &mut Self {
        self.messages.push(message.into());
        self
    }

    /// Unwrap a checked field, recording `message` if it is missing.
    pub fn require<T>(&mut self, value: Option<T>, message: &str) -> Option<T> {
        if value.is_none() {
            self.add(message);
        }
        value
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// `Ok(())` if nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns every recorded message as one `ValidationError`.
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                messages: self.messages,
            })
        }
    }
}

// =============================================================================
// Field readers
// =============================================================================

/// A non-empty string field.
#[must_use]
pub fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// An integer field, given either as a JSON integer or as a string of
/// digits.
#[must_use]
pub fn integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A decimal field, given either as a JSON number or as a numeric string.
#[must_use]
pub fn decimal(value: Option<&Value>) -> Option<Decimal> {
    let text = match value? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Parse an integer id taken from the URL path.
///
/// # Errors
///
/// Returns a `ValidationError` carrying `message` if `raw` is not an integer
/// that fits an id.
pub fn path_id<Id: From<i32>>(raw: &str, message: &str) -> Result<Id, ValidationError> {
    raw.trim()
        .parse::<i32>()
        .map(Id::from)
        .map_err(|_| ValidationError::single(message))
}

// =============================================================================
// JSON body extractor
// =============================================================================

/// `Json<T>` that reports unreadable bodies as a validation failure (400)
/// instead of axum's default 415/422 plain-text rejections.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "rejected request body");
                Err(ValidationError::single(rejection_message(&rejection)).into())
            }
        }
    }
}

const fn rejection_message(rejection: &JsonRejection) -> &'static str {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => "Content-Type must be application/json",
        _ => "Request body must be a valid JSON object",
    }
}
