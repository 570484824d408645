//! Success response envelope.
//!
//! Every successful response is `{status: "success", message?, count?, data}`.
//! Errors use the matching `{status: "error", message}` shape from
//! [`crate::error::ErrorBody`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    data: T,
    #[serde(skip)]
    code: StatusCode,
}

impl<T: Serialize> Envelope<T> {
    /// 200 with `data`.
    pub const fn ok(data: T) -> Self {
        Self {
            status: "success",
            message: None,
            count: None,
            data,
            code: StatusCode::OK,
        }
    }

    /// 201 with `data`.
    pub fn created(data: T) -> Self {
        Self {
            code: StatusCode::CREATED,
            ..Self::ok(data)
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl<T: Serialize> Envelope<Vec<T>> {
    /// 200 with a list and its length as `count`.
    pub fn list(data: Vec<T>) -> Self {
        Self {
            count: Some(data.len()),
            ..Self::ok(data)
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.code, Json(self)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_optional_fields_are_omitted() {
        let body = serde_json::to_value(Envelope::ok(json!({"id": 1}))).unwrap();
        assert_eq!(body, json!({"status": "success", "data": {"id": 1}}));
    }

    #[test]
    fn test_list_counts() {
        let envelope = Envelope::list(vec![1, 2, 3]).with_message("three");
        let body = serde_json::to_value(&envelope).unwrap();

        assert_eq!(body["count"], 3);
        assert_eq!(body["message"], "three");
        assert_eq!(envelope.code, StatusCode::OK);
    }

    #[test]
    fn test_created_status() {
        let response = Envelope::created(json!(null)).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
