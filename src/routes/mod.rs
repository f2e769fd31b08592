/**
 * Routes Module
 * API route handlers
 */

pub mod blog;
pub mod chat;
pub mod contact;
pub mod funnel;
pub mod health;
pub mod leads;
pub mod logs;
pub mod notifications;
pub mod portfolio;
pub mod pricing;
pub mod rss;
pub mod services;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::data::{Outcome, SubmissionResult};

/// Error body shared by all handlers
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

lazy_static::lazy_static! {
    /// Valid slug pattern: lowercase letters, numbers, and hyphens
    static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_REGEX.is_match(slug)
}

pub fn invalid_slug() -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "Invalid slug".to_string(),
            message: Some(
                "Slug must contain only lowercase letters, numbers, and hyphens".to_string(),
            ),
        }),
    )
}

pub fn not_found() -> ApiError {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found")))
}

/// Map a submission result onto the HTTP status the widgets expect.
pub fn submission_response(result: SubmissionResult) -> Response {
    let status = match result.outcome {
        Outcome::Accepted => StatusCode::CREATED,
        Outcome::Duplicate => StatusCode::CONFLICT,
        Outcome::Failed => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(result)).into_response()
}

/// 400 with the same `{success, message}` body the widgets read.
pub fn missing_fields(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(SubmissionResult::failed(message)),
    )
        .into_response()
}

/// Check the `x-admin-key` header against the configured key
/// (`ADMIN_API_KEY`). With no key configured the owner endpoints stay closed.
pub fn check_admin_key(expected: Option<&str>, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = expected else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("Admin access is not configured")),
        ));
    };

    match headers.get("x-admin-key").and_then(|v| v.to_str().ok()) {
        Some(provided) if provided == expected => Ok(()),
        Some(_) => Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Invalid admin key")),
        )),
        None => Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Authorization required")),
        )),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{body::Body, http::Request, http::StatusCode, Router};
    use tower::ServiceExt;

    pub async fn get_json<T: serde::de::DeserializeOwned>(
        app: Router,
        uri: &str,
    ) -> (StatusCode, T) {
        let req = Request::get(uri).body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    pub async fn send_json<T: serde::de::DeserializeOwned>(
        app: Router,
        method: &str,
        uri: &str,
        json: &impl serde::Serialize,
    ) -> (StatusCode, T) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(json).unwrap()))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }
}
