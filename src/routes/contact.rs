/**
 * Contact & Newsletter Routes
 */
use axum::{response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use super::{missing_fields, submission_response};
use crate::data::{self, Outcome};
use crate::db::models::NewContactSubmission;
use crate::integrations;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterRequest {
    #[serde(default)]
    pub email: String,
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// POST /api/contact
pub async fn submit_contact(Json(payload): Json<NewContactSubmission>) -> impl IntoResponse {
    if blank(&payload.name) || blank(&payload.email) || blank(&payload.message) {
        return missing_fields("Name, email and message are required");
    }

    let result = data::submit_contact_form(&payload).await;
    if result.outcome == Outcome::Accepted {
        integrations::notify_contact(payload);
    }
    submission_response(result)
}

/// POST /api/newsletter
pub async fn subscribe(Json(payload): Json<NewsletterRequest>) -> impl IntoResponse {
    if blank(&payload.email) {
        return missing_fields("Email is required");
    }

    submission_response(data::subscribe_newsletter(&payload.email).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{mock, SubmissionResult};
    use crate::routes::test_support::send_json;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::Router;

    fn contact_router() -> Router {
        Router::new()
            .route("/api/contact", post(submit_contact))
            .route("/api/newsletter", post(subscribe))
    }

    #[tokio::test]
    async fn test_contact_submission_accepted() {
        let (status, body) = send_json::<SubmissionResult>(
            contact_router(),
            "POST",
            "/api/contact",
            &serde_json::json!({
                "name": "Tom Baker",
                "email": "tom.contact-test@example.com",
                "message": "We need a label for our new IPA.",
                "service": "packaging-design",
                "budget": "$500-$1000"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body.success);

        let stored = mock::store().contact_submissions().await;
        assert!(stored
            .iter()
            .any(|s| s.email == "tom.contact-test@example.com"
                && s.budget.as_deref() == Some("$500-$1000")));
    }

    #[tokio::test]
    async fn test_contact_missing_message() {
        let (status, body) = send_json::<SubmissionResult>(
            contact_router(),
            "POST",
            "/api/contact",
            &serde_json::json!({ "name": "Tom", "email": "tom@example.com", "message": "  " }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
    }

    #[tokio::test]
    async fn test_contact_absent_fields_are_bad_request() {
        let (status, body) = send_json::<SubmissionResult>(
            contact_router(),
            "POST",
            "/api/contact",
            &serde_json::json!({ "email": "tom@example.com" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
    }

    #[tokio::test]
    async fn test_newsletter_subscribe_then_duplicate() {
        let payload = serde_json::json!({ "email": "route-news@example.com" });
        let (status, body) =
            send_json::<SubmissionResult>(contact_router(), "POST", "/api/newsletter", &payload)
                .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body.success);

        let (status, body) =
            send_json::<SubmissionResult>(contact_router(), "POST", "/api/newsletter", &payload)
                .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(!body.success);
    }

    #[tokio::test]
    async fn test_newsletter_requires_email() {
        let (status, _) = send_json::<SubmissionResult>(
            contact_router(),
            "POST",
            "/api/newsletter",
            &serde_json::json!({ "email": "" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
