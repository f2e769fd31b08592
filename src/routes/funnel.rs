/**
 * Funnel Event Route
 * Marketing attribution events sent by the pages
 */
use axum::{response::IntoResponse, Json};

use super::{missing_fields, submission_response};
use crate::data;
use crate::db::models::NewFunnelEvent;

/// POST /api/funnel/events
pub async fn record_event(Json(mut payload): Json<NewFunnelEvent>) -> impl IntoResponse {
    if payload.event_type.trim().is_empty() {
        return missing_fields("eventType is required");
    }
    if payload.metadata.is_null() {
        payload.metadata = serde_json::json!({});
    }

    tracing::debug!(
        event_type = %payload.event_type,
        page = ?payload.page,
        "funnel event"
    );
    submission_response(data::record_funnel_event(&payload).await)
}
