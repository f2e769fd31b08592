/**
 * Services & Testimonials Routes
 */
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::{invalid_slug, is_valid_slug, not_found};
use crate::data::{self, ContentFilter};

/// GET /api/services
pub async fn list_services(Query(filter): Query<ContentFilter>) -> impl IntoResponse {
    Json(data::fetch_services(&filter).await)
}

/// GET /api/services/{slug} - service with its testimonials
pub async fn get_service(Path(slug): Path<String>) -> impl IntoResponse {
    if !is_valid_slug(&slug) {
        return invalid_slug().into_response();
    }

    match data::fetch_service(&slug).await {
        Some(detail) => (StatusCode::OK, Json(detail)).into_response(),
        None => not_found().into_response(),
    }
}

/// GET /api/testimonials?featured=true
pub async fn list_testimonials(Query(filter): Query<ContentFilter>) -> impl IntoResponse {
    Json(data::fetch_testimonials(&filter).await)
}
