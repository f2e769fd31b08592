/**
 * Portfolio Routes
 * Case studies shown on the work pages
 */
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::{invalid_slug, is_valid_slug, not_found};
use crate::data::{self, ContentFilter};

/// GET /api/portfolio?category=&tag=&featured=&page=&pageSize=
pub async fn list_portfolio(Query(filter): Query<ContentFilter>) -> impl IntoResponse {
    Json(data::fetch_portfolio(&filter).await)
}

/// GET /api/portfolio/{slug}
pub async fn get_portfolio_item(Path(slug): Path<String>) -> impl IntoResponse {
    if !is_valid_slug(&slug) {
        return invalid_slug().into_response();
    }

    match data::fetch_portfolio_item(&slug).await {
        Some(item) => (StatusCode::OK, Json(item)).into_response(),
        None => not_found().into_response(),
    }
}
