/**
 * Blog Routes
 * Read endpoints for blog posts plus the view counter
 */
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{invalid_slug, is_valid_slug, not_found, ErrorResponse};
use crate::data::{self, ContentFilter};
use crate::db::models::Blog;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for GET /api/blogs (list)
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogListResponse {
    pub items: Vec<BlogSummary>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

/// Blog post summary (for list view)
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub author: String,
    pub view_count: i64,
    pub reading_time_minutes: u32,
    pub published_at: Option<DateTime<Utc>>,
}

/// Response for POST /api/blogs/{slug}/views
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewCountResponse {
    pub slug: String,
    pub view_count: i64,
}

const WORDS_PER_MINUTE: usize = 200;

fn reading_time_minutes(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

impl From<Blog> for BlogSummary {
    fn from(blog: Blog) -> Self {
        Self {
            reading_time_minutes: reading_time_minutes(&blog.content),
            id: blog.id,
            title: blog.title,
            slug: blog.slug,
            excerpt: blog.excerpt,
            cover_image: blog.cover_image,
            category: blog.category,
            tags: blog.tags,
            author: blog.author,
            view_count: blog.view_count,
            published_at: blog.published_at,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/blogs - List blog posts with pagination and filters
pub async fn list_blogs(Query(filter): Query<ContentFilter>) -> impl IntoResponse {
    let page = data::fetch_blogs(&filter).await;

    Json(BlogListResponse {
        items: page.items.into_iter().map(BlogSummary::from).collect(),
        page: page.page,
        page_size: page.page_size,
        total: page.total,
    })
}

/// GET /api/blogs/{slug} - Get a single published post
pub async fn get_blog(Path(slug): Path<String>) -> impl IntoResponse {
    if !is_valid_slug(&slug) {
        return invalid_slug().into_response();
    }

    match data::fetch_blog(&slug).await {
        Some(blog) => (StatusCode::OK, Json(blog)).into_response(),
        None => not_found().into_response(),
    }
}

/// POST /api/blogs/{slug}/views - Count one view of a post
pub async fn record_view(Path(slug): Path<String>) -> impl IntoResponse {
    if !is_valid_slug(&slug) {
        return invalid_slug().into_response();
    }

    match data::increment_blog_views(&slug).await {
        Ok(Some(view_count)) => {
            (StatusCode::OK, Json(ViewCountResponse { slug, view_count })).into_response()
        }
        Ok(None) => not_found().into_response(),
        Err(e) => {
            tracing::error!(slug = %slug, error = %e, "failed to record blog view");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to record view")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{get_json, send_json};
    use axum::routing::{get, post};
    use axum::Router;

    fn blog_router() -> Router {
        Router::new()
            .route("/api/blogs", get(list_blogs))
            .route("/api/blogs/{slug}", get(get_blog))
            .route("/api/blogs/{slug}/views", post(record_view))
    }

    #[test]
    fn test_reading_time_rounds_up() {
        assert_eq!(reading_time_minutes(""), 1);
        assert_eq!(reading_time_minutes(&"word ".repeat(201)), 2);
    }

    #[tokio::test]
    async fn test_list_blogs_returns_published_only() {
        let (status, body) = get_json::<BlogListResponse>(blog_router(), "/api/blogs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.page, 1);
        assert_eq!(body.total as usize, body.items.len());
        assert!(body.items.iter().all(|b| b.slug != "upcoming-rebrand-checklist"));
        assert!(body.items.iter().all(|b| b.slug != "design-trends-2022"));
    }

    #[tokio::test]
    async fn test_list_blogs_filters_by_tag_and_paginates() {
        let (status, body) = get_json::<BlogListResponse>(
            blog_router(),
            "/api/blogs?tag=branding&pageSize=1&page=2",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.page_size, 1);
        assert_eq!(body.items.len(), 1);
        assert!(body.items[0].tags.iter().any(|t| t == "branding"));
        assert!(body.total >= 2);
    }

    #[tokio::test]
    async fn test_list_blogs_huge_page_is_empty() {
        let (status, body) = get_json::<BlogListResponse>(
            blog_router(),
            "/api/blogs?page=9223372036854775807",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.items.is_empty());
        assert!(body.total >= 1);
    }

    #[tokio::test]
    async fn test_list_blogs_can_show_archived() {
        let (_, body) =
            get_json::<BlogListResponse>(blog_router(), "/api/blogs?status=archived").await;
        assert_eq!(body.items.len(), 1);
        assert_eq!(body.items[0].slug, "design-trends-2022");
    }

    #[tokio::test]
    async fn test_get_blog_by_slug() {
        let (status, body) =
            get_json::<Blog>(blog_router(), "/api/blogs/colours-that-convert").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.slug, "colours-that-convert");
        assert!(!body.content.is_empty());
    }

    #[tokio::test]
    async fn test_get_draft_blog_is_not_found() {
        let (status, _) = get_json::<ErrorResponse>(
            blog_router(),
            "/api/blogs/upcoming-rebrand-checklist",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_blog_invalid_slug() {
        let (status, body) = get_json::<ErrorResponse>(blog_router(), "/api/blogs/Bad_Slug").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Invalid slug");
    }

    #[tokio::test]
    async fn test_record_view_increments() {
        let (status, first) = send_json::<ViewCountResponse>(
            blog_router(),
            "POST",
            "/api/blogs/packaging-that-stands-out/views",
            &serde_json::json!({}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (_, second) = send_json::<ViewCountResponse>(
            blog_router(),
            "POST",
            "/api/blogs/packaging-that-stands-out/views",
            &serde_json::json!({}),
        )
        .await;
        assert!(second.view_count > first.view_count);
    }

    #[tokio::test]
    async fn test_record_view_unknown_post() {
        let (status, _) = send_json::<ErrorResponse>(
            blog_router(),
            "POST",
            "/api/blogs/no-such-post/views",
            &serde_json::json!({}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
