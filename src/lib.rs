//! Studio Backend - content, lead capture and chatbot API for the studio site

pub mod chatbot;
pub mod config;
pub mod data;
pub mod db;
pub mod error;
pub mod integrations;
pub mod logging;
pub mod pricing;
pub mod routes;

use axum::{
    http::{HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};

/// Configure CORS from environment variables.
/// Uses ALLOWED_ORIGINS (comma-separated) or FRONTEND_ORIGIN, else the local
/// dev server.
pub fn configure_cors() -> CorsLayer {
    let allowed_origins = std::env::var("ALLOWED_ORIGINS")
        .ok()
        .and_then(|s| {
            let origins: Vec<HeaderValue> = s
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                None
            } else {
                Some(origins)
            }
        })
        .or_else(|| {
            std::env::var("FRONTEND_ORIGIN")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(|origin| vec![origin])
        })
        .unwrap_or_else(|| {
            vec![
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://127.0.0.1:3000"),
            ]
        });

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            HeaderName::from_static("x-admin-key"),
        ])
}

/// Create and configure the application router.
pub fn create_app() -> Router {
    let cors = configure_cors();

    Router::new()
        .route("/api/blogs", get(routes::blog::list_blogs))
        .route("/api/blogs/{slug}", get(routes::blog::get_blog))
        .route("/api/blogs/{slug}/views", post(routes::blog::record_view))
        .route("/api/portfolio", get(routes::portfolio::list_portfolio))
        .route(
            "/api/portfolio/{slug}",
            get(routes::portfolio::get_portfolio_item),
        )
        .route("/api/services", get(routes::services::list_services))
        .route("/api/services/{slug}", get(routes::services::get_service))
        .route("/api/testimonials", get(routes::services::list_testimonials))
        .route("/api/contact", post(routes::contact::submit_contact))
        .route("/api/newsletter", post(routes::contact::subscribe))
        .route("/api/leads", post(routes::leads::capture_lead))
        .route("/api/funnel/events", post(routes::funnel::record_event))
        .route("/api/chat", post(routes::chat::chat))
        .route("/api/pricing/catalogue", get(routes::pricing::catalogue))
        .route("/api/pricing/estimate", post(routes::pricing::estimate))
        .route(
            "/api/notifications",
            get(routes::notifications::list_notifications),
        )
        .route(
            "/api/notifications/{id}/read",
            patch(routes::notifications::mark_read),
        )
        .route("/api/logs", post(routes::logs::receive_client_logs))
        .route("/rss.xml", get(routes::rss::rss_feed))
        .route("/health", get(routes::health::health_ping))
        .route("/health/detailed", get(routes::health::health_detailed))
        .route("/health/database", get(routes::health::health_database))
        .route("/health/ready", get(routes::health::health_ready))
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        // 2 MB cap on request bodies
        .layer(RequestBodyLimitLayer::new(2 * 1024 * 1024))
        .layer(cors)
}

fn warn_about_production_config() {
    if !config::SITE.is_production() {
        return;
    }
    if config::SITE.admin_api_key.is_none() {
        tracing::warn!("ADMIN_API_KEY is not set; notification endpoints will return 503");
    }
    if config::SITE.owner_email.is_none() {
        tracing::warn!("OWNER_EMAIL is not set; contact and lead emails will not be sent");
    }
    if config::SITE.use_mock_data {
        tracing::warn!("USE_MOCK_DATA is on in production; submissions are kept in memory only");
    }
}

async fn connect_database() {
    if config::SITE.use_mock_data {
        tracing::info!("USE_MOCK_DATA set, serving bundled content");
        return;
    }
    if std::env::var("DATABASE_URL").is_err() {
        tracing::info!("DATABASE_URL not set, serving bundled content");
        return;
    }

    // the pool is only installed after migrations succeed
    if let Err(e) = db::init_pool(None).await {
        tracing::error!(
            error = %e,
            "database unavailable or migrations failed, serving bundled content"
        );
    }
}

/// Run the server (used by main).
pub async fn run() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    // held until the server exits so buffered log lines are flushed
    let _log_guards = logging::init();

    routes::health::init_start_time();
    warn_about_production_config();
    connect_database().await;
    tracing::info!(data_source = data::source_name(), "content source selected");

    let app = create_app();

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3001);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}
