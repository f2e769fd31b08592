/**
 * Logs Route Handler
 * Receives log batches from the pages and widgets
 */

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use tower_http::request_id::RequestId;

use crate::logging::config::{ClientLogBatch, ClientLogEntry, LogLevel, LogResponse};

/// Largest batch accepted in one request.
pub const MAX_BATCH: usize = 100;
const MAX_MESSAGE_CHARS: usize = 1000;

/// POST /api/logs - Receive client logs
#[tracing::instrument(skip(logs), fields(batch_size = logs.logs.len()))]
pub async fn receive_client_logs(
    request_id: Option<Extension<RequestId>>,
    Json(logs): Json<ClientLogBatch>,
) -> impl IntoResponse {
    let req_id = request_id
        .as_ref()
        .and_then(|ext| ext.0.header_value().to_str().ok())
        .unwrap_or("unknown");

    let received = logs.logs.len();
    if received > MAX_BATCH {
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(LogResponse {
                success: false,
                received,
                processed: 0,
                error: Some(format!("At most {} entries per batch", MAX_BATCH)),
            }),
        );
    }

    let mut processed = 0;
    for log in &logs.logs {
        match process_client_log(log, req_id) {
            Ok(()) => processed += 1,
            Err(e) => tracing::warn!(request_id = %req_id, error = %e, "skipped client log"),
        }
    }

    (
        StatusCode::ACCEPTED,
        Json(LogResponse {
            success: true,
            received,
            processed,
            error: None,
        }),
    )
}

fn process_client_log(log: &ClientLogEntry, request_id: &str) -> Result<(), String> {
    if log.message.trim().is_empty() {
        return Err("empty message".to_string());
    }
    let message: String = log.message.chars().take(MAX_MESSAGE_CHARS).collect();
    let source = log.source.as_deref().unwrap_or("client");

    let span = tracing::info_span!(
        "client_log",
        request_id = %request_id,
        timestamp = %log.timestamp,
        source = %source,
    );
    let _enter = span.enter();

    match log.level {
        LogLevel::Trace => tracing::trace!(message = %message, context = ?log.context, "client log"),
        LogLevel::Debug => tracing::debug!(message = %message, context = ?log.context, "client log"),
        LogLevel::Info => tracing::info!(message = %message, context = ?log.context, "client log"),
        LogLevel::Warn => tracing::warn!(message = %message, context = ?log.context, "client log"),
        LogLevel::Error => tracing::error!(message = %message, context = ?log.context, "client log"),
    }

    Ok(())
}
