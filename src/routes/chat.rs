/**
 * Chatbot Route
 */
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ErrorResponse;
use crate::chatbot::{self, LeadDetails, LeadStep, Turn};
use crate::data::{self, Outcome};
use crate::integrations;

/// Longest message the widget may send.
pub const MAX_MESSAGE_LEN: usize = 2000;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub start_lead_flow: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub session_id: String,
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<LeadStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead: Option<LeadDetails>,
}

/// POST /api/chat
pub async fn chat(Json(payload): Json<ChatRequest>) -> impl IntoResponse {
    if payload.message.chars().count() > MAX_MESSAGE_LEN {
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(ErrorResponse::new("Message too long")),
        )
            .into_response();
    }

    let session_id = payload
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let response = match chatbot::respond(&session_id, &payload.message, payload.start_lead_flow)
        .await
    {
        Turn::Reply { text, step } => ChatResponse {
            session_id,
            reply: text,
            step,
            lead: None,
        },
        Turn::LeadCaptured { text, lead } => {
            let new_lead = lead.to_new_lead("chatbot");
            let result = data::capture_lead(&new_lead).await;
            if result.outcome == Outcome::Accepted {
                integrations::notify_lead(new_lead);
            } else {
                tracing::warn!(session_id = %session_id, message = %result.message, "chatbot lead not stored");
            }
            ChatResponse {
                session_id,
                reply: text,
                step: Some(LeadStep::Complete),
                lead: Some(lead),
            }
        }
        Turn::Unmatched => ChatResponse {
            session_id,
            reply: chatbot::responses::DEFAULT_REPLY.to_string(),
            step: None,
            lead: None,
        },
    };

    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::mock;
    use crate::routes::test_support::send_json;
    use axum::routing::post;
    use axum::Router;

    fn chat_router() -> Router {
        Router::new().route("/api/chat", post(chat))
    }

    async fn say(session_id: &str, message: &str, start: bool) -> ChatResponse {
        let (status, body) = send_json::<ChatResponse>(
            chat_router(),
            "POST",
            "/api/chat",
            &serde_json::json!({
                "sessionId": session_id,
                "message": message,
                "startLeadFlow": start
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    #[tokio::test]
    async fn test_chat_assigns_session_id() {
        let (status, body) = send_json::<ChatResponse>(
            chat_router(),
            "POST",
            "/api/chat",
            &serde_json::json!({ "message": "what does a logo cost?" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(Uuid::parse_str(&body.session_id).is_ok());
        assert!(body.reply.contains("$149"));
        assert_eq!(body.step, None);
    }

    #[tokio::test]
    async fn test_chat_lead_flow_stores_lead() {
        let session = "route-chat-lead-flow";
        let first = say(session, "", true).await;
        assert_eq!(first.step, Some(LeadStep::Name));

        assert_eq!(say(session, "Priya", false).await.step, Some(LeadStep::Email));
        say(session, "priya.chat@example.com", false).await;
        say(session, "+91 98765 43210", false).await;
        let done = say(session, "Logo for a tea brand", false).await;

        assert_eq!(done.step, Some(LeadStep::Complete));
        let lead = done.lead.unwrap();
        assert_eq!(lead.name, "Priya");
        assert!(done.reply.contains("Priya"));

        let leads = mock::store().leads().await;
        assert!(leads
            .iter()
            .any(|l| l.email == "priya.chat@example.com" && l.source == "chatbot"));
    }

    #[tokio::test]
    async fn test_chat_rejects_long_message() {
        let (status, _) = send_json::<ErrorResponse>(
            chat_router(),
            "POST",
            "/api/chat",
            &serde_json::json!({ "message": "a".repeat(MAX_MESSAGE_LEN + 1) }),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
