//! Telegram Bot API and WhatsApp HTTP API alerts to the site owner.

use serde_json::json;

use super::{client, send_logged};
use crate::config::INTEGRATIONS;
use crate::error::IntegrationError;

const TELEGRAM_API: &str = "https://api.telegram.org";

/// Cut `text` to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

pub async fn send_telegram(text: &str) -> Result<(), IntegrationError> {
    let (Some(token), Some(chat_id)) = (
        INTEGRATIONS.telegram_bot_token.as_deref(),
        INTEGRATIONS.telegram_chat_id.as_deref(),
    ) else {
        return Err(IntegrationError::NotConfigured("telegram"));
    };

    let request = client()
        .post(format!("{}/bot{}/sendMessage", TELEGRAM_API, token))
        .json(&json!({ "chat_id": chat_id, "text": text }));
    send_logged("telegram", request).await?;
    Ok(())
}

pub async fn send_whatsapp(text: &str) -> Result<(), IntegrationError> {
    let (Some(url), Some(to)) = (
        INTEGRATIONS.whatsapp_api_url.as_deref(),
        INTEGRATIONS.whatsapp_to.as_deref(),
    ) else {
        return Err(IntegrationError::NotConfigured("whatsapp"));
    };

    let mut request = client().post(url).json(&json!({
        "messaging_product": "whatsapp",
        "to": to,
        "type": "text",
        "text": { "body": text }
    }));
    if let Some(token) = INTEGRATIONS.whatsapp_api_token.as_deref() {
        request = request.bearer_auth(token);
    }
    send_logged("whatsapp", request).await?;
    Ok(())
}
