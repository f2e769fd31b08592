//! Outbound integrations: owner email, Telegram and WhatsApp alerts, lead
//! enrichment, and AI chat completion.
//!
//! Every integration is optional. Unconfigured ones are skipped and failures
//! are logged; none of them can fail the request that triggered them.

pub mod ai;
pub mod email;
pub mod enrichment;
pub mod messaging;

use once_cell::sync::Lazy;
use std::time::{Duration, Instant};

use crate::config::INTEGRATIONS;
use crate::db::models::{NewContactSubmission, NewLead};
use crate::error::IntegrationError;

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(INTEGRATIONS.request_timeout_secs))
        .user_agent(concat!("studio-backend/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to build integration client, using defaults");
            reqwest::Client::new()
        })
});

pub(crate) fn client() -> &'static reqwest::Client {
    &HTTP_CLIENT
}

/// Host part of an integration URL. Paths and query strings can carry bot
/// tokens or visitor emails, so only the host is ever logged.
fn log_target(url: &reqwest::Url) -> &str {
    url.host_str().unwrap_or("unknown")
}

/// Send a request and log the target host, status and duration.
pub(crate) async fn send_logged(
    integration: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, IntegrationError> {
    let start = Instant::now();
    let response = request.send().await.map_err(|e| {
        let e = e.without_url();
        tracing::error!(
            integration,
            error = %e,
            duration_ms = %start.elapsed().as_millis(),
            "integration request failed"
        );
        IntegrationError::Request(e)
    })?;

    let status = response.status();
    let duration = start.elapsed();
    if !status.is_success() {
        tracing::warn!(
            integration,
            host = %log_target(response.url()),
            status = %status,
            duration_ms = %duration.as_millis(),
            "integration returned error"
        );
        return Err(IntegrationError::Upstream {
            status: status.as_u16(),
        });
    }

    tracing::info!(
        integration,
        host = %log_target(response.url()),
        status = %status,
        duration_ms = %duration.as_millis(),
        "integration request completed"
    );
    Ok(response)
}

fn log_outcome(integration: &str, result: Result<(), IntegrationError>) {
    match result {
        Ok(()) => {}
        Err(IntegrationError::NotConfigured(_)) => {
            tracing::debug!(integration, "integration not configured, skipped");
        }
        Err(e) => tracing::warn!(integration, error = %e, "integration call failed"),
    }
}

/// Alert the owner about a contact form submission. Runs in the background.
pub fn notify_contact(submission: NewContactSubmission) {
    tokio::spawn(async move {
        let subject = format!("New enquiry from {}", submission.name);
        let body = email::contact_html(&submission);
        log_outcome("email", email::send_to_owner(&subject, &body).await);

        let alert = format!(
            "📩 {} <{}>: {}",
            submission.name,
            submission.email,
            messaging::truncate(&submission.message, 280)
        );
        log_outcome("telegram", messaging::send_telegram(&alert).await);
        log_outcome("whatsapp", messaging::send_whatsapp(&alert).await);
    });
}

/// Alert the owner about a captured lead and look the lead up in the
/// enrichment service. Runs in the background.
pub fn notify_lead(lead: NewLead) {
    tokio::spawn(async move {
        let subject = format!("New {} lead: {}", lead.source, lead.name);
        let body = email::lead_html(&lead);
        log_outcome("email", email::send_to_owner(&subject, &body).await);

        let alert = format!("🔥 New {} lead: {} <{}>", lead.source, lead.name, lead.email);
        log_outcome("telegram", messaging::send_telegram(&alert).await);
        log_outcome("whatsapp", messaging::send_whatsapp(&alert).await);

        match enrichment::lookup(&lead.email).await {
            Ok(profile) => {
                tracing::info!(source = %lead.source, profile = %profile, "lead enriched");
            }
            Err(e) => log_outcome("enrichment", Err(e)),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_target_is_host_only() {
        let url = reqwest::Url::parse(
            "https://api.telegram.org/bot123456:SECRET-token/sendMessage?chat_id=42",
        )
        .unwrap();
        assert_eq!(log_target(&url), "api.telegram.org");
    }

    #[tokio::test]
    async fn test_request_error_omits_url() {
        // nothing listens on port 1, so the connect fails fast
        let request = client().post("http://127.0.0.1:1/bot123456:SECRET-token/sendMessage");
        let err = send_logged("telegram", request).await.unwrap_err();
        assert!(matches!(err, IntegrationError::Request(_)));
        assert!(!err.to_string().contains("SECRET-token"));
    }
}
