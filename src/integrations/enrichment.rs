use serde_json::Value;

use super::{client, send_logged};
use crate::config::INTEGRATIONS;
use crate::error::IntegrationError;

/// Look a lead's email up in the configured enrichment service and return
/// whatever profile JSON it has.
pub async fn lookup(email: &str) -> Result<Value, IntegrationError> {
    let url = INTEGRATIONS
        .enrichment_api_url
        .as_deref()
        .ok_or(IntegrationError::NotConfigured("enrichment"))?;

    let mut request = client().get(url).query(&[("email", email)]);
    if let Some(key) = INTEGRATIONS.enrichment_api_key.as_deref() {
        request = request.bearer_auth(key);
    }

    let response = send_logged("enrichment", request).await?;
    response
        .json::<Value>()
        .await
        .map_err(|e| IntegrationError::Response(e.to_string()))
}
