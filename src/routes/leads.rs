/**
 * Lead Capture Route
 * Popups and lead magnet downloads post here
 */
use axum::{response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use super::{missing_fields, submission_response};
use crate::data::{self, Outcome};
use crate::db::models::NewLead;
use crate::integrations;

pub const DEFAULT_SOURCE: &str = "popup";

/// Request body for POST /api/leads
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub whatsapp: Option<String>,
    pub project: Option<String>,
    /// Widget that captured the lead, e.g. `popup` or `lead_magnet`.
    pub source: Option<String>,
    /// Lead magnet the visitor asked for, recorded with the project notes.
    pub magnet: Option<String>,
}

impl LeadRequest {
    fn into_new_lead(self) -> NewLead {
        let project = match (self.project, self.magnet) {
            (Some(p), Some(m)) => Some(format!("{} (requested: {})", p, m)),
            (None, Some(m)) => Some(format!("Requested: {}", m)),
            (p, None) => p,
        };
        NewLead {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            whatsapp: self.whatsapp,
            project,
            source: self
                .source
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        }
    }
}

/// POST /api/leads
pub async fn capture_lead(Json(payload): Json<LeadRequest>) -> impl IntoResponse {
    if payload.email.trim().is_empty() {
        return missing_fields("Email is required");
    }

    let lead = payload.into_new_lead();
    let result = data::capture_lead(&lead).await;
    if result.outcome == Outcome::Accepted {
        integrations::notify_lead(lead);
    }
    submission_response(result)
}
