use serde::Serialize;

use super::{client, send_logged};
use crate::config::{INTEGRATIONS, SITE};
use crate::db::models::{NewContactSubmission, NewLead};
use crate::error::IntegrationError;

#[derive(Debug, Serialize)]
struct OutgoingEmail<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
}

pub async fn send(to: &str, subject: &str, html: &str) -> Result<(), IntegrationError> {
    let api_key = INTEGRATIONS
        .email_api_key
        .as_deref()
        .ok_or(IntegrationError::NotConfigured("email"))?;

    let payload = OutgoingEmail {
        from: &INTEGRATIONS.email_from,
        to: vec![to],
        subject,
        html,
    };
    let request = client()
        .post(&INTEGRATIONS.email_api_url)
        .bearer_auth(api_key)
        .json(&payload);
    send_logged("email", request).await?;
    Ok(())
}

pub async fn send_to_owner(subject: &str, html: &str) -> Result<(), IntegrationError> {
    let owner = SITE
        .owner_email
        .as_deref()
        .ok_or(IntegrationError::NotConfigured("email"))?;
    send(owner, subject, html).await
}

fn row(label: &str, value: &str) -> String {
    format!(
        "<tr><th align=\"left\">{}</th><td>{}</td></tr>",
        label,
        ammonia::clean_text(value)
    )
}

fn optional_row(label: &str, value: &Option<String>) -> String {
    value.as_deref().map(|v| row(label, v)).unwrap_or_default()
}

/// Owner email body for a contact submission. Visitor text is escaped.
pub fn contact_html(submission: &NewContactSubmission) -> String {
    format!(
        "<h2>New enquiry</h2><table>{}{}{}{}{}{}</table><p>{}</p>",
        row("Name", &submission.name),
        row("Email", &submission.email),
        optional_row("Phone", &submission.phone),
        optional_row("Subject", &submission.subject),
        optional_row("Service", &submission.service),
        optional_row("Budget", &submission.budget),
        ammonia::clean_text(&submission.message).replace('\n', "<br>"),
    )
}

pub fn lead_html(lead: &NewLead) -> String {
    format!(
        "<h2>New lead</h2><table>{}{}{}{}{}</table>",
        row("Source", &lead.source),
        row("Name", &lead.name),
        row("Email", &lead.email),
        optional_row("WhatsApp", &lead.whatsapp),
        optional_row("Project", &lead.project),
    )
}
