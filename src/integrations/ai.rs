//! OpenAI-compatible chat completion used when the chatbot has no canned
//! answer.

use serde::{Deserialize, Serialize};

use super::{client, send_logged};
use crate::config::INTEGRATIONS;
use crate::error::IntegrationError;

const SYSTEM_PROMPT: &str = "You are the friendly assistant of a freelance graphic design \
     studio offering logos, brand identity, social media kits, print, packaging and website \
     design. Answer in at most three sentences. If the visitor wants to start a project, tell \
     them to type \"quote\".";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn first_answer(response: CompletionResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub async fn complete(message: &str) -> Result<String, IntegrationError> {
    let api_key = INTEGRATIONS
        .ai_api_key
        .as_deref()
        .ok_or(IntegrationError::NotConfigured("ai"))?;

    let body = CompletionRequest {
        model: &INTEGRATIONS.ai_model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT,
            },
            ChatMessage {
                role: "user",
                content: message,
            },
        ],
        max_tokens: 200,
        temperature: 0.4,
    };

    let request = client()
        .post(&INTEGRATIONS.ai_api_url)
        .bearer_auth(api_key)
        .json(&body);
    let response = send_logged("ai", request).await?;
    let parsed = response
        .json::<CompletionResponse>()
        .await
        .map_err(|e| IntegrationError::Response(e.to_string()))?;

    first_answer(parsed).ok_or_else(|| IntegrationError::Response("empty completion".to_string()))
}
