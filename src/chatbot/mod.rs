//! Site chatbot: canned keyword replies, the lead capture flow, and
//! per-visitor sessions kept in memory.

pub mod lead_flow;
pub mod responses;

use chrono::Utc;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

pub use lead_flow::{LeadDetails, LeadFlow, LeadStep};

use crate::integrations;

/// Idle sessions are dropped after this long.
pub const SESSION_TTL_SECS: i64 = 30 * 60;

lazy_static::lazy_static! {
    static ref SESSIONS: Arc<RwLock<HashMap<String, ChatSession>>> =
        Arc::new(RwLock::new(HashMap::new()));
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    lead_flow: Option<LeadFlow>,
    last_seen: i64,
}

/// What one message produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Turn {
    Reply {
        text: String,
        step: Option<LeadStep>,
    },
    /// The last lead question was answered.
    LeadCaptured { text: String, lead: LeadDetails },
    /// Nothing in the reply table matched.
    Unmatched,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self {
            lead_flow: None,
            last_seen: Utc::now().timestamp(),
        }
    }
}

impl ChatSession {
    pub fn lead_step(&self) -> Option<LeadStep> {
        self.lead_flow.as_ref().map(LeadFlow::step)
    }

    fn begin_lead_flow(&mut self) -> LeadFlow {
        let flow = LeadFlow::new();
        self.lead_flow = Some(flow.clone());
        flow
    }

    pub fn handle(&mut self, message: &str, start_lead_flow: bool) -> Turn {
        self.last_seen = Utc::now().timestamp();

        if let Some(flow) = self.lead_flow.as_mut() {
            flow.answer(message);
            if flow.is_complete() {
                let text = flow.prompt();
                let lead = flow.details().clone();
                self.lead_flow = None;
                return Turn::LeadCaptured { text, lead };
            }
            return Turn::Reply {
                text: flow.prompt(),
                step: Some(flow.step()),
            };
        }

        if start_lead_flow {
            let flow = self.begin_lead_flow();
            return Turn::Reply {
                text: flow.prompt(),
                step: Some(flow.step()),
            };
        }

        match responses::find_response(message) {
            Some(canned) if canned.starts_lead_flow => {
                let flow = self.begin_lead_flow();
                Turn::Reply {
                    text: format!("{} {}", canned.reply, flow.prompt()),
                    step: Some(flow.step()),
                }
            }
            Some(canned) => Turn::Reply {
                text: canned.reply.to_string(),
                step: None,
            },
            None => Turn::Unmatched,
        }
    }
}

/// Run one message through the visitor's session. Unmatched messages go to
/// the AI integration when configured, else get the default reply.
pub async fn respond(session_id: &str, message: &str, start_lead_flow: bool) -> Turn {
    let turn = {
        let now = Utc::now().timestamp();
        let mut sessions = SESSIONS.write().await;
        sessions.retain(|_, s| now - s.last_seen < SESSION_TTL_SECS);
        sessions
            .entry(session_id.to_string())
            .or_default()
            .handle(message, start_lead_flow)
    };

    if turn != Turn::Unmatched {
        return turn;
    }

    let text = match integrations::ai::complete(message).await {
        Ok(answer) => answer,
        Err(e) => {
            tracing::debug!(error = %e, "AI reply unavailable, using default reply");
            responses::DEFAULT_REPLY.to_string()
        }
    };
    Turn::Reply { text, step: None }
}

pub async fn active_sessions() -> usize {
    SESSIONS.read().await.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_reply_without_lead_flow() {
        let mut session = ChatSession::default();
        match session.handle("what's your turnaround?", false) {
            Turn::Reply { text, step } => {
                assert!(text.contains("five working days"));
                assert_eq!(step, None);
            }
            other => panic!("unexpected turn: {:?}", other),
        }
        assert_eq!(session.lead_step(), None);
    }

    #[test]
    fn test_quote_keyword_starts_lead_flow() {
        let mut session = ChatSession::default();
        match session.handle("I'd like a quote", false) {
            Turn::Reply { text, step } => {
                assert_eq!(step, Some(LeadStep::Name));
                assert!(text.contains("name"));
            }
            other => panic!("unexpected turn: {:?}", other),
        }
    }

    #[test]
    fn test_lead_flow_consumes_messages_until_complete() {
        let mut session = ChatSession::default();
        session.handle("", true);

        // keywords are not matched while collecting details
        let turn = session.handle("pricing", false);
        assert_eq!(
            turn,
            Turn::Reply {
                text: "Nice to meet you, pricing! What's the best email to reach you?"
                    .to_string(),
                step: Some(LeadStep::Email),
            }
        );
        session.handle("p@example.com", false);
        session.handle("555-0100", false);
        match session.handle("New logo", false) {
            Turn::LeadCaptured { lead, .. } => {
                assert_eq!(lead.name, "pricing");
                assert_eq!(lead.email, "p@example.com");
                assert_eq!(lead.whatsapp, "555-0100");
                assert_eq!(lead.project, "New logo");
            }
            other => panic!("unexpected turn: {:?}", other),
        }
        assert_eq!(session.lead_step(), None);
    }

    #[test]
    fn test_unmatched_message() {
        let mut session = ChatSession::default();
        assert_eq!(session.handle("zzzz", false), Turn::Unmatched);
    }

    #[tokio::test]
    async fn test_respond_falls_back_to_default_reply() {
        let turn = respond("test-session-fallback", "zzzz", false).await;
        assert_eq!(
            turn,
            Turn::Reply {
                text: responses::DEFAULT_REPLY.to_string(),
                step: None,
            }
        );
    }

    #[tokio::test]
    async fn test_respond_keeps_session_state() {
        respond("test-session-state", "hire you", false).await;
        let turn = respond("test-session-state", "Grace", false).await;
        match turn {
            Turn::Reply { step, .. } => assert_eq!(step, Some(LeadStep::Email)),
            other => panic!("unexpected turn: {:?}", other),
        }
        assert!(active_sessions().await >= 1);
    }
}
