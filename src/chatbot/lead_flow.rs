//! Lead capture walk: name, email, WhatsApp, project, done.

use serde::{Deserialize, Serialize};

use crate::db::models::NewLead;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStep {
    Name,
    Email,
    Whatsapp,
    Project,
    Complete,
}

impl LeadStep {
    pub fn next(self) -> Self {
        match self {
            LeadStep::Name => LeadStep::Email,
            LeadStep::Email => LeadStep::Whatsapp,
            LeadStep::Whatsapp => LeadStep::Project,
            LeadStep::Project | LeadStep::Complete => LeadStep::Complete,
        }
    }
}

/// Fields collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadDetails {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub project: String,
}

impl LeadDetails {
    pub fn to_new_lead(&self, source: &str) -> NewLead {
        let optional = |s: &str| (!s.is_empty()).then(|| s.to_string());
        NewLead {
            name: self.name.clone(),
            email: self.email.clone(),
            whatsapp: optional(&self.whatsapp),
            project: optional(&self.project),
            source: source.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LeadFlow {
    step: LeadStep,
    details: LeadDetails,
}

impl Default for LeadFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl LeadFlow {
    pub fn new() -> Self {
        Self {
            step: LeadStep::Name,
            details: LeadDetails::default(),
        }
    }

    pub fn step(&self) -> LeadStep {
        self.step
    }

    pub fn details(&self) -> &LeadDetails {
        &self.details
    }

    pub fn is_complete(&self) -> bool {
        self.step == LeadStep::Complete
    }

    /// Question for the current step.
    pub fn prompt(&self) -> String {
        match self.step {
            LeadStep::Name => "First, what's your name?".to_string(),
            LeadStep::Email => format!(
                "Nice to meet you, {}! What's the best email to reach you?",
                self.details.name
            ),
            LeadStep::Whatsapp => "And your WhatsApp number, for quick updates?".to_string(),
            LeadStep::Project => "Tell me a little about your project.".to_string(),
            LeadStep::Complete => format!(
                "Thanks {}! We've got your details and will be in touch within 24 hours.",
                self.details.name
            ),
        }
    }

    /// Store `input` verbatim in the field for the current step and move one
    /// step forward. Returns the step that was answered, or `None` once the
    /// flow is complete.
    pub fn answer(&mut self, input: &str) -> Option<LeadStep> {
        let answered = self.step;
        let field = match answered {
            LeadStep::Name => &mut self.details.name,
            LeadStep::Email => &mut self.details.email,
            LeadStep::Whatsapp => &mut self.details.whatsapp,
            LeadStep::Project => &mut self.details.project,
            LeadStep::Complete => return None,
        };
        *field = input.to_string();
        self.step = answered.next();
        Some(answered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_fill_in_fixed_order() {
        let mut flow = LeadFlow::new();
        assert_eq!(flow.step(), LeadStep::Name);

        assert_eq!(flow.answer("Ada"), Some(LeadStep::Name));
        assert_eq!(flow.step(), LeadStep::Email);
        assert_eq!(flow.answer("ada@example.com"), Some(LeadStep::Email));
        assert_eq!(flow.step(), LeadStep::Whatsapp);
        assert_eq!(flow.answer("+44 7700 900123"), Some(LeadStep::Whatsapp));
        assert_eq!(flow.step(), LeadStep::Project);
        assert_eq!(flow.answer("A logo for my bakery"), Some(LeadStep::Project));
        assert!(flow.is_complete());

        assert_eq!(
            flow.details(),
            &LeadDetails {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                whatsapp: "+44 7700 900123".to_string(),
                project: "A logo for my bakery".to_string(),
            }
        );
    }

    #[test]
    fn test_input_is_captured_verbatim() {
        let mut flow = LeadFlow::new();
        flow.answer("  not an email  ");
        flow.answer("");
        assert_eq!(flow.details().name, "  not an email  ");
        assert_eq!(flow.details().email, "");
        assert_eq!(flow.step(), LeadStep::Whatsapp);
    }

    #[test]
    fn test_answers_after_complete_are_ignored() {
        let mut flow = LeadFlow::new();
        for input in ["Ada", "ada@example.com", "123", "Website"] {
            flow.answer(input);
        }
        let before = flow.details().clone();
        assert_eq!(flow.answer("extra"), None);
        assert_eq!(flow.details(), &before);
        assert_eq!(flow.step(), LeadStep::Complete);
    }

    #[test]
    fn test_prompt_uses_captured_name() {
        let mut flow = LeadFlow::new();
        flow.answer("Ada");
        assert!(flow.prompt().contains("Ada"));
    }

    #[test]
    fn test_to_new_lead_drops_empty_optionals() {
        let details = LeadDetails {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            whatsapp: String::new(),
            project: "Logo".to_string(),
        };
        let lead = details.to_new_lead("chatbot");
        assert_eq!(lead.whatsapp, None);
        assert_eq!(lead.project.as_deref(), Some("Logo"));
        assert_eq!(lead.source, "chatbot");
    }
}
