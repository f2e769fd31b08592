//! Canned replies matched by keyword.

/// One row of the reply table.
#[derive(Debug)]
pub struct CannedResponse {
    pub keywords: &'static [&'static str],
    pub reply: &'static str,
    /// Whether this reply hands over to the lead capture flow.
    pub starts_lead_flow: bool,
}

pub const DEFAULT_REPLY: &str = "I'm not sure I caught that. You can ask about our services, \
     pricing, turnaround times or past work, or type \"quote\" and I'll take your details.";

pub const GREETING: &str = "Hi! I'm the studio assistant. Ask me about logos, branding, \
     websites or pricing.";

/// Scanned top to bottom; earlier rows win.
pub const RESPONSES: &[CannedResponse] = &[
    CannedResponse {
        keywords: &["quote", "hire", "start a project", "get started", "work with you"],
        reply: "Great, let's get your project started! I'll ask a few quick questions.",
        starts_lead_flow: true,
    },
    CannedResponse {
        keywords: &["price", "pricing", "cost", "how much", "budget", "rate"],
        reply: "Logo design starts at $149, brand identity packages at $499 and website \
                design at $999. Try the pricing calculator for an instant estimate.",
        starts_lead_flow: false,
    },
    CannedResponse {
        keywords: &["logo"],
        reply: "Every logo package includes three initial concepts, five revisions and \
                vector source files in colour and mono.",
        starts_lead_flow: false,
    },
    CannedResponse {
        keywords: &["brand", "identity", "guidelines"],
        reply: "Brand identity covers your logo suite, colour palette, typography and a \
                brand guidelines PDF your team can follow.",
        starts_lead_flow: false,
    },
    CannedResponse {
        keywords: &["website", "web design", "landing page", "site"],
        reply: "We design conversion-focused marketing sites of up to six pages, fully \
                responsive, with contact and quote forms built in.",
        starts_lead_flow: false,
    },
    CannedResponse {
        keywords: &["how long", "turnaround", "timeline", "deadline", "rush", "urgent"],
        reply: "Most logo projects take about five working days. Need it sooner? Rush \
                delivery is available for 50% extra.",
        starts_lead_flow: false,
    },
    CannedResponse {
        keywords: &["revision", "changes", "edit"],
        reply: "Five rounds of revisions are included. Extra rounds are $10 each.",
        starts_lead_flow: false,
    },
    CannedResponse {
        keywords: &["portfolio", "examples", "past work", "case stud"],
        reply: "You can browse recent projects on the portfolio page, from coffee roasters \
                to law firms.",
        starts_lead_flow: false,
    },
    CannedResponse {
        keywords: &["contact", "email", "call", "whatsapp", "phone"],
        reply: "You can reach us through the contact form, or leave your details here and \
                we'll get back to you within 24 hours.",
        starts_lead_flow: false,
    },
    CannedResponse {
        keywords: &["hello", "hi ", "hey", "good morning", "good afternoon"],
        reply: GREETING,
        starts_lead_flow: false,
    },
    CannedResponse {
        keywords: &["thank", "thanks", "cheers"],
        reply: "You're welcome! Anything else I can help with?",
        starts_lead_flow: false,
    },
];

/// First row whose keyword occurs in the lowercased message.
pub fn find_response(message: &str) -> Option<&'static CannedResponse> {
    let text = format!("{} ", message.to_lowercase());
    RESPONSES
        .iter()
        .find(|r| r.keywords.iter().any(|k| text.contains(k)))
}
