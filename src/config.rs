//! Runtime configuration read from environment variables.
//!
//! Every setting has a development default so the server boots with an empty
//! environment and serves the bundled mock content.

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// Site-wide settings.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub environment: String,
    pub site_url: String,
    pub site_title: String,
    pub site_description: String,
    /// Serve bundled JSON even when a database is configured.
    pub use_mock_data: bool,
    /// Shared secret for the owner inbox endpoints.
    pub admin_api_key: Option<String>,
    pub owner_email: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            environment: env_string("ENVIRONMENT", "development"),
            site_url: env_string("SITE_URL", "http://localhost:3000"),
            site_title: env_string("SITE_TITLE", "Studio Journal"),
            site_description: env_string(
                "SITE_DESCRIPTION",
                "Notes on branding, logo and web design",
            ),
            use_mock_data: env_flag("USE_MOCK_DATA"),
            admin_api_key: env_optional("ADMIN_API_KEY"),
            owner_email: env_optional("OWNER_EMAIL"),
        }
    }
}

impl SiteConfig {
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Credentials and endpoints for outbound integrations. A `None` field means
/// the integration is switched off.
#[derive(Debug, Clone)]
pub struct IntegrationConfig {
    pub email_api_url: String,
    pub email_api_key: Option<String>,
    pub email_from: String,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub whatsapp_api_url: Option<String>,
    pub whatsapp_api_token: Option<String>,
    pub whatsapp_to: Option<String>,
    pub enrichment_api_url: Option<String>,
    pub enrichment_api_key: Option<String>,
    pub ai_api_url: String,
    pub ai_api_key: Option<String>,
    pub ai_model: String,
    pub request_timeout_secs: u64,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            email_api_url: env_string("EMAIL_API_URL", "https://api.resend.com/emails"),
            email_api_key: env_optional("EMAIL_API_KEY"),
            email_from: env_string("EMAIL_FROM", "Studio <no-reply@example.com>"),
            telegram_bot_token: env_optional("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: env_optional("TELEGRAM_CHAT_ID"),
            whatsapp_api_url: env_optional("WHATSAPP_API_URL"),
            whatsapp_api_token: env_optional("WHATSAPP_API_TOKEN"),
            whatsapp_to: env_optional("WHATSAPP_TO"),
            enrichment_api_url: env_optional("ENRICHMENT_API_URL"),
            enrichment_api_key: env_optional("ENRICHMENT_API_KEY"),
            ai_api_url: env_string("AI_API_URL", "https://api.openai.com/v1/chat/completions"),
            ai_api_key: env_optional("AI_API_KEY"),
            ai_model: env_string("AI_MODEL", "gpt-4o-mini"),
            request_timeout_secs: std::env::var("INTEGRATION_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        }
    }
}

impl IntegrationConfig {
    pub fn email_enabled(&self) -> bool {
        self.email_api_key.is_some()
    }

    pub fn telegram_enabled(&self) -> bool {
        self.telegram_bot_token.is_some() && self.telegram_chat_id.is_some()
    }

    pub fn whatsapp_enabled(&self) -> bool {
        self.whatsapp_api_url.is_some() && self.whatsapp_to.is_some()
    }

    pub fn enrichment_enabled(&self) -> bool {
        self.enrichment_api_url.is_some()
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai_api_key.is_some()
    }
}

lazy_static::lazy_static! {
    pub static ref SITE: SiteConfig = SiteConfig::default();
    pub static ref INTEGRATIONS: IntegrationConfig = IntegrationConfig::default();
}
