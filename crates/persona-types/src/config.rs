use serde::{Deserialize, Serialize};

/// Top-level client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub chat: ChatConfig,
}

impl ClientConfig {
    /// Parse a (possibly partial) JSON config; missing fields take defaults.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

pub const PROFILE_PATH: &str = "/api/user/profile";
pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const UPDATE_PROFILE_PATH: &str = "/api/user/update";
pub const CONTACT_PATH: &str = "/api/contact";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: TokenStoreBackend,
    /// Durable key holding the session token
    pub token_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: TokenStoreBackend::Auto,
            token_key: "token".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStoreBackend {
    /// localStorage when available, memory otherwise
    Auto,
    Memory,
    LocalStorage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Assistant message seeded when the chat view mounts
    pub greeting: Option<String>,
    /// Simulated think time before a generated reply
    pub reply_delay_ms: u32,
    /// Used when the generator fails or returns nothing
    pub fallback_reply: String,
}

impl ChatConfig {
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = Some(greeting.into());
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: None,
            reply_delay_ms: 1500,
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_string(),
        }
    }
}

pub const DEFAULT_GREETING: &str = "Hi there! I'm PersonaScope, your AI personality analysis assistant. \
Start chatting with me, and I'll analyze your communication style to provide insights about your \
personality traits. How are you feeling today?";

const DEFAULT_FALLBACK_REPLY: &str =
    "Thanks for sharing. Tell me a little more so I can get a clearer picture of your style.";
