use std::fmt;

use serde::{Deserialize, Serialize};

use crate::user::User;

/// Opaque bearer credential issued by the backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

// Never print the credential itself.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken(<{} chars>)", self.0.len())
    }
}

/// Client authentication status.
///
/// `Authenticated` is only ever entered after the token backing it has been
/// validated by the backend and written to the token store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "user", rename_all = "lowercase")]
pub enum SessionState {
    /// Persisted token not yet checked
    #[default]
    Unknown,
    /// An auth operation is in flight
    Loading,
    Anonymous,
    Authenticated(User),
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn label(&self) -> &str {
        match self {
            SessionState::Unknown => "unknown",
            SessionState::Loading => "loading",
            SessionState::Anonymous => "anonymous",
            SessionState::Authenticated(_) => "authenticated",
        }
    }
}
