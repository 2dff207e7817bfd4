use thiserror::Error;

/// Backend operation a failed response belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOperation {
    FetchProfile,
    Login,
    Register,
    UpdateProfile,
    Contact,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersonaError {
    /// Rejected before any request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: HTTP {status}")]
    Server { status: u16, message: Option<String> },

    #[error("Another authentication request is in progress")]
    Busy,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

impl PersonaError {
    /// Classify a non-2xx response.
    pub fn from_status(op: AuthOperation, status: u16, message: Option<String>) -> Self {
        let server_error = status >= 500 || status < 400;
        match op {
            AuthOperation::Login if !server_error => PersonaError::Authentication(
                message.unwrap_or_else(|| "Authentication failed".to_string()),
            ),
            AuthOperation::Register if !server_error => PersonaError::Validation(
                message.unwrap_or_else(|| "Registration failed".to_string()),
            ),
            AuthOperation::FetchProfile if status == 401 || status == 403 => {
                PersonaError::Authentication(
                    message.unwrap_or_else(|| "Your session has expired".to_string()),
                )
            }
            _ => PersonaError::Server { status, message },
        }
    }

    /// Description shown to the user in a notification.
    pub fn user_message(&self) -> String {
        match self {
            PersonaError::Validation(m)
            | PersonaError::Authentication(m)
            | PersonaError::Other(m) => m.clone(),
            PersonaError::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            PersonaError::Server { message: Some(m), .. } => m.clone(),
            PersonaError::Server { status, message: None } => {
                format!("The server returned an error (HTTP {}). Please try again.", status)
            }
            PersonaError::Busy => "Please wait for the current request to finish.".to_string(),
            PersonaError::NotAuthenticated => {
                "You need to be logged in to update your profile".to_string()
            }
            PersonaError::Storage(_) => {
                "Could not access your saved session on this device.".to_string()
            }
            PersonaError::Serialization(_) => {
                "The server sent an unexpected response.".to_string()
            }
            PersonaError::Cancelled => "The request was cancelled.".to_string(),
        }
    }
}

impl From<serde_json::Error> for PersonaError {
    fn from(e: serde_json::Error) -> Self {
        PersonaError::Serialization(e.to_string())
    }
}
