//! REST adapters for the PersonaScope backend.

pub mod auth;
pub mod contact;

pub use auth::HttpAuthGateway;
pub use contact::HttpContactGateway;

use gloo_net::http::Response;
use serde::Deserialize;

use persona_types::{PersonaError, error::AuthOperation};

/// Error payload the backend sends alongside non-2xx statuses.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Pull a human-readable `message` out of an error body, if there is one.
pub(crate) fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

pub(crate) fn network_error(e: gloo_net::Error) -> PersonaError {
    PersonaError::Network(e.to_string())
}

/// Turn a non-2xx response into a classified error.
pub(crate) async fn failure(op: AuthOperation, response: Response) -> PersonaError {
    let status = response.status();
    let message = match response.text().await {
        Ok(body) => error_message(&body),
        Err(_) => None,
    };
    log::warn!("{:?} failed with HTTP {}", op, status);
    PersonaError::from_status(op, status, message)
}
