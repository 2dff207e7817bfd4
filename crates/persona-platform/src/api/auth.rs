//! Auth adapter over the backend's `/api/auth` and `/api/user` routes.
//!
//! Stateless: the caller passes the token for authenticated requests.
//! Uses browser `fetch()` via gloo-net for WASM compatibility.

use async_trait::async_trait;
use gloo_net::http::Request;

use persona_core::ports::AuthGateway;
use persona_types::{
    PersonaError, Result,
    config::{ApiConfig, LOGIN_PATH, PROFILE_PATH, REGISTER_PATH, UPDATE_PROFILE_PATH},
    error::AuthOperation,
    session::SessionToken,
    user::{AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest, User},
};

use super::{failure, network_error};

pub struct HttpAuthGateway {
    api: ApiConfig,
}

impl HttpAuthGateway {
    pub fn new(api: ApiConfig) -> Self {
        Self { api }
    }

    async fn credentials<T: serde::Serialize>(
        &self,
        op: AuthOperation,
        path: &str,
        body: &T,
    ) -> Result<AuthResponse> {
        let response = Request::post(&self.api.endpoint(path))
            .header("Content-Type", "application/json")
            .json(body)
            .map_err(|e| PersonaError::Serialization(e.to_string()))?
            .send()
            .await
            .map_err(network_error)?;

        if !response.ok() {
            return Err(failure(op, response).await);
        }

        response
            .json::<AuthResponse>()
            .await
            .map_err(|e| PersonaError::Serialization(e.to_string()))
    }
}

#[async_trait(?Send)]
impl AuthGateway for HttpAuthGateway {
    async fn fetch_profile(&self, token: &SessionToken) -> Result<User> {
        let response = Request::get(&self.api.endpoint(PROFILE_PATH))
            .header("Authorization", &token.bearer())
            .send()
            .await
            .map_err(network_error)?;

        if !response.ok() {
            return Err(failure(AuthOperation::FetchProfile, response).await);
        }

        response
            .json::<User>()
            .await
            .map_err(|e| PersonaError::Serialization(e.to_string()))
    }

    async fn login(&self, req: &LoginRequest) -> Result<AuthResponse> {
        self.credentials(AuthOperation::Login, LOGIN_PATH, req).await
    }

    async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse> {
        self.credentials(AuthOperation::Register, REGISTER_PATH, req)
            .await
    }

    async fn update_profile(
        &self,
        token: &SessionToken,
        update: &ProfileUpdate,
    ) -> Result<ProfileUpdate> {
        let response = Request::put(&self.api.endpoint(UPDATE_PROFILE_PATH))
            .header("Content-Type", "application/json")
            .header("Authorization", &token.bearer())
            .json(update)
            .map_err(|e| PersonaError::Serialization(e.to_string()))?
            .send()
            .await
            .map_err(network_error)?;

        if !response.ok() {
            return Err(failure(AuthOperation::UpdateProfile, response).await);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                log::debug!("Could not read update response body ({}); using submitted fields", e);
                String::new()
            }
        };
        Ok(accepted_fields(&body, update))
    }
}

/// Fields the server reports as saved. Falls back to what was submitted
/// when the body is empty or carries no profile fields.
pub(crate) fn accepted_fields(body: &str, submitted: &ProfileUpdate) -> ProfileUpdate {
    if body.trim().is_empty() {
        return submitted.clone();
    }
    match serde_json::from_str::<ProfileUpdate>(body) {
        Ok(echoed) if !echoed.is_empty() => echoed,
        Ok(_) => submitted.clone(),
        Err(e) => {
            log::debug!("Unparseable update response ({}); using submitted fields", e);
            submitted.clone()
        }
    }
}
