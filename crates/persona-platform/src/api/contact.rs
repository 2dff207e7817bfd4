use async_trait::async_trait;
use gloo_net::http::Request;

use persona_core::ports::ContactGateway;
use persona_types::{
    PersonaError, Result,
    config::{ApiConfig, CONTACT_PATH},
    error::AuthOperation,
    user::ContactForm,
};

use super::{failure, network_error};

/// `POST /api/contact`
pub struct HttpContactGateway {
    api: ApiConfig,
}

impl HttpContactGateway {
    pub fn new(api: ApiConfig) -> Self {
        Self { api }
    }
}

#[async_trait(?Send)]
impl ContactGateway for HttpContactGateway {
    async fn submit(&self, form: &ContactForm) -> Result<()> {
        let response = Request::post(&self.api.endpoint(CONTACT_PATH))
            .header("Content-Type", "application/json")
            .json(form)
            .map_err(|e| PersonaError::Serialization(e.to_string()))?
            .send()
            .await
            .map_err(network_error)?;

        if !response.ok() {
            return Err(failure(AuthOperation::Contact, response).await);
        }
        log::info!("Contact form delivered");
        Ok(())
    }
}
