//! `window.localStorage` token store.
//! Persistent across page reloads; one string value under a fixed key.

use wasm_bindgen::JsValue;
use web_sys::Storage;

use persona_core::ports::TokenStore;
use persona_types::{PersonaError, Result, session::SessionToken};

pub struct LocalStorageTokenStore {
    storage: Storage,
    key: String,
}

impl LocalStorageTokenStore {
    /// Open the window's localStorage. Fails outside a browser window or
    /// when storage access is blocked.
    pub fn open(key: impl Into<String>) -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| PersonaError::Storage("No window object".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(storage_error)?
            .ok_or_else(|| PersonaError::Storage("localStorage not available".to_string()))?;
        Ok(Self {
            storage,
            key: key.into(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl TokenStore for LocalStorageTokenStore {
    fn load(&self) -> Result<Option<SessionToken>> {
        let value = self.storage.get_item(&self.key).map_err(storage_error)?;
        Ok(value.map(SessionToken::new))
    }

    fn save(&self, token: &SessionToken) -> Result<()> {
        self.storage
            .set_item(&self.key, token.as_str())
            .map_err(storage_error)
    }

    fn clear(&self) -> Result<()> {
        self.storage.remove_item(&self.key).map_err(storage_error)
    }

    fn backend_name(&self) -> &str {
        "localStorage"
    }
}

fn storage_error(e: JsValue) -> PersonaError {
    PersonaError::Storage(format!("{:?}", e))
}
