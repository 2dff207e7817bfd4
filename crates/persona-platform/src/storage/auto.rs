//! Pick the token store backend.
//!
//! Priority: localStorage → Memory (fallback)

use std::rc::Rc;

use persona_core::ports::TokenStore;
use persona_types::config::{StorageConfig, TokenStoreBackend};

use super::{LocalStorageTokenStore, MemoryTokenStore};

/// Open the best available backend.
/// Returns a trait object so callers are backend-agnostic.
pub fn auto_detect_token_store(key: &str) -> Rc<dyn TokenStore> {
    match LocalStorageTokenStore::open(key) {
        Ok(store) => {
            log::info!("Token store: localStorage (key '{}')", key);
            Rc::new(store)
        }
        Err(e) => {
            log::warn!("localStorage unavailable ({}), falling back to memory", e);
            Rc::new(MemoryTokenStore::new())
        }
    }
}

/// Build the backend named in the config.
pub fn token_store_for(config: &StorageConfig) -> Rc<dyn TokenStore> {
    match config.backend {
        TokenStoreBackend::Auto | TokenStoreBackend::LocalStorage => {
            auto_detect_token_store(&config.token_key)
        }
        TokenStoreBackend::Memory => {
            log::info!("Token store: memory");
            Rc::new(MemoryTokenStore::new())
        }
    }
}
