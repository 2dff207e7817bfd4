//! In-memory token store.
//! Used where localStorage is unavailable; the session ends with the page.

use std::cell::RefCell;

use persona_core::ports::TokenStore;
use persona_types::{Result, session::SessionToken};

#[derive(Default)]
pub struct MemoryTokenStore {
    token: RefCell<Option<SessionToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SessionToken>> {
        Ok(self.token.borrow().clone())
    }

    fn save(&self, token: &SessionToken) -> Result<()> {
        *self.token.borrow_mut() = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.token.borrow_mut().take();
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
