pub mod memory;
pub mod local;
pub mod auto;

pub use memory::MemoryTokenStore;
pub use local::LocalStorageTokenStore;
pub use auto::{auto_detect_token_store, token_store_for};
