//! WASM-target tests for persona-platform (Node.js runtime).
//!
//! Tests MemoryTokenStore, token store selection and TimerScheduler under
//! wasm32-unknown-unknown via `wasm-pack test --node`.
//!
//! localStorage and fetch need a browser; under Node the auto-detection
//! path falls back to memory, which is what these tests pin down.

use wasm_bindgen_test::*;

use persona_core::cancel::CancelToken;
use persona_core::ports::{Scheduler, TokenStore};
use persona_platform::storage::{auto_detect_token_store, token_store_for, MemoryTokenStore};
use persona_platform::TimerScheduler;
use persona_types::config::{StorageConfig, TokenStoreBackend};
use persona_types::session::SessionToken;

// ─── MemoryTokenStore Tests ──────────────────────────────

#[wasm_bindgen_test]
fn memory_store_backend_name() {
    assert_eq!(MemoryTokenStore::new().backend_name(), "memory");
}

#[wasm_bindgen_test]
fn memory_store_save_load_clear() {
    let store = MemoryTokenStore::new();
    store.save(&SessionToken::new("t1")).unwrap();
    assert_eq!(store.load().unwrap().unwrap().as_str(), "t1");
    store.clear().unwrap();
    assert!(store.load().unwrap().is_none());
}

// ─── Backend Selection Tests ─────────────────────────────

#[wasm_bindgen_test]
fn auto_detect_without_window_uses_memory() {
    let store = auto_detect_token_store("token");
    assert_eq!(store.backend_name(), "memory");
}

#[wasm_bindgen_test]
fn explicit_memory_backend() {
    let config = StorageConfig {
        backend: TokenStoreBackend::Memory,
        ..StorageConfig::default()
    };
    let store = token_store_for(&config);
    assert_eq!(store.backend_name(), "memory");
    store.save(&SessionToken::new("t1")).unwrap();
    assert!(store.load().unwrap().is_some());
}

// ─── TimerScheduler Tests ────────────────────────────────

#[wasm_bindgen_test]
async fn timer_delay_completes() {
    let scheduler = TimerScheduler::new();
    assert!(scheduler.delay(10, &CancelToken::new()).await);
}

#[wasm_bindgen_test]
async fn timer_delay_cancelled() {
    let scheduler = TimerScheduler::new();
    let cancel = CancelToken::new();
    cancel.cancel();
    assert!(!scheduler.delay(10, &cancel).await);
}
