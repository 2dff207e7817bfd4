//! WASM-target tests for the PersonaClient facade (Node.js runtime).
//!
//! Uses the in-memory token store; no request reaches the network.

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

use gloo_utils::format::JsValueSerdeExt;
use persona_app::PersonaClient;
use persona_types::event::{PersonaEvent, Route};
use persona_types::message::{ConversationState, Sender};
use persona_types::session::SessionState;

const MEMORY_CONFIG: &str = r#"{"storage":{"backend":"Memory"},"chat":{"reply_delay_ms":0}}"#;

fn client() -> PersonaClient {
    PersonaClient::new(Some(MEMORY_CONFIG.to_string())).unwrap()
}

fn session(client: &PersonaClient) -> SessionState {
    client.session().unwrap().into_serde().unwrap()
}

fn events(client: &PersonaClient) -> Vec<PersonaEvent> {
    client.drain_events().unwrap().into_serde().unwrap()
}

// ─── Construction Tests ──────────────────────────────────

#[wasm_bindgen_test]
fn default_config_accepted() {
    assert!(PersonaClient::new(None).is_ok());
    assert!(PersonaClient::new(Some(String::new())).is_ok());
}

#[wasm_bindgen_test]
fn malformed_config_rejected() {
    assert!(PersonaClient::new(Some("{not json".to_string())).is_err());
}

// ─── Session Tests ───────────────────────────────────────

#[wasm_bindgen_test]
async fn initialize_without_token_is_anonymous() {
    let client = client();
    assert_eq!(session(&client), SessionState::Unknown);

    let state = JsFuture::from(client.initialize()).await.unwrap();
    let state: SessionState = state.into_serde().unwrap();
    assert_eq!(state, SessionState::Anonymous);
    assert!(!client.is_busy());
}

#[wasm_bindgen_test]
async fn invalid_login_rejects_without_request() {
    let client = client();
    JsFuture::from(client.initialize()).await.unwrap();

    let err = JsFuture::from(client.login("not-an-email".to_string(), "secret1".to_string()))
        .await
        .unwrap_err();
    let err: js_sys::Error = wasm_bindgen::JsCast::dyn_into(err).unwrap();
    assert_eq!(String::from(err.name()), "ValidationError");
    assert_eq!(session(&client), SessionState::Anonymous);

    let events = events(&client);
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], PersonaEvent::Notice(n) if n.title == "Login failed"));
}

#[wasm_bindgen_test]
async fn logout_notifies_once() {
    let client = client();
    JsFuture::from(client.initialize()).await.unwrap();
    client.logout();
    assert_eq!(session(&client), SessionState::Anonymous);
    assert_eq!(events(&client).len(), 1);
}

// ─── Navigation Tests ────────────────────────────────────

#[wasm_bindgen_test]
async fn protected_page_redirects_when_anonymous() {
    let client = client();
    JsFuture::from(client.initialize()).await.unwrap();

    assert_eq!(client.navigate("/profile").unwrap(), "/login");
    assert_eq!(client.navigate("/about").unwrap(), "/about");
    let events = events(&client);
    assert!(matches!(events[0], PersonaEvent::Navigated { route: Route::Login }));
    assert!(client.navigate("/missing").is_err());
}

// ─── Chat Tests ──────────────────────────────────────────

#[wasm_bindgen_test]
fn chat_requires_open_view() {
    let client = client();
    assert!(!client.send_message("Hello"));
    assert_eq!(client.conversation().unwrap(), JsValue::NULL);
}

#[wasm_bindgen_test]
async fn chat_greets_and_replies() {
    let client = client();
    client.open_chat();
    assert!(!client.send_message("   "));
    assert!(client.send_message("Hello"));

    let state: ConversationState = client.conversation().unwrap().into_serde().unwrap();
    assert_eq!(state.messages.len(), 2);
    assert_eq!(state.messages[0].sender, Sender::Assistant);
    assert!(state.awaiting_response);

    gloo_timers::future::TimeoutFuture::new(50).await;
    let state: ConversationState = client.conversation().unwrap().into_serde().unwrap();
    assert_eq!(state.messages.len(), 3);
    assert_eq!(state.messages[2].sender, Sender::Assistant);
    assert!(!state.awaiting_response);
}

#[wasm_bindgen_test]
async fn closed_chat_drops_pending_reply() {
    let client = client();
    client.open_chat();
    assert!(client.send_message("Hello"));
    client.close_chat();
    gloo_timers::future::TimeoutFuture::new(50).await;
    assert_eq!(client.conversation().unwrap(), JsValue::NULL);
}
