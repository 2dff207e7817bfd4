//! `PersonaClient`: the JavaScript-facing facade.
//!
//! One instance per page. It owns the session store, the event bus and the
//! conversation of the chat view that is currently open. Async operations
//! return Promises; everything else is synchronous. Views poll
//! `drainEvents()` for notices and navigations.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_utils::format::JsValueSerdeExt;
use js_sys::Promise;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use persona_core::contact;
use persona_core::conversation::ConversationEngine;
use persona_core::event_bus::EventBus;
use persona_core::generator::CatalogGenerator;
use persona_core::ports::{ContactGateway, ResponseGenerator, Router};
use persona_core::session::SessionStore;
use persona_platform::storage::token_store_for;
use persona_platform::{
    BrowserRouter, HttpAuthGateway, HttpContactGateway, TimerScheduler, WasmSpawner,
};
use persona_types::{
    PersonaError,
    config::{ClientConfig, DEFAULT_GREETING},
    event::Route,
    session::SessionState,
    user::{ContactForm, ProfileUpdate},
};

#[wasm_bindgen]
pub struct PersonaClient {
    config: ClientConfig,
    bus: EventBus,
    router: Rc<BrowserRouter>,
    session: Rc<SessionStore>,
    contact: Rc<dyn ContactGateway>,
    generator: Rc<dyn ResponseGenerator>,
    chat: RefCell<Option<ConversationEngine>>,
}

#[wasm_bindgen]
impl PersonaClient {
    /// `new PersonaClient(configJson?)`. Missing config fields take defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PersonaClient, JsValue> {
        let config = match config_json.as_deref() {
            Some(json) if !json.trim().is_empty() => {
                ClientConfig::from_json(json).map_err(to_js_error)?
            }
            _ => ClientConfig::default(),
        };
        log::info!("API base: {}", config.api.base_url);

        let bus = EventBus::new();
        let router = Rc::new(BrowserRouter::new(bus.clone()));
        let tokens = token_store_for(&config.storage);
        let session = Rc::new(SessionStore::new(
            Rc::new(HttpAuthGateway::new(config.api.clone())),
            tokens,
            Rc::new(bus.clone()),
            router.clone(),
        ));
        let generator = Rc::new(CatalogGenerator::new(
            Rc::new(TimerScheduler::new()),
            config.chat.reply_delay_ms,
        ));

        Ok(Self {
            contact: Rc::new(HttpContactGateway::new(config.api.clone())),
            config,
            bus,
            router,
            session,
            generator,
            chat: RefCell::new(None),
        })
    }

    // ─── Session ─────────────────────────────────────────────

    /// Check the persisted token. Resolves to the resulting session state.
    pub fn initialize(&self) -> Promise {
        let session = self.session.clone();
        future_to_promise(async move {
            let state = session.initialize().await;
            to_js(&state)
        })
    }

    /// Resolves to the signed-in user; rejects with an `Error` on failure.
    pub fn login(&self, email: String, password: String) -> Promise {
        let session = self.session.clone();
        future_to_promise(async move {
            let user = session
                .login(&email, &password)
                .await
                .map_err(to_js_error)?;
            to_js(&user)
        })
    }

    pub fn register(&self, name: String, email: String, password: String) -> Promise {
        let session = self.session.clone();
        future_to_promise(async move {
            let user = session
                .register(&name, &email, &password)
                .await
                .map_err(to_js_error)?;
            to_js(&user)
        })
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    /// `update` is a partial profile object (`{ name, occupation, ... }`).
    #[wasm_bindgen(js_name = updateProfile)]
    pub fn update_profile(&self, update: JsValue) -> Promise {
        let session = self.session.clone();
        future_to_promise(async move {
            let update: ProfileUpdate = update
                .into_serde()
                .map_err(|e| to_js_error(PersonaError::Serialization(e.to_string())))?;
            let user = session.update_profile(update).await.map_err(to_js_error)?;
            to_js(&user)
        })
    }

    /// Current session state as `{ status, user? }`.
    pub fn session(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.state())
    }

    #[wasm_bindgen(js_name = isBusy)]
    pub fn is_busy(&self) -> bool {
        self.session.is_busy()
    }

    // ─── Navigation ──────────────────────────────────────────

    /// Navigate to `path`. Pages that need a session redirect to the login
    /// page once the session is known to be anonymous. Returns the path
    /// actually navigated to.
    pub fn navigate(&self, path: &str) -> Result<String, JsValue> {
        let route = Route::from_path(path)
            .ok_or_else(|| to_js_error(PersonaError::Other(format!("Unknown page: {}", path))))?;
        let state = self.session.state();
        let settled = !matches!(state, SessionState::Unknown | SessionState::Loading);
        let target = if route.requires_auth() && settled && !state.is_authenticated() {
            log::info!("{} requires a session; redirecting to login", route.path());
            Route::Login
        } else {
            route
        };
        self.router.navigate(target);
        Ok(target.path().to_string())
    }

    #[wasm_bindgen(js_name = currentRoute)]
    pub fn current_route(&self) -> Option<String> {
        BrowserRouter::current().map(|r| r.path().to_string())
    }

    // ─── Chat ────────────────────────────────────────────────

    /// Mount the chat view with a fresh conversation. Any previous
    /// conversation is torn down first.
    #[wasm_bindgen(js_name = openChat)]
    pub fn open_chat(&self) {
        let chat = self.config.chat.clone();
        let chat = if chat.greeting.is_some() {
            chat
        } else {
            chat.with_greeting(DEFAULT_GREETING)
        };
        let engine = ConversationEngine::new(&chat, self.generator.clone(), Rc::new(WasmSpawner));
        if let Some(previous) = self.chat.borrow_mut().replace(engine) {
            previous.teardown();
        }
    }

    #[wasm_bindgen(js_name = closeChat)]
    pub fn close_chat(&self) {
        if let Some(engine) = self.chat.borrow_mut().take() {
            engine.teardown();
        }
    }

    /// Returns `false` if the text was blank or no chat is open.
    #[wasm_bindgen(js_name = sendMessage)]
    pub fn send_message(&self, text: &str) -> bool {
        match self.chat.borrow().as_ref() {
            Some(engine) => engine.send_message(text).is_some(),
            None => {
                log::warn!("sendMessage called with no open chat");
                false
            }
        }
    }

    /// `{ messages, awaitingResponse, pendingReplies }`, or `null` when no
    /// chat is open.
    pub fn conversation(&self) -> Result<JsValue, JsValue> {
        match self.chat.borrow().as_ref() {
            Some(engine) => to_js(&engine.snapshot()),
            None => Ok(JsValue::NULL),
        }
    }

    // ─── Contact ─────────────────────────────────────────────

    #[wasm_bindgen(js_name = submitContact)]
    pub fn submit_contact(&self, form: JsValue) -> Promise {
        let gateway = self.contact.clone();
        let bus = self.bus.clone();
        future_to_promise(async move {
            let form: ContactForm = form
                .into_serde()
                .map_err(|e| to_js_error(PersonaError::Serialization(e.to_string())))?;
            contact::submit_contact(gateway.as_ref(), &bus, &form)
                .await
                .map_err(to_js_error)?;
            Ok(JsValue::TRUE)
        })
    }

    // ─── Events / lifecycle ──────────────────────────────────

    /// Pending notices and navigations since the last call.
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&self) -> Result<JsValue, JsValue> {
        to_js(&self.bus.drain())
    }

    /// Tear everything down; pending completions are dropped.
    pub fn dispose(&self) {
        self.close_chat();
        self.session.dispose();
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    JsValue::from_serde(value).map_err(|e| to_js_error(PersonaError::Serialization(e.to_string())))
}

/// Rejection value: a JS `Error` carrying the user-facing message, with the
/// failure class in `name`.
fn to_js_error(e: PersonaError) -> JsValue {
    let error = js_sys::Error::new(&e.user_message());
    error.set_name(error_kind(&e));
    error.into()
}

fn error_kind(e: &PersonaError) -> &'static str {
    match e {
        PersonaError::Validation(_) => "ValidationError",
        PersonaError::Authentication(_) | PersonaError::NotAuthenticated => "AuthenticationError",
        PersonaError::Network(_) => "NetworkError",
        PersonaError::Server { .. } => "ServerError",
        PersonaError::Busy => "BusyError",
        PersonaError::Cancelled => "CancelledError",
        PersonaError::Storage(_) | PersonaError::Serialization(_) | PersonaError::Other(_) => {
            "PersonaError"
        }
    }
}
