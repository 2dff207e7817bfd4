//! Port traits at the hexagonal architecture boundary.
//!
//! These traits are defined here in `persona-core` (pure Rust).
//! Implementations live in `persona-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use async_trait::async_trait;
use persona_types::{
    Result,
    event::{Notice, Route},
    message::Message,
    session::SessionToken,
    user::{AuthResponse, ContactForm, LoginRequest, ProfileUpdate, RegisterRequest, User},
};

use crate::cancel::CancelToken;

// ─── Auth Gateway Port ───────────────────────────────────────

/// Stateless adapter over the backend's auth endpoints.
///
/// Expected failures come back as classified `PersonaError`s, never panics.
#[async_trait(?Send)]
pub trait AuthGateway {
    /// `GET /api/user/profile`
    async fn fetch_profile(&self, token: &SessionToken) -> Result<User>;

    /// `POST /api/auth/login`
    async fn login(&self, req: &LoginRequest) -> Result<AuthResponse>;

    /// `POST /api/auth/register`
    async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse>;

    /// `PUT /api/user/update`. Returns the fields the server accepted
    async fn update_profile(
        &self,
        token: &SessionToken,
        update: &ProfileUpdate,
    ) -> Result<ProfileUpdate>;
}

// ─── Contact Port ────────────────────────────────────────────

#[async_trait(?Send)]
pub trait ContactGateway {
    /// `POST /api/contact`
    async fn submit(&self, form: &ContactForm) -> Result<()>;
}

// ─── Token Store Port ────────────────────────────────────────

/// Durable single-key credential store. Last write wins.
///
/// Synchronous because the browser's localStorage is, which lets logout
/// clear the token without a suspension point.
pub trait TokenStore {
    fn load(&self) -> Result<Option<SessionToken>>;

    fn save(&self, token: &SessionToken) -> Result<()>;

    fn clear(&self) -> Result<()>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Notification / Navigation Ports ─────────────────────────

pub trait Notifier {
    fn notify(&self, notice: Notice);
}

pub trait Router {
    fn navigate(&self, route: Route);
}

// ─── Generation Ports ────────────────────────────────────────

/// Produces the next assistant reply from the conversation so far.
///
/// The simulated catalog implementation and a real inference backend share
/// this boundary: history in, text out, asynchronously.
#[async_trait(?Send)]
pub trait ResponseGenerator {
    async fn generate(&self, history: &[Message], cancel: &CancelToken) -> Result<String>;
}

/// Timer capability.
#[async_trait(?Send)]
pub trait Scheduler {
    /// Wait `ms` milliseconds. Returns `false` if `cancel` fired meanwhile.
    async fn delay(&self, ms: u32, cancel: &CancelToken) -> bool;
}
