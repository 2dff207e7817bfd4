//! Session store: the client authentication state machine.
//!
//! ```text
//! Unknown ──initialize──▶ Loading ──▶ Authenticated(user) | Anonymous
//! Anonymous | Authenticated ──login/register──▶ Loading ──▶ ...
//! any ──logout──▶ Anonymous
//! ```
//!
//! At most one auth request is in flight; a second caller is rejected with
//! `PersonaError::Busy`. Every completion re-checks the store's epoch and
//! cancel token after its suspension point, so a logout or dispose that
//! happened meanwhile always wins over a late network result.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use persona_types::{
    PersonaError, Result,
    event::{Notice, Route},
    session::{SessionState, SessionToken},
    user::{AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest, User},
};

use crate::cancel::CancelToken;
use crate::ports::{AuthGateway, Notifier, Router, TokenStore};
use crate::validate;

type Listener = Rc<dyn Fn(&SessionState)>;

pub struct SessionStore {
    gateway: Rc<dyn AuthGateway>,
    tokens: Rc<dyn TokenStore>,
    notifier: Rc<dyn Notifier>,
    router: Rc<dyn Router>,
    state: RefCell<SessionState>,
    /// Validated credential backing `Authenticated`
    token: RefCell<Option<SessionToken>>,
    in_flight: Cell<bool>,
    initialized: Cell<bool>,
    /// Bumped by logout; completions from an older epoch are dropped
    epoch: Cell<u64>,
    cancel: CancelToken,
    listeners: RefCell<Vec<Listener>>,
}

/// Credential exchange that ends in a new session.
enum Credentials {
    Login(LoginRequest),
    Register(RegisterRequest),
}

impl Credentials {
    fn failure_title(&self) -> &'static str {
        match self {
            Credentials::Login(_) => "Login failed",
            Credentials::Register(_) => "Registration failed",
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Credentials::Login(req) => validate::validate_login(req),
            Credentials::Register(req) => validate::validate_registration(req),
        }
    }

    fn success_notice(&self, user: &User) -> Notice {
        match self {
            Credentials::Login(_) => {
                Notice::success("Login successful", format!("Welcome back, {}!", user.name))
            }
            Credentials::Register(_) => Notice::success(
                "Registration successful",
                format!("Welcome to PersonaScope, {}!", user.name),
            ),
        }
    }
}

/// Marks an auth request in flight. Dropping it (including when the owning
/// future is dropped mid-await) releases the slot and, if the request never
/// settled, reverts a dangling `Loading` to the prior safe state.
struct Flight<'a> {
    store: &'a SessionStore,
    epoch: u64,
    fallback: SessionState,
    settled: bool,
}

impl Flight<'_> {
    fn settle(&mut self) {
        self.settled = true;
    }
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        self.store.in_flight.set(false);
        if !self.settled
            && !self.store.is_stale(self.epoch)
            && self.store.state.borrow().is_loading()
        {
            log::warn!("Auth request abandoned; reverting to {}", self.fallback.label());
            self.store.transition(self.fallback.clone());
        }
    }
}

impl SessionStore {
    pub fn new(
        gateway: Rc<dyn AuthGateway>,
        tokens: Rc<dyn TokenStore>,
        notifier: Rc<dyn Notifier>,
        router: Rc<dyn Router>,
    ) -> Self {
        Self {
            gateway,
            tokens,
            notifier,
            router,
            state: RefCell::new(SessionState::Unknown),
            token: RefCell::new(None),
            in_flight: Cell::new(false),
            initialized: Cell::new(false),
            epoch: Cell::new(0),
            cancel: CancelToken::new(),
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// True while an auth request is in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    pub fn is_disposed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Register a listener called after every state transition.
    pub fn subscribe(&self, listener: impl Fn(&SessionState) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Restore the session from the persisted token, if any.
    ///
    /// Runs at most once; later calls return the current state untouched.
    pub async fn initialize(&self) -> SessionState {
        if self.initialized.replace(true) {
            log::warn!("Session already initialized");
            return self.state();
        }
        if self.is_disposed() || *self.state.borrow() != SessionState::Unknown {
            return self.state();
        }

        let stored = match self.tokens.load() {
            Ok(token) => token,
            Err(e) => {
                self.transition(SessionState::Anonymous);
                self.report("Session check failed", &e);
                return self.state();
            }
        };
        let token = match stored {
            Some(token) if !token.is_empty() => token,
            Some(_) => {
                let cleared = self.discard_persisted_token();
                self.transition(SessionState::Anonymous);
                if let Err(e) = cleared {
                    self.report("Session check failed", &e);
                }
                return self.state();
            }
            None => {
                log::info!("No persisted session");
                self.transition(SessionState::Anonymous);
                return self.state();
            }
        };

        let mut flight = match self.begin(SessionState::Anonymous) {
            Ok(flight) => flight,
            Err(_) => return self.state(),
        };
        self.transition(SessionState::Loading);

        let result = self.gateway.fetch_profile(&token).await;
        if self.is_stale(flight.epoch) {
            log::debug!("Dropping stale profile fetch");
            flight.settle();
            return self.state();
        }

        match result {
            Ok(user) => {
                log::info!("Session restored for {}", user.email);
                *self.token.borrow_mut() = Some(token);
                flight.settle();
                self.transition(SessionState::Authenticated(user));
            }
            Err(e) => {
                log::warn!("Persisted token rejected: {}", e);
                let cleared = self.discard_persisted_token();
                flight.settle();
                self.transition(SessionState::Anonymous);
                let title = match e {
                    PersonaError::Authentication(_) => "Session expired",
                    _ => "Session check failed",
                };
                self.report(title, &e);
                if let Err(e) = cleared {
                    self.report("Session check failed", &e);
                }
            }
        }
        self.state()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        self.authenticate(Credentials::Login(LoginRequest::new(email, password)))
            .await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        self.authenticate(Credentials::Register(RegisterRequest::new(
            name, email, password,
        )))
        .await
    }

    async fn authenticate(&self, credentials: Credentials) -> Result<User> {
        if self.is_disposed() {
            return Err(PersonaError::Cancelled);
        }
        if let Err(e) = credentials.validate() {
            self.report(credentials.failure_title(), &e);
            return Err(e);
        }

        let fallback = self.safe_state();
        let mut flight = match self.begin(fallback.clone()) {
            Ok(flight) => flight,
            Err(e) => {
                self.report(credentials.failure_title(), &e);
                return Err(e);
            }
        };
        self.transition(SessionState::Loading);

        let result = match &credentials {
            Credentials::Login(req) => self.gateway.login(req).await,
            Credentials::Register(req) => self.gateway.register(req).await,
        };
        if self.is_stale(flight.epoch) {
            log::debug!("Dropping stale auth response");
            flight.settle();
            return Err(PersonaError::Cancelled);
        }

        match result.and_then(|response| self.persist(response)) {
            Ok(user) => {
                flight.settle();
                self.transition(SessionState::Authenticated(user.clone()));
                if self.is_stale(flight.epoch) {
                    log::debug!("Session ended by a listener before login completed");
                    return Err(PersonaError::Cancelled);
                }
                log::info!("Authenticated as {}", user.email);
                self.notifier.notify(credentials.success_notice(&user));
                self.router.navigate(Route::Chat);
                Ok(user)
            }
            Err(e) => {
                flight.settle();
                self.transition(fallback);
                self.report(credentials.failure_title(), &e);
                Err(e)
            }
        }
    }

    /// Write the new token durably before anyone can observe `Authenticated`.
    fn persist(&self, response: AuthResponse) -> Result<User> {
        let (token, user) = response.into_session();
        if token.is_empty() {
            return Err(PersonaError::Server {
                status: 200,
                message: Some("The server did not issue a session token.".to_string()),
            });
        }
        self.tokens.save(&token)?;
        *self.token.borrow_mut() = Some(token);
        Ok(user)
    }

    /// End the session. Safe to call in any state.
    ///
    /// If the persisted token cannot be removed, the in-memory session still
    /// ends but an error notice replaces the success one.
    pub fn logout(&self) {
        self.epoch.set(self.epoch.get() + 1);
        let cleared = self.discard_persisted_token();
        self.token.borrow_mut().take();

        let was_anonymous = *self.state.borrow() == SessionState::Anonymous;
        if !was_anonymous {
            self.transition(SessionState::Anonymous);
            self.router.navigate(Route::Home);
            log::info!("Logged out");
        }
        match cleared {
            Ok(()) => self.notifier.notify(Notice::success(
                "Logged out",
                "You have been successfully logged out.",
            )),
            Err(e) => self.report("Logout failed", &e),
        }
    }

    /// Update profile fields of the authenticated user.
    ///
    /// State stays `Authenticated` while the request runs; the user is only
    /// replaced once the server accepts the change.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User> {
        if self.is_disposed() {
            return Err(PersonaError::Cancelled);
        }
        let token = self.token.borrow().clone();
        let (token, user) = match (token, self.user()) {
            (Some(token), Some(user)) => (token, user),
            _ => {
                let e = PersonaError::NotAuthenticated;
                self.report("Authentication Error", &e);
                return Err(e);
            }
        };
        if let Err(e) = validate::validate_profile_update(&update) {
            self.report("Update Failed", &e);
            return Err(e);
        }

        let mut flight = match self.begin(self.state()) {
            Ok(flight) => flight,
            Err(e) => {
                self.report("Update Failed", &e);
                return Err(e);
            }
        };

        let result = self.gateway.update_profile(&token, &update).await;
        flight.settle();
        if self.is_stale(flight.epoch) {
            log::debug!("Dropping stale profile update");
            return Err(PersonaError::Cancelled);
        }

        match result {
            Ok(accepted) => {
                let merged = user.merged(&accepted);
                self.transition(SessionState::Authenticated(merged.clone()));
                self.notifier.notify(Notice::success(
                    "Profile Updated",
                    "Your profile has been successfully updated.",
                ));
                Ok(merged)
            }
            Err(e) => {
                let description = match &e {
                    PersonaError::Server { message: None, .. } => {
                        "There was an error updating your profile.".to_string()
                    }
                    _ => e.user_message(),
                };
                log::error!("Update Failed: {}", e);
                self.notifier.notify(Notice::error("Update Failed", description));
                Err(e)
            }
        }
    }

    /// Tear the store down. Pending completions are suppressed.
    pub fn dispose(&self) {
        self.cancel.cancel();
        log::debug!("Session store disposed");
    }

    fn begin(&self, fallback: SessionState) -> Result<Flight<'_>> {
        if self.in_flight.replace(true) {
            log::warn!("Rejected auth request: another one is in flight");
            return Err(PersonaError::Busy);
        }
        Ok(Flight {
            store: self,
            epoch: self.epoch.get(),
            fallback,
            settled: false,
        })
    }

    fn is_stale(&self, epoch: u64) -> bool {
        self.cancel.is_cancelled() || self.epoch.get() != epoch
    }

    /// State to return to when a request fails.
    fn safe_state(&self) -> SessionState {
        match &*self.state.borrow() {
            SessionState::Authenticated(user) => SessionState::Authenticated(user.clone()),
            _ => SessionState::Anonymous,
        }
    }

    fn transition(&self, next: SessionState) {
        if self.is_disposed() {
            return;
        }
        log::debug!("Session: {} -> {}", self.state.borrow().label(), next.label());
        *self.state.borrow_mut() = next.clone();
        // Listeners may call back into the store
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            if *self.state.borrow() != next {
                break;
            }
            listener(&next);
        }
    }

    fn discard_persisted_token(&self) -> Result<()> {
        self.tokens.clear().inspect_err(|e| {
            log::warn!("Could not clear persisted token: {}", e);
        })
    }

    fn report(&self, title: &str, error: &PersonaError) {
        log::error!("{}: {}", title, error);
        self.notifier
            .notify(Notice::error(title, error.user_message()));
    }
}
