use serde::{Deserialize, Serialize};

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A toast shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level: NoticeLevel::Info,
        }
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level: NoticeLevel::Success,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level: NoticeLevel::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Pages of the product the client can navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Home,
    About,
    Features,
    Contact,
    Login,
    Signup,
    Chat,
    Profile,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::About => "/about",
            Route::Features => "/features",
            Route::Contact => "/contact",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Chat => "/chat",
            Route::Profile => "/profile",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        let path = if trimmed.is_empty() { "/" } else { trimmed };
        Self::all().iter().copied().find(|r| r.path() == path)
    }

    pub fn all() -> &'static [Route] {
        &[
            Route::Home,
            Route::About,
            Route::Features,
            Route::Contact,
            Route::Login,
            Route::Signup,
            Route::Chat,
            Route::Profile,
        ]
    }

    /// Pages that require an authenticated session
    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Chat | Route::Profile)
    }
}

/// Events emitted by the core for the presentation layer.
/// The UI drains these once per frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PersonaEvent {
    Notice(Notice),
    Navigated { route: Route },
}
