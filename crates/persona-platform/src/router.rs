//! History-backed `Router`.
//!
//! Pushes the route's path onto `window.history` and forwards the
//! navigation to the event bus so the presentation layer can render it.

use wasm_bindgen::JsValue;

use persona_core::{event_bus::EventBus, ports::Router};
use persona_types::event::Route;

pub struct BrowserRouter {
    bus: EventBus,
}

impl BrowserRouter {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    /// Route for the page currently in the address bar.
    pub fn current() -> Option<Route> {
        let path = web_sys::window()?.location().pathname().ok()?;
        Route::from_path(&path)
    }
}

impl Router for BrowserRouter {
    fn navigate(&self, route: Route) {
        match web_sys::window().map(|w| w.history()) {
            Some(Ok(history)) => {
                if let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(route.path())) {
                    log::warn!("pushState to {} failed: {:?}", route.path(), e);
                }
            }
            _ => log::debug!("No history object; navigation to {} is event-only", route.path()),
        }
        self.bus.navigate(route);
    }
}
