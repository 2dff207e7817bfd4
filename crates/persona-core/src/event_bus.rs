//! Event bus for decoupled communication between the core and the UI.
//!
//! Single-threaded (WASM constraint), interior mutability via RefCell.
//! Notifications and navigations are buffered and drained by the UI on each
//! frame, so the bus doubles as the core's `Notifier` and `Router`.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use persona_types::event::{Notice, PersonaEvent, Route};

use crate::ports::{Notifier, Router};

/// Shared event bus, clone-cheap via Rc.
#[derive(Clone)]
pub struct EventBus {
    inner: Rc<RefCell<VecDeque<PersonaEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    pub fn emit(&self, event: PersonaEvent) {
        self.inner.borrow_mut().push_back(event);
    }

    /// Drain all pending events. Called by the UI layer each frame.
    pub fn drain(&self) -> Vec<PersonaEvent> {
        self.inner.borrow_mut().drain(..).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().is_empty()
    }

    /// Pending notices, without draining.
    pub fn notices(&self) -> Vec<Notice> {
        self.inner
            .borrow()
            .iter()
            .filter_map(|e| match e {
                PersonaEvent::Notice(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }

    /// Most recent pending navigation, without draining.
    pub fn last_route(&self) -> Option<Route> {
        self.inner.borrow().iter().rev().find_map(|e| match e {
            PersonaEvent::Navigated { route } => Some(*route),
            _ => None,
        })
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for EventBus {
    fn notify(&self, notice: Notice) {
        self.emit(PersonaEvent::Notice(notice));
    }
}

impl Router for EventBus {
    fn navigate(&self, route: Route) {
        self.emit(PersonaEvent::Navigated { route });
    }
}
