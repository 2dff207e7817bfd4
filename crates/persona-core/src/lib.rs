//! PersonaScope client core.
//!
//! Owns the session state machine and the chat pipeline. Everything that
//! touches the browser sits behind the traits in [`ports`].

pub mod cancel;
pub mod contact;
pub mod conversation;
pub mod event_bus;
pub mod generator;
pub mod ports;
pub mod session;
pub mod validate;
