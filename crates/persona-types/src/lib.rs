pub mod user;
pub mod session;
pub mod message;
pub mod event;
pub mod config;
pub mod error;

#[cfg(test)]
mod tests;

pub use error::PersonaError;
pub type Result<T> = std::result::Result<T, PersonaError>;
