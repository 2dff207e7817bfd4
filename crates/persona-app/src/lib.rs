//! PersonaScope App — WASM entry point.
//!
//! This crate is the composition root (DI wiring layer).
//! It assembles the platform adapters and hands them to the core behind
//! the `PersonaClient` class the JavaScript views call into.

mod client;

pub use client::PersonaClient;

use wasm_bindgen::prelude::*;

/// WASM entry point, run once when the module is instantiated
#[wasm_bindgen(start)]
pub fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("PersonaScope WASM starting...");
}
