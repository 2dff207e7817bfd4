//! Browser adapters for the persona-core ports.
//!
//! HTTP gateways use `fetch()` via gloo-net, the token store sits on
//! `window.localStorage`, navigation goes through `window.history`, and
//! timers and task spawning run on the browser event loop.

pub mod api;
pub mod router;
pub mod scheduler;
pub mod spawn;
pub mod storage;

pub use api::{HttpAuthGateway, HttpContactGateway};
pub use router::BrowserRouter;
pub use scheduler::TimerScheduler;
pub use spawn::WasmSpawner;
