//! Browser timer adapter for the `Scheduler` port.

use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;

use persona_core::{cancel::CancelToken, ports::Scheduler};

/// Longest single wait; cancellation is noticed between slices.
const SLICE_MS: u32 = 100;

#[derive(Default)]
pub struct TimerScheduler;

impl TimerScheduler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl Scheduler for TimerScheduler {
    async fn delay(&self, ms: u32, cancel: &CancelToken) -> bool {
        let mut remaining = ms;
        while remaining > 0 {
            if cancel.is_cancelled() {
                return false;
            }
            let step = remaining.min(SLICE_MS);
            TimeoutFuture::new(step).await;
            remaining -= step;
        }
        !cancel.is_cancelled()
    }
}
