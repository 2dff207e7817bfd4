//! Simulated personality-insight replies.
//!
//! Picks an observation from a fixed catalog after a think delay. Swap in a
//! real inference backend by implementing `ResponseGenerator` instead.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use persona_types::{PersonaError, Result, message::Message};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cancel::CancelToken;
use crate::ports::{ResponseGenerator, Scheduler};

pub const INSIGHT_CATALOG: &[&str] = &[
    "I notice you use descriptive language. This suggests you might have strong visualization abilities and creativity.",
    "Interesting choice of words. Your communication style indicates you may be analytical and detail-oriented.",
    "Your message length and structure suggest you're thoughtful and deliberate in your communication.",
    "I detect a pattern in your writing that's often associated with extroverted personality types.",
    "The way you express yourself indicates strong emotional intelligence and empathy.",
    "Your communication style suggests you're pragmatic and solution-oriented.",
];

pub struct CatalogGenerator {
    scheduler: Rc<dyn Scheduler>,
    delay_ms: u32,
    catalog: Vec<String>,
    rng: RefCell<StdRng>,
}

impl CatalogGenerator {
    pub fn new(scheduler: Rc<dyn Scheduler>, delay_ms: u32) -> Self {
        Self::with_rng(scheduler, delay_ms, StdRng::from_entropy())
    }

    /// Deterministic picks, for tests.
    pub fn seeded(scheduler: Rc<dyn Scheduler>, delay_ms: u32, seed: u64) -> Self {
        Self::with_rng(scheduler, delay_ms, StdRng::seed_from_u64(seed))
    }

    fn with_rng(scheduler: Rc<dyn Scheduler>, delay_ms: u32, rng: StdRng) -> Self {
        Self {
            scheduler,
            delay_ms,
            catalog: INSIGHT_CATALOG.iter().map(|s| s.to_string()).collect(),
            rng: RefCell::new(rng),
        }
    }

    /// Replace the catalog. Blank entries are dropped; an empty result keeps
    /// the built-in one.
    pub fn with_catalog(mut self, catalog: Vec<String>) -> Self {
        let catalog: Vec<String> = catalog
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .collect();
        if !catalog.is_empty() {
            self.catalog = catalog;
        }
        self
    }

    pub fn catalog(&self) -> &[String] {
        &self.catalog
    }

    fn pick(&self) -> String {
        let index = self.rng.borrow_mut().gen_range(0..self.catalog.len());
        self.catalog[index].clone()
    }
}

#[async_trait(?Send)]
impl ResponseGenerator for CatalogGenerator {
    async fn generate(&self, history: &[Message], cancel: &CancelToken) -> Result<String> {
        if !self.scheduler.delay(self.delay_ms, cancel).await {
            return Err(PersonaError::Cancelled);
        }
        log::debug!("Generating insight after {} messages", history.len());
        Ok(self.pick())
    }
}
