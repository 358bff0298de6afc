//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use mockable::DefaultClock;

use crate::domain::example_data::demo_dataset;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryMarketplace;

/// A store holding the demo dataset.
pub fn demo_store() -> InMemoryMarketplace {
    InMemoryMarketplace::with_dataset(demo_dataset().expect("demo dataset is valid"))
}

/// HTTP state over a fresh demo store.
pub fn demo_state() -> HttpState {
    HttpState::over_memory(&demo_store(), Arc::new(DefaultClock))
}
