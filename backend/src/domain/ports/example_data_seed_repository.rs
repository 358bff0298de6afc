//! Port abstraction for loading the demo dataset.
//!
//! Adapters must load every profile, contract and job in one unit of work,
//! and only into a store that holds no profiles yet.

use async_trait::async_trait;

use crate::domain::example_data::ExampleDataset;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by example data seed repository adapters.
    pub enum ExampleDataSeedRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "example data seeding connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "example data seeding query failed: {message}",
    }
}

/// Outcome of a seeding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedingResult {
    /// The dataset was inserted.
    Applied,
    /// The store already held data; nothing was inserted.
    AlreadySeeded,
}

/// Port for loading the demo dataset atomically.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExampleDataSeedRepository: Send + Sync {
    /// Insert `dataset` when the store is empty.
    async fn seed_example_data(
        &self,
        dataset: &ExampleDataset,
    ) -> Result<SeedingResult, ExampleDataSeedRepositoryError>;
}
