//! Driving port for job reads.

use async_trait::async_trait;

use crate::domain::{Error, Job, ProfileId};

/// Job use-cases exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobsQuery: Send + Sync {
    /// Unpaid jobs in the caller's in-progress contracts.
    async fn list_unpaid_jobs(&self, caller: ProfileId) -> Result<Vec<Job>, Error>;

    /// Every job.
    async fn list_all_jobs(&self) -> Result<Vec<Job>, Error>;
}
