//! Port for job reads.

use async_trait::async_trait;

use crate::domain::{Job, ProfileId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by job repository adapters.
    pub enum JobRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "job repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "job repository query failed: {message}",
    }
}

/// Port for reading jobs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Unpaid jobs of in-progress contracts where `participant` is client or
    /// contractor, ordered by id.
    async fn list_unpaid_for_participant(
        &self,
        participant: ProfileId,
    ) -> Result<Vec<Job>, JobRepositoryError>;

    /// Every job, ordered by id.
    async fn list_all(&self) -> Result<Vec<Job>, JobRepositoryError>;
}

/// Fixture implementation for tests that do not exercise job reads.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureJobRepository;

#[async_trait]
impl JobRepository for FixtureJobRepository {
    async fn list_unpaid_for_participant(
        &self,
        _participant: ProfileId,
    ) -> Result<Vec<Job>, JobRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_all(&self) -> Result<Vec<Job>, JobRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_lists_nothing() {
        let repo = FixtureJobRepository;
        let unpaid = repo
            .list_unpaid_for_participant(ProfileId::new(2))
            .await
            .expect("fixture list succeeds");
        assert!(unpaid.is_empty());
    }

    #[rstest]
    fn query_error_formats_message() {
        let err = JobRepositoryError::query("syntax error");
        assert!(err.to_string().contains("syntax error"));
    }
}
