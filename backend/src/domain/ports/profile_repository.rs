//! Port for profile reads.

use async_trait::async_trait;

use crate::domain::{Profile, ProfileId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "profile repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "profile repository query failed: {message}",
    }
}

/// Port for reading marketplace profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find a profile by id.
    async fn find_by_id(&self, id: ProfileId) -> Result<Option<Profile>, ProfileRepositoryError>;

    /// Every profile, ordered by id.
    async fn list_all(&self) -> Result<Vec<Profile>, ProfileRepositoryError>;
}

/// Fixture implementation for tests that do not exercise profile reads.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProfileRepository;

#[async_trait]
impl ProfileRepository for FixtureProfileRepository {
    async fn find_by_id(&self, _id: ProfileId) -> Result<Option<Profile>, ProfileRepositoryError> {
        Ok(None)
    }

    async fn list_all(&self) -> Result<Vec<Profile>, ProfileRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_finds_nothing() {
        let repo = FixtureProfileRepository;
        let found = repo
            .find_by_id(ProfileId::new(1))
            .await
            .expect("fixture lookup succeeds");
        assert!(found.is_none());
        assert!(repo.list_all().await.expect("fixture list").is_empty());
    }

    #[rstest]
    fn connection_error_formats_message() {
        let err = ProfileRepositoryError::connection("refused");
        assert_eq!(
            err.to_string(),
            "profile repository connection failed: refused"
        );
    }
}
