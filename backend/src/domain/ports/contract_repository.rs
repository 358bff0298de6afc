//! Port for contract reads scoped to a participant.

use async_trait::async_trait;

use crate::domain::{Contract, ContractId, ProfileId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by contract repository adapters.
    pub enum ContractRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "contract repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "contract repository query failed: {message}",
    }
}

/// Port for reading contracts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContractRepository: Send + Sync {
    /// Find a contract by id when `participant` is its client or contractor.
    async fn find_for_participant(
        &self,
        id: ContractId,
        participant: ProfileId,
    ) -> Result<Option<Contract>, ContractRepositoryError>;

    /// Non-terminated contracts where `participant` is client or contractor.
    async fn list_active_for_participant(
        &self,
        participant: ProfileId,
    ) -> Result<Vec<Contract>, ContractRepositoryError>;

    /// Every contract, ordered by id.
    async fn list_all(&self) -> Result<Vec<Contract>, ContractRepositoryError>;
}

/// Fixture implementation for tests that do not exercise contract reads.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureContractRepository;

#[async_trait]
impl ContractRepository for FixtureContractRepository {
    async fn find_for_participant(
        &self,
        _id: ContractId,
        _participant: ProfileId,
    ) -> Result<Option<Contract>, ContractRepositoryError> {
        Ok(None)
    }

    async fn list_active_for_participant(
        &self,
        _participant: ProfileId,
    ) -> Result<Vec<Contract>, ContractRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_all(&self) -> Result<Vec<Contract>, ContractRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_returns_no_contracts() {
        let repo = FixtureContractRepository;
        let found = repo
            .find_for_participant(ContractId::new(1), ProfileId::new(1))
            .await
            .expect("fixture lookup succeeds");
        assert!(found.is_none());
        let active = repo
            .list_active_for_participant(ProfileId::new(1))
            .await
            .expect("fixture list succeeds");
        assert!(active.is_empty());
    }
}
