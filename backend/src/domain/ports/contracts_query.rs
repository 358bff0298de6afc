//! Driving port for contract reads.

use async_trait::async_trait;

use crate::domain::{Contract, ContractId, Error, ProfileId};

/// Contract use-cases exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContractsQuery: Send + Sync {
    /// The caller's contract `id`; not found unless the caller is a party.
    async fn get_contract(&self, caller: ProfileId, id: ContractId) -> Result<Contract, Error>;

    /// The caller's non-terminated contracts; not found when there are none.
    async fn list_contracts(&self, caller: ProfileId) -> Result<Vec<Contract>, Error>;

    /// Every contract; not found when there are none.
    async fn list_all_contracts(&self) -> Result<Vec<Contract>, Error>;
}
