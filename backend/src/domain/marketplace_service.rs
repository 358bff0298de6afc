//! Read-side marketplace service.
//!
//! Implements caller resolution plus the contract, job and profile queries on
//! top of the driven repositories. Listings that come back empty are reported
//! as not found.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::payment_service::NOT_FOUND_MESSAGE;
use crate::domain::ports::{
    CallerResolver, ContractRepository, ContractRepositoryError, ContractsQuery, JobRepository,
    JobRepositoryError, JobsQuery, ProfileRepository, ProfileRepositoryError, ProfilesQuery,
};
use crate::domain::{Contract, ContractId, Error, Job, Profile, ProfileId};

fn map_profile_error(error: ProfileRepositoryError) -> Error {
    match error {
        ProfileRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("profile repository unavailable: {message}"))
        }
        ProfileRepositoryError::Query { message } => {
            Error::internal(format!("profile repository error: {message}"))
        }
    }
}

fn map_contract_error(error: ContractRepositoryError) -> Error {
    match error {
        ContractRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("contract repository unavailable: {message}"))
        }
        ContractRepositoryError::Query { message } => {
            Error::internal(format!("contract repository error: {message}"))
        }
    }
}

fn map_job_error(error: JobRepositoryError) -> Error {
    match error {
        JobRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("job repository unavailable: {message}"))
        }
        JobRepositoryError::Query { message } => {
            Error::internal(format!("job repository error: {message}"))
        }
    }
}

fn non_empty<T>(items: Vec<T>) -> Result<Vec<T>, Error> {
    if items.is_empty() {
        return Err(Error::not_found(NOT_FOUND_MESSAGE));
    }
    Ok(items)
}

/// Query service over the profile, contract and job repositories.
pub struct MarketplaceQueryService<P, C, J> {
    profiles: Arc<P>,
    contracts: Arc<C>,
    jobs: Arc<J>,
}

impl<P, C, J> Clone for MarketplaceQueryService<P, C, J> {
    fn clone(&self) -> Self {
        Self {
            profiles: Arc::clone(&self.profiles),
            contracts: Arc::clone(&self.contracts),
            jobs: Arc::clone(&self.jobs),
        }
    }
}

impl<P, C, J> MarketplaceQueryService<P, C, J> {
    pub fn new(profiles: Arc<P>, contracts: Arc<C>, jobs: Arc<J>) -> Self {
        Self {
            profiles,
            contracts,
            jobs,
        }
    }
}

#[async_trait]
impl<P, C, J> CallerResolver for MarketplaceQueryService<P, C, J>
where
    P: ProfileRepository,
    C: Send + Sync,
    J: Send + Sync,
{
    async fn resolve_caller(&self, id: ProfileId) -> Result<Profile, Error> {
        self.profiles
            .find_by_id(id)
            .await
            .map_err(map_profile_error)?
            .ok_or_else(|| Error::unauthorized(format!("unknown profile {id}")))
    }
}

#[async_trait]
impl<P, C, J> ContractsQuery for MarketplaceQueryService<P, C, J>
where
    P: Send + Sync,
    C: ContractRepository,
    J: Send + Sync,
{
    async fn get_contract(&self, caller: ProfileId, id: ContractId) -> Result<Contract, Error> {
        self.contracts
            .find_for_participant(id, caller)
            .await
            .map_err(map_contract_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND_MESSAGE))
    }

    async fn list_contracts(&self, caller: ProfileId) -> Result<Vec<Contract>, Error> {
        let contracts = self
            .contracts
            .list_active_for_participant(caller)
            .await
            .map_err(map_contract_error)?;
        non_empty(contracts)
    }

    async fn list_all_contracts(&self) -> Result<Vec<Contract>, Error> {
        let contracts = self
            .contracts
            .list_all()
            .await
            .map_err(map_contract_error)?;
        non_empty(contracts)
    }
}

#[async_trait]
impl<P, C, J> JobsQuery for MarketplaceQueryService<P, C, J>
where
    P: Send + Sync,
    C: Send + Sync,
    J: JobRepository,
{
    async fn list_unpaid_jobs(&self, caller: ProfileId) -> Result<Vec<Job>, Error> {
        let jobs = self
            .jobs
            .list_unpaid_for_participant(caller)
            .await
            .map_err(map_job_error)?;
        non_empty(jobs)
    }

    async fn list_all_jobs(&self) -> Result<Vec<Job>, Error> {
        let jobs = self.jobs.list_all().await.map_err(map_job_error)?;
        non_empty(jobs)
    }
}

#[async_trait]
impl<P, C, J> ProfilesQuery for MarketplaceQueryService<P, C, J>
where
    P: ProfileRepository,
    C: Send + Sync,
    J: Send + Sync,
{
    async fn list_profiles(&self) -> Result<Vec<Profile>, Error> {
        let profiles = self.profiles.list_all().await.map_err(map_profile_error)?;
        non_empty(profiles)
    }
}
