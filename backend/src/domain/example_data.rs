//! Demo marketplace dataset and its seeding orchestration.
//!
//! The dataset is fixed: eight profiles, nine contracts and fourteen jobs,
//! several already paid in mid-August 2020 so the admin reports have
//! something to rank.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use crate::domain::ports::{ExampleDataSeedRepository, ExampleDataSeedRepositoryError, SeedingResult};
use crate::domain::{
    Contract, ContractDraft, ContractId, ContractStatus, ContractValidationError, Job, JobDraft,
    JobId, JobPayment, JobValidationError, Money, MoneyValidationError, Profile, ProfileDraft,
    ProfileId, ProfileRole, ProfileValidationError,
};

/// Profiles, contracts and jobs to load together.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExampleDataset {
    pub profiles: Vec<Profile>,
    pub contracts: Vec<Contract>,
    pub jobs: Vec<Job>,
}

/// Errors raised while building or applying the demo dataset.
#[derive(Debug, Error)]
pub enum ExampleDataSeedingError {
    #[error("invalid amount in example data: {0}")]
    Amount(#[from] MoneyValidationError),
    #[error("invalid profile in example data: {0}")]
    Profile(#[from] ProfileValidationError),
    #[error("invalid contract in example data: {0}")]
    Contract(#[from] ContractValidationError),
    #[error("invalid job in example data: {0}")]
    Job(#[from] JobValidationError),
    #[error("invalid payment timestamp in example data: {0}")]
    Timestamp(#[from] chrono::ParseError),
    #[error("example data persistence error: {0}")]
    Persistence(#[from] ExampleDataSeedRepositoryError),
}

type ProfileRow = (i64, &'static str, &'static str, &'static str, i64, ProfileRole);
type ContractRow = (i64, ContractStatus, i64, i64);
type JobRow = (i64, i64, Option<&'static str>, i64);

const PROFILES: [ProfileRow; 8] = [
    (1, "Harry", "Potter", "Wizard", 115_000, ProfileRole::Client),
    (2, "Mr", "Robot", "Hacker", 23_111, ProfileRole::Client),
    (3, "John", "Snow", "Knows nothing", 45_130, ProfileRole::Client),
    (4, "Ash", "Kethcum", "Pokemon master", 130, ProfileRole::Client),
    (5, "John", "Lenon", "Musician", 6_400, ProfileRole::Contractor),
    (6, "Linus", "Torvalds", "Programmer", 121_400, ProfileRole::Contractor),
    (7, "Alan", "Turing", "Programmer", 2_200, ProfileRole::Contractor),
    (8, "Aragorn", "II Elessar Telcontarion", "Fighter", 31_400, ProfileRole::Contractor),
];

const CONTRACTS: [ContractRow; 9] = [
    (1, ContractStatus::Terminated, 1, 5),
    (2, ContractStatus::InProgress, 1, 6),
    (3, ContractStatus::InProgress, 2, 6),
    (4, ContractStatus::InProgress, 2, 7),
    (5, ContractStatus::New, 3, 8),
    (6, ContractStatus::InProgress, 3, 7),
    (7, ContractStatus::InProgress, 4, 7),
    (8, ContractStatus::InProgress, 4, 6),
    (9, ContractStatus::InProgress, 4, 8),
];

const JOBS: [JobRow; 14] = [
    (1, 20_000, None, 1),
    (2, 20_100, None, 2),
    (3, 20_200, None, 3),
    (4, 20_000, None, 4),
    (5, 20_000, None, 7),
    (6, 202_000, Some("2020-08-15T19:11:26.737Z"), 7),
    (7, 20_000, Some("2020-08-15T19:11:26.737Z"), 2),
    (8, 20_000, Some("2020-08-16T19:11:26.737Z"), 3),
    (9, 20_000, Some("2020-08-17T19:11:26.737Z"), 1),
    (10, 20_000, Some("2020-08-17T19:11:26.737Z"), 5),
    (11, 2_100, Some("2020-08-10T19:11:26.737Z"), 1),
    (12, 2_100, Some("2020-08-15T19:11:26.737Z"), 2),
    (13, 12_100, Some("2020-08-15T19:11:26.737Z"), 3),
    (14, 12_100, Some("2020-08-14T23:11:26.737Z"), 3),
];

fn build_profile(row: &ProfileRow) -> Result<Profile, ExampleDataSeedingError> {
    let (id, first_name, last_name, profession, cents, role) = *row;
    Ok(Profile::new(ProfileDraft {
        id: ProfileId::new(id),
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        profession: profession.to_owned(),
        balance: Money::from_minor_units(cents)?,
        role,
    })?)
}

fn build_contract(row: &ContractRow) -> Result<Contract, ExampleDataSeedingError> {
    let (id, status, client, contractor) = *row;
    Ok(Contract::new(ContractDraft {
        id: ContractId::new(id),
        terms: "bla bla bla".to_owned(),
        status,
        client_id: ProfileId::new(client),
        contractor_id: ProfileId::new(contractor),
    })?)
}

fn build_job(row: &JobRow) -> Result<Job, ExampleDataSeedingError> {
    let (id, cents, paid_at, contract) = *row;
    let payment = match paid_at {
        None => JobPayment::Unpaid,
        Some(raw) => JobPayment::Paid {
            paid_at: DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc),
        },
    };
    Ok(Job::new(JobDraft {
        id: JobId::new(id),
        description: "work".to_owned(),
        price: Money::from_minor_units(cents)?,
        payment,
        contract_id: ContractId::new(contract),
    })?)
}

/// Build the demo dataset.
///
/// # Examples
/// ```
/// let dataset = marketplace::domain::example_data::demo_dataset().expect("valid dataset");
/// assert_eq!(dataset.profiles.len(), 8);
/// ```
pub fn demo_dataset() -> Result<ExampleDataset, ExampleDataSeedingError> {
    Ok(ExampleDataset {
        profiles: PROFILES
            .iter()
            .map(build_profile)
            .collect::<Result<_, _>>()?,
        contracts: CONTRACTS
            .iter()
            .map(build_contract)
            .collect::<Result<_, _>>()?,
        jobs: JOBS.iter().map(build_job).collect::<Result<_, _>>()?,
    })
}

/// Service that loads the demo dataset through a seed repository.
#[derive(Clone)]
pub struct ExampleDataSeeder<R> {
    repository: Arc<R>,
}

impl<R> ExampleDataSeeder<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R> ExampleDataSeeder<R>
where
    R: ExampleDataSeedRepository,
{
    /// Load the demo dataset unless the store already holds profiles.
    ///
    /// # Errors
    ///
    /// Returns [`ExampleDataSeedingError`] if the dataset is invalid or the
    /// repository fails.
    pub async fn seed_demo_data(&self) -> Result<SeedingResult, ExampleDataSeedingError> {
        let dataset = demo_dataset()?;
        let result = self.repository.seed_example_data(&dataset).await?;
        info!(
            ?result,
            profiles = dataset.profiles.len(),
            contracts = dataset.contracts.len(),
            jobs = dataset.jobs.len(),
            "example data seeding finished"
        );
        Ok(result)
    }
}
