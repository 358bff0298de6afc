//! In-process marketplace store.
//!
//! Implements every driven port over maps guarded by a single mutex. It backs
//! the server when no database is configured and the HTTP test-suite.
//!
//! Ledger operations run against a staged copy of the tables. The copy
//! replaces the live tables only when every step succeeded, so a failure part
//! way through leaves no trace.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::example_data::ExampleDataset;
use crate::domain::payments::{PaymentReceipt, ensure_payable, plan_deposit, plan_job_payment};
use crate::domain::ports::{
    ContractRepository, ContractRepositoryError, ExampleDataSeedRepository,
    ExampleDataSeedRepositoryError, JobRepository, JobRepositoryError, PaymentLedger,
    PaymentLedgerError, ProfileRepository, ProfileRepositoryError, ReportRepository,
    ReportRepositoryError, SeedingResult,
};
use crate::domain::reports::{rank_clients, top_profession};
use crate::domain::{
    BestClientsLimit, ClientSpend, Contract, ContractId, ContractStatus, DepositReceipt, Job,
    JobId, Money, PaymentRejection, ProfessionEarnings, Profile, ProfileId, ProfileRole,
    ReportWindow,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Debug, Clone, Default)]
struct Tables {
    profiles: BTreeMap<ProfileId, Profile>,
    contracts: BTreeMap<ContractId, Contract>,
    jobs: BTreeMap<JobId, Job>,
}

impl Tables {
    fn contract_of(&self, job: &Job) -> Option<&Contract> {
        self.contracts.get(&job.contract_id())
    }

    fn paid_in(&self, window: ReportWindow) -> impl Iterator<Item = (&Job, &Contract)> {
        self.jobs.values().filter_map(move |job| {
            let paid_at = job.payment().paid_at()?;
            if !window.contains(paid_at) {
                return None;
            }
            self.contract_of(job).map(|contract| (job, contract))
        })
    }

    fn outstanding_for(&self, client: ProfileId) -> Result<Option<Money>, PaymentRejection> {
        let mut prices = self
            .jobs
            .values()
            .filter(|job| !job.is_paid())
            .filter(|job| {
                self.contract_of(job).is_some_and(|contract| {
                    contract.status() == ContractStatus::InProgress
                        && contract.client_id() == client
                })
            })
            .map(Job::price)
            .peekable();
        if prices.peek().is_none() {
            return Ok(None);
        }
        prices
            .try_fold(Money::ZERO, Money::checked_add)
            .map(Some)
            .ok_or(PaymentRejection::BalanceOverflow { profile_id: client })
    }
}

/// Write step of a job payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LedgerStep {
    Debit,
    Credit,
    MarkPaid,
}

/// Mutex-guarded in-memory implementation of the driven ports.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarketplace {
    tables: Arc<Mutex<Tables>>,
    fail_at: Option<LedgerStep>,
}

impl InMemoryMarketplace {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding `dataset`.
    pub fn with_dataset(dataset: ExampleDataset) -> Self {
        let store = Self::new();
        if let Ok(mut tables) = store.tables.lock() {
            load(&mut tables, dataset);
        }
        store
    }

    #[cfg(test)]
    pub(crate) fn failing_at(mut self, step: LedgerStep) -> Self {
        self.fail_at = Some(step);
        self
    }

    fn step(&self, step: LedgerStep) -> Result<(), PaymentLedgerError> {
        if self.fail_at == Some(step) {
            return Err(PaymentLedgerError::transaction(format!(
                "injected failure at {step:?}"
            )));
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, &'static str> {
        self.tables.lock().map_err(|_| POISONED)
    }

    /// Run `apply` on a copy of the tables and publish it on success.
    fn transact<T>(
        &self,
        apply: impl FnOnce(&mut Tables) -> Result<T, PaymentLedgerError>,
    ) -> Result<T, PaymentLedgerError> {
        let mut live = self.lock().map_err(PaymentLedgerError::transaction)?;
        let mut staged = live.clone();
        let outcome = apply(&mut staged)?;
        *live = staged;
        Ok(outcome)
    }
}

fn load(tables: &mut Tables, dataset: ExampleDataset) {
    let ExampleDataset {
        profiles,
        contracts,
        jobs,
    } = dataset;
    tables
        .profiles
        .extend(profiles.into_iter().map(|p| (p.id(), p)));
    tables
        .contracts
        .extend(contracts.into_iter().map(|c| (c.id(), c)));
    tables.jobs.extend(jobs.into_iter().map(|j| (j.id(), j)));
}

#[async_trait]
impl ProfileRepository for InMemoryMarketplace {
    async fn find_by_id(&self, id: ProfileId) -> Result<Option<Profile>, ProfileRepositoryError> {
        let tables = self.lock().map_err(ProfileRepositoryError::query)?;
        Ok(tables.profiles.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Profile>, ProfileRepositoryError> {
        let tables = self.lock().map_err(ProfileRepositoryError::query)?;
        Ok(tables.profiles.values().cloned().collect())
    }
}

#[async_trait]
impl ContractRepository for InMemoryMarketplace {
    async fn find_for_participant(
        &self,
        id: ContractId,
        participant: ProfileId,
    ) -> Result<Option<Contract>, ContractRepositoryError> {
        let tables = self.lock().map_err(ContractRepositoryError::query)?;
        Ok(tables
            .contracts
            .get(&id)
            .filter(|contract| contract.involves(participant))
            .cloned())
    }

    async fn list_active_for_participant(
        &self,
        participant: ProfileId,
    ) -> Result<Vec<Contract>, ContractRepositoryError> {
        let tables = self.lock().map_err(ContractRepositoryError::query)?;
        Ok(tables
            .contracts
            .values()
            .filter(|c| c.status().is_active() && c.involves(participant))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Contract>, ContractRepositoryError> {
        let tables = self.lock().map_err(ContractRepositoryError::query)?;
        Ok(tables.contracts.values().cloned().collect())
    }
}

#[async_trait]
impl JobRepository for InMemoryMarketplace {
    async fn list_unpaid_for_participant(
        &self,
        participant: ProfileId,
    ) -> Result<Vec<Job>, JobRepositoryError> {
        let tables = self.lock().map_err(JobRepositoryError::query)?;
        Ok(tables
            .jobs
            .values()
            .filter(|job| !job.is_paid())
            .filter(|job| {
                tables.contract_of(job).is_some_and(|c| {
                    c.status() == ContractStatus::InProgress && c.involves(participant)
                })
            })
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Job>, JobRepositoryError> {
        let tables = self.lock().map_err(JobRepositoryError::query)?;
        Ok(tables.jobs.values().cloned().collect())
    }
}

#[async_trait]
impl PaymentLedger for InMemoryMarketplace {
    async fn pay_for_job(
        &self,
        job_id: JobId,
        payer_id: ProfileId,
        paid_at: DateTime<Utc>,
    ) -> Result<PaymentReceipt, PaymentLedgerError> {
        self.transact(|tables| {
            let found = tables.jobs.get(&job_id).and_then(|job| {
                tables
                    .contract_of(job)
                    .map(|contract| (job.clone(), contract.clone()))
            });
            let Some((job, contract)) = found else {
                return Err(PaymentRejection::JobNotFound { job_id }.into());
            };
            ensure_payable(job_id, payer_id, Some((&job, &contract)))?;

            let payee_id = contract.contractor_id();
            let payer = tables
                .profiles
                .get(&payer_id)
                .ok_or(PaymentRejection::ProfileNotFound {
                    profile_id: payer_id,
                })?;
            let payee = tables
                .profiles
                .get(&payee_id)
                .ok_or(PaymentRejection::ProfileNotFound {
                    profile_id: payee_id,
                })?;
            let plan = plan_job_payment(&job, payer, payee)?;
            let payer = payer.with_balance(plan.payer_balance_after);
            let payee = payee.with_balance(plan.payee_balance_after);

            self.step(LedgerStep::Debit)?;
            tables.profiles.insert(payer_id, payer);
            self.step(LedgerStep::Credit)?;
            tables.profiles.insert(payee_id, payee);
            self.step(LedgerStep::MarkPaid)?;
            tables.jobs.insert(job_id, job.paid(paid_at));

            debug!(%job_id, %payer_id, %payee_id, "in-memory payment staged");
            Ok(PaymentReceipt::from_plan(&plan, paid_at))
        })
    }

    async fn deposit(
        &self,
        profile_id: ProfileId,
        amount: Money,
    ) -> Result<DepositReceipt, PaymentLedgerError> {
        self.transact(|tables| {
            let outstanding = tables.outstanding_for(profile_id)?;
            let profile = tables
                .profiles
                .get(&profile_id)
                .ok_or(PaymentRejection::ProfileNotFound { profile_id })?;
            let plan = plan_deposit(profile, outstanding, amount)?;
            let updated = profile.with_balance(plan.balance_after);
            tables.profiles.insert(profile_id, updated);
            Ok(DepositReceipt::from(&plan))
        })
    }
}

#[async_trait]
impl ReportRepository for InMemoryMarketplace {
    async fn best_profession(
        &self,
        window: ReportWindow,
    ) -> Result<Option<ProfessionEarnings>, ReportRepositoryError> {
        let tables = self.lock().map_err(ReportRepositoryError::query)?;
        let mut earned: HashMap<String, Money> = HashMap::new();
        for (job, contract) in tables.paid_in(window) {
            let Some(contractor) = tables.profiles.get(&contract.contractor_id()) else {
                continue;
            };
            if contractor.role() != ProfileRole::Contractor {
                continue;
            }
            let total = earned
                .entry(contractor.profession().to_owned())
                .or_insert(Money::ZERO);
            *total = total
                .checked_add(job.price())
                .ok_or_else(|| ReportRepositoryError::query("earnings total overflowed"))?;
        }
        Ok(top_profession(
            earned
                .into_iter()
                .map(|(profession, earned)| ProfessionEarnings { profession, earned })
                .collect(),
        ))
    }

    async fn best_clients(
        &self,
        window: ReportWindow,
        limit: BestClientsLimit,
    ) -> Result<Vec<ClientSpend>, ReportRepositoryError> {
        let tables = self.lock().map_err(ReportRepositoryError::query)?;
        let mut paid: BTreeMap<ProfileId, Money> = BTreeMap::new();
        for (job, contract) in tables.paid_in(window) {
            let total = paid.entry(contract.client_id()).or_insert(Money::ZERO);
            *total = total
                .checked_add(job.price())
                .ok_or_else(|| ReportRepositoryError::query("spending total overflowed"))?;
        }
        let spends = paid
            .into_iter()
            .filter_map(|(id, amount)| {
                let client = tables.profiles.get(&id)?;
                client.is_client().then(|| ClientSpend {
                    id,
                    full_name: client.full_name(),
                    paid: amount,
                })
            })
            .collect();
        Ok(rank_clients(spends, limit))
    }
}

#[async_trait]
impl ExampleDataSeedRepository for InMemoryMarketplace {
    async fn seed_example_data(
        &self,
        dataset: &ExampleDataset,
    ) -> Result<SeedingResult, ExampleDataSeedRepositoryError> {
        let mut tables = self.lock().map_err(ExampleDataSeedRepositoryError::query)?;
        if !tables.profiles.is_empty() {
            return Ok(SeedingResult::AlreadySeeded);
        }
        load(&mut tables, dataset.clone());
        Ok(SeedingResult::Applied)
    }
}

#[cfg(test)]
mod tests;
