//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PaymentLedger`]) are implemented by
//! outbound adapters. Driving ports (`*Query`, [`PaymentsCommand`],
//! [`CallerResolver`]) are implemented by domain services and consumed by
//! inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_reports_query;
mod caller_resolver;
mod contract_repository;
mod contracts_query;
mod example_data_seed_repository;
mod job_repository;
mod jobs_query;
mod payment_ledger;
mod payments_command;
mod profile_repository;
mod profiles_query;
mod report_repository;

#[cfg(test)]
pub use admin_reports_query::MockAdminReportsQuery;
pub use admin_reports_query::AdminReportsQuery;
#[cfg(test)]
pub use caller_resolver::MockCallerResolver;
pub use caller_resolver::CallerResolver;
#[cfg(test)]
pub use contract_repository::MockContractRepository;
pub use contract_repository::{
    ContractRepository, ContractRepositoryError, FixtureContractRepository,
};
#[cfg(test)]
pub use contracts_query::MockContractsQuery;
pub use contracts_query::ContractsQuery;
#[cfg(test)]
pub use example_data_seed_repository::MockExampleDataSeedRepository;
pub use example_data_seed_repository::{
    ExampleDataSeedRepository, ExampleDataSeedRepositoryError, SeedingResult,
};
#[cfg(test)]
pub use job_repository::MockJobRepository;
pub use job_repository::{FixtureJobRepository, JobRepository, JobRepositoryError};
#[cfg(test)]
pub use jobs_query::MockJobsQuery;
pub use jobs_query::JobsQuery;
#[cfg(test)]
pub use payment_ledger::MockPaymentLedger;
pub use payment_ledger::{FixturePaymentLedger, PaymentLedger, PaymentLedgerError};
#[cfg(test)]
pub use payments_command::MockPaymentsCommand;
pub use payments_command::{
    DepositRequest, DepositResponse, PayForJobRequest, PayForJobResponse, PaymentsCommand,
};
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{FixtureProfileRepository, ProfileRepository, ProfileRepositoryError};
#[cfg(test)]
pub use profiles_query::MockProfilesQuery;
pub use profiles_query::ProfilesQuery;
#[cfg(test)]
pub use report_repository::MockReportRepository;
pub use report_repository::{FixtureReportRepository, ReportRepository, ReportRepositoryError};
