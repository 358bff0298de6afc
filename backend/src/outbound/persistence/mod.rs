//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the driven ports backed by PostgreSQL through
//! `diesel-async` with `bb8` pooling.
//!
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module; adapters translate rows into domain types and
//!   re-validate them on the way in.
//! - Database failures map onto each port's `Connection` or `Query` variants.
//! - The payment ledger is the only adapter that writes outside seeding; it
//!   runs every operation in a single locking transaction.
//!
//! # Example
//!
//! ```rust,no_run
//! use marketplace::outbound::persistence::{DbPool, DieselProfileRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/marketplace")).await?;
//! let profiles = DieselProfileRepository::new(pool);
//! # let _ = profiles;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_contract_repository;
mod diesel_example_data_seed_repository;
mod diesel_job_repository;
mod diesel_payment_ledger;
mod diesel_profile_repository;
mod diesel_report_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_contract_repository::DieselContractRepository;
pub use diesel_example_data_seed_repository::DieselExampleDataSeedRepository;
pub use diesel_job_repository::DieselJobRepository;
pub use diesel_payment_ledger::DieselPaymentLedger;
pub use diesel_profile_repository::DieselProfileRepository;
pub use diesel_report_repository::DieselReportRepository;
pub use migrations::{
    MIGRATIONS, MigrationError, run_pending_migrations, run_pending_migrations_async,
};
pub use pool::{DbPool, PoolConfig, PoolError};
