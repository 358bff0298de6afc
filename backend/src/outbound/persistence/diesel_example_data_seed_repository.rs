//! PostgreSQL-backed example data seeding adapter.
//!
//! Inserts the demo profiles, contracts and jobs in one transaction, and only
//! into a database whose `profiles` table is empty. The rows carry explicit
//! ids, so the serial sequences are advanced past them afterwards.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::example_data::ExampleDataset;
use crate::domain::ports::{
    ExampleDataSeedRepository, ExampleDataSeedRepositoryError, SeedingResult,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewContractRow, NewJobRow, NewProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::{contracts, jobs, profiles};

const ADVANCE_SEQUENCES_SQL: &str = concat!(
    "SELECT ",
    "setval(pg_get_serial_sequence('profiles', 'id'), ",
    "(SELECT COALESCE(MAX(id), 1) FROM profiles)), ",
    "setval(pg_get_serial_sequence('contracts', 'id'), ",
    "(SELECT COALESCE(MAX(id), 1) FROM contracts)), ",
    "setval(pg_get_serial_sequence('jobs', 'id'), ",
    "(SELECT COALESCE(MAX(id), 1) FROM jobs))"
);

/// Diesel-backed implementation of the example data seeding repository.
#[derive(Clone)]
pub struct DieselExampleDataSeedRepository {
    pool: DbPool,
}

impl DieselExampleDataSeedRepository {
    /// Create a new seeding repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use marketplace::outbound::persistence::{
    ///     DbPool, DieselExampleDataSeedRepository, PoolConfig,
    /// };
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost")).await?;
    /// let repository = DieselExampleDataSeedRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ExampleDataSeedRepositoryError {
    map_basic_pool_error(error, ExampleDataSeedRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ExampleDataSeedRepositoryError {
    map_basic_diesel_error(
        error,
        ExampleDataSeedRepositoryError::query,
        ExampleDataSeedRepositoryError::connection,
    )
}

#[async_trait]
impl ExampleDataSeedRepository for DieselExampleDataSeedRepository {
    async fn seed_example_data(
        &self,
        dataset: &ExampleDataset,
    ) -> Result<SeedingResult, ExampleDataSeedRepositoryError> {
        let profile_rows: Vec<NewProfileRow<'_>> =
            dataset.profiles.iter().map(NewProfileRow::from).collect();
        let contract_rows: Vec<NewContractRow<'_>> =
            dataset.contracts.iter().map(NewContractRow::from).collect();
        let job_rows: Vec<NewJobRow<'_>> = dataset.jobs.iter().map(NewJobRow::from).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                // Serialise concurrent seeders on the table lock.
                sql_query("LOCK TABLE profiles IN SHARE ROW EXCLUSIVE MODE")
                    .execute(conn)
                    .await?;

                let existing: i64 = profiles::table.count().get_result(conn).await?;
                if existing > 0 {
                    return Ok(SeedingResult::AlreadySeeded);
                }

                diesel::insert_into(profiles::table)
                    .values(&profile_rows)
                    .execute(conn)
                    .await?;
                diesel::insert_into(contracts::table)
                    .values(&contract_rows)
                    .execute(conn)
                    .await?;
                diesel::insert_into(jobs::table)
                    .values(&job_rows)
                    .execute(conn)
                    .await?;
                sql_query(ADVANCE_SEQUENCES_SQL).execute(conn).await?;

                Ok(SeedingResult::Applied)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
