//! PostgreSQL-backed `JobRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{JobRepository, JobRepositoryError};
use crate::domain::{ContractStatus, Job, ProfileId};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, map_row_error,
};
use super::models::{JobRow, RowConversionError, convert_rows};
use super::pool::{DbPool, PoolError};
use super::schema::{contracts, jobs};

/// Diesel-backed job reads.
#[derive(Clone)]
pub struct DieselJobRepository {
    pool: DbPool,
}

impl DieselJobRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> JobRepositoryError {
    map_basic_pool_error(error, JobRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> JobRepositoryError {
    map_basic_diesel_error(
        error,
        JobRepositoryError::query,
        JobRepositoryError::connection,
    )
}

fn map_conversion_error(error: RowConversionError) -> JobRepositoryError {
    map_row_error(error, JobRepositoryError::query)
}

#[async_trait]
impl JobRepository for DieselJobRepository {
    async fn list_unpaid_for_participant(
        &self,
        participant: ProfileId,
    ) -> Result<Vec<Job>, JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let participant = participant.get();

        let rows: Vec<JobRow> = jobs::table
            .inner_join(contracts::table)
            .filter(jobs::paid.eq(false))
            .filter(contracts::status.eq(ContractStatus::InProgress.as_str()))
            .filter(
                contracts::client_id
                    .eq(participant)
                    .or(contracts::contractor_id.eq(participant)),
            )
            .order(jobs::id.asc())
            .select(JobRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        convert_rows(rows).map_err(map_conversion_error)
    }

    async fn list_all(&self) -> Result<Vec<Job>, JobRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<JobRow> = jobs::table
            .order(jobs::id.asc())
            .select(JobRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        convert_rows(rows).map_err(map_conversion_error)
    }
}
