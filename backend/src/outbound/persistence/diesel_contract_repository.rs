//! PostgreSQL-backed `ContractRepository` implementation using Diesel ORM.
//!
//! Participant scoping is part of every `WHERE` clause, so a contract the
//! caller is not party to is indistinguishable from a missing one.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ContractRepository, ContractRepositoryError};
use crate::domain::{Contract, ContractId, ContractStatus, ProfileId};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, map_row_error,
};
use super::models::{ContractRow, RowConversionError, convert_rows};
use super::pool::{DbPool, PoolError};
use super::schema::contracts;

/// Diesel-backed contract reads.
#[derive(Clone)]
pub struct DieselContractRepository {
    pool: DbPool,
}

impl DieselContractRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ContractRepositoryError {
    map_basic_pool_error(error, ContractRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ContractRepositoryError {
    map_basic_diesel_error(
        error,
        ContractRepositoryError::query,
        ContractRepositoryError::connection,
    )
}

fn map_conversion_error(error: RowConversionError) -> ContractRepositoryError {
    map_row_error(error, ContractRepositoryError::query)
}

#[async_trait]
impl ContractRepository for DieselContractRepository {
    async fn find_for_participant(
        &self,
        id: ContractId,
        participant: ProfileId,
    ) -> Result<Option<Contract>, ContractRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let participant = participant.get();

        let row: Option<ContractRow> = contracts::table
            .filter(contracts::id.eq(id.get()))
            .filter(
                contracts::client_id
                    .eq(participant)
                    .or(contracts::contractor_id.eq(participant)),
            )
            .select(ContractRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Contract::try_from)
            .transpose()
            .map_err(map_conversion_error)
    }

    async fn list_active_for_participant(
        &self,
        participant: ProfileId,
    ) -> Result<Vec<Contract>, ContractRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let participant = participant.get();

        let rows: Vec<ContractRow> = contracts::table
            .filter(contracts::status.ne(ContractStatus::Terminated.as_str()))
            .filter(
                contracts::client_id
                    .eq(participant)
                    .or(contracts::contractor_id.eq(participant)),
            )
            .order(contracts::id.asc())
            .select(ContractRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        convert_rows(rows).map_err(map_conversion_error)
    }

    async fn list_all(&self) -> Result<Vec<Contract>, ContractRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ContractRow> = contracts::table
            .order(contracts::id.asc())
            .select(ContractRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        convert_rows(rows).map_err(map_conversion_error)
    }
}
