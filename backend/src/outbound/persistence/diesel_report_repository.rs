//! PostgreSQL-backed `ReportRepository` implementation.
//!
//! Totals are aggregated in SQL (`SUM` grouped by profession or client);
//! the final ordering and tie-breaks reuse the domain ranking helpers so
//! every adapter ranks identically.

use async_trait::async_trait;
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use rust_decimal::Decimal;

use crate::domain::ports::{ReportRepository, ReportRepositoryError};
use crate::domain::reports::{rank_clients, top_profession};
use crate::domain::{
    BestClientsLimit, ClientSpend, Money, ProfessionEarnings, ProfileId, ProfileRole, ReportWindow,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::pool::{DbPool, PoolError};
use super::schema::{contracts, jobs, profiles};

/// Diesel-backed admin reports.
#[derive(Clone)]
pub struct DieselReportRepository {
    pool: DbPool,
}

impl DieselReportRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReportRepositoryError {
    map_basic_pool_error(error, ReportRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ReportRepositoryError {
    map_basic_diesel_error(
        error,
        ReportRepositoryError::query,
        ReportRepositoryError::connection,
    )
}

fn total(sum: Option<Decimal>) -> Result<Money, ReportRepositoryError> {
    Money::new(sum.unwrap_or(Decimal::ZERO))
        .map_err(|err| ReportRepositoryError::query(format!("invalid aggregate: {err}")))
}

#[async_trait]
impl ReportRepository for DieselReportRepository {
    async fn best_profession(
        &self,
        window: ReportWindow,
    ) -> Result<Option<ProfessionEarnings>, ReportRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(String, Option<Decimal>)> = jobs::table
            .inner_join(contracts::table)
            .inner_join(profiles::table.on(profiles::id.eq(contracts::contractor_id)))
            .filter(jobs::paid.eq(true))
            .filter(jobs::payment_date.ge(window.start()))
            .filter(jobs::payment_date.le(window.end()))
            .filter(profiles::role.eq(ProfileRole::Contractor.as_str()))
            .group_by(profiles::profession)
            .select((profiles::profession, sum(jobs::price)))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let earnings = rows
            .into_iter()
            .map(|(profession, earned)| {
                Ok(ProfessionEarnings {
                    profession,
                    earned: total(earned)?,
                })
            })
            .collect::<Result<Vec<_>, ReportRepositoryError>>()?;
        Ok(top_profession(earnings))
    }

    async fn best_clients(
        &self,
        window: ReportWindow,
        limit: BestClientsLimit,
    ) -> Result<Vec<ClientSpend>, ReportRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(i64, String, String, Option<Decimal>)> = jobs::table
            .inner_join(contracts::table)
            .inner_join(profiles::table.on(profiles::id.eq(contracts::client_id)))
            .filter(jobs::paid.eq(true))
            .filter(jobs::payment_date.ge(window.start()))
            .filter(jobs::payment_date.le(window.end()))
            .filter(profiles::role.eq(ProfileRole::Client.as_str()))
            .group_by(profiles::id)
            .select((
                profiles::id,
                profiles::first_name,
                profiles::last_name,
                sum(jobs::price),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let spends = rows
            .into_iter()
            .map(|(id, first_name, last_name, paid)| {
                Ok(ClientSpend {
                    id: ProfileId::new(id),
                    full_name: format!("{first_name} {last_name}"),
                    paid: total(paid)?,
                })
            })
            .collect::<Result<Vec<_>, ReportRepositoryError>>()?;
        Ok(rank_clients(spends, limit))
    }
}
