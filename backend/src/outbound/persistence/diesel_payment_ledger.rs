//! PostgreSQL-backed `PaymentLedger` implementation.
//!
//! Each operation is one transaction. Rows are locked with `FOR UPDATE` in
//! one global order, contracts then jobs then profiles, each by ascending
//! id. Payments and deposits touching the same contract therefore queue on
//! the contract row instead of deadlocking. The
//! rules themselves live in [`crate::domain::payments`]; this adapter only
//! loads the locked state, asks for a plan and writes it back. Returning an
//! error from the closure rolls back every statement issued so far.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::payments::{ensure_payable, plan_deposit, plan_job_payment};
use crate::domain::ports::{PaymentLedger, PaymentLedgerError};
use crate::domain::{
    Contract, ContractStatus, DepositReceipt, Job, JobId, Money, PaymentReceipt,
    PaymentRejection, Profile, ProfileId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ContractRow, JobRow, ProfileRow, RowConversionError, convert_rows};
use super::pool::{DbPool, PoolError};
use super::schema::{contracts, jobs, profiles};

/// Diesel-backed ledger for job payments and deposits.
#[derive(Clone)]
pub struct DieselPaymentLedger {
    pool: DbPool,
}

impl DieselPaymentLedger {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Reasons a ledger transaction aborts.
#[derive(Debug)]
enum LedgerAbort {
    Rejected(PaymentRejection),
    InvalidRow(RowConversionError),
    Lost(&'static str),
    Database(diesel::result::Error),
}

impl From<diesel::result::Error> for LedgerAbort {
    fn from(error: diesel::result::Error) -> Self {
        Self::Database(error)
    }
}

impl From<PaymentRejection> for LedgerAbort {
    fn from(rejection: PaymentRejection) -> Self {
        Self::Rejected(rejection)
    }
}

impl From<RowConversionError> for LedgerAbort {
    fn from(error: RowConversionError) -> Self {
        Self::InvalidRow(error)
    }
}

fn map_pool_error(error: PoolError) -> PaymentLedgerError {
    map_basic_pool_error(error, PaymentLedgerError::connection)
}

fn map_abort(abort: LedgerAbort) -> PaymentLedgerError {
    match abort {
        LedgerAbort::Rejected(rejection) => PaymentLedgerError::rejected(rejection),
        LedgerAbort::InvalidRow(error) => PaymentLedgerError::transaction(error.to_string()),
        LedgerAbort::Lost(message) => PaymentLedgerError::transaction(message),
        LedgerAbort::Database(error) => map_basic_diesel_error(
            error,
            PaymentLedgerError::transaction,
            PaymentLedgerError::connection,
        ),
    }
}

/// Lock `job_id`'s contract and then the job itself.
async fn lock_job_and_contract(
    conn: &mut AsyncPgConnection,
    job_id: JobId,
) -> Result<Option<(Job, Contract)>, LedgerAbort> {
    // A job never moves between contracts, so the unlocked read is stable.
    let Some(contract_id) = jobs::table
        .find(job_id.get())
        .select(jobs::contract_id)
        .first::<i64>(conn)
        .await
        .optional()?
    else {
        return Ok(None);
    };

    let Some(contract_row) = contracts::table
        .find(contract_id)
        .select(ContractRow::as_select())
        .for_update()
        .first(conn)
        .await
        .optional()?
    else {
        return Ok(None);
    };
    let contract = Contract::try_from(contract_row)?;

    let job_row: Option<JobRow> = jobs::table
        .find(job_id.get())
        .select(JobRow::as_select())
        .for_update()
        .first(conn)
        .await
        .optional()?;
    let Some(job_row) = job_row else {
        return Ok(None);
    };
    Ok(Some((Job::try_from(job_row)?, contract)))
}

/// Lock the given profiles in ascending id order.
async fn lock_profiles(
    conn: &mut AsyncPgConnection,
    ids: &[ProfileId],
) -> Result<Vec<Profile>, LedgerAbort> {
    let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
    let rows: Vec<ProfileRow> = profiles::table
        .filter(profiles::id.eq_any(raw))
        .order(profiles::id.asc())
        .select(ProfileRow::as_select())
        .for_update()
        .load(conn)
        .await?;
    Ok(convert_rows(rows)?)
}

fn take_profile(locked: &[Profile], id: ProfileId) -> Result<&Profile, LedgerAbort> {
    locked
        .iter()
        .find(|profile| profile.id() == id)
        .ok_or(LedgerAbort::Rejected(PaymentRejection::ProfileNotFound {
            profile_id: id,
        }))
}

async fn set_balance(
    conn: &mut AsyncPgConnection,
    id: ProfileId,
    balance: Money,
) -> Result<(), LedgerAbort> {
    let updated = diesel::update(profiles::table.find(id.get()))
        .set(profiles::balance.eq(balance.amount()))
        .execute(conn)
        .await?;
    if updated != 1 {
        return Err(LedgerAbort::Lost("profile row vanished mid-transaction"));
    }
    Ok(())
}

/// Sum of unpaid job prices across `client`'s in-progress contracts. The
/// contracts and then their jobs are locked so no payment can change the
/// total underneath the deposit.
async fn lock_outstanding(
    conn: &mut AsyncPgConnection,
    client: ProfileId,
) -> Result<Option<Money>, LedgerAbort> {
    let contract_ids: Vec<i64> = contracts::table
        .filter(contracts::status.eq(ContractStatus::InProgress.as_str()))
        .filter(contracts::client_id.eq(client.get()))
        .order(contracts::id.asc())
        .select(contracts::id)
        .for_update()
        .load(conn)
        .await?;
    if contract_ids.is_empty() {
        return Ok(None);
    }
    let prices: Vec<Decimal> = jobs::table
        .filter(jobs::contract_id.eq_any(contract_ids))
        .filter(jobs::paid.eq(false))
        .order(jobs::id.asc())
        .select(jobs::price)
        .for_update()
        .load(conn)
        .await?;
    if prices.is_empty() {
        return Ok(None);
    }
    let overflow = || PaymentRejection::BalanceOverflow { profile_id: client };
    let mut total = Money::ZERO;
    for price in prices {
        let price = Money::new(price).map_err(|_| LedgerAbort::Lost("stored price is invalid"))?;
        total = total.checked_add(price).ok_or_else(overflow)?;
    }
    Ok(Some(total))
}

#[async_trait]
impl PaymentLedger for DieselPaymentLedger {
    async fn pay_for_job(
        &self,
        job_id: JobId,
        payer_id: ProfileId,
        paid_at: DateTime<Utc>,
    ) -> Result<PaymentReceipt, PaymentLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, LedgerAbort, _>(|conn| {
            async move {
                let found = lock_job_and_contract(conn, job_id).await?;
                ensure_payable(job_id, payer_id, found.as_ref().map(|(j, c)| (j, c)))?;
                let Some((job, contract)) = found else {
                    return Err(PaymentRejection::JobNotFound { job_id }.into());
                };

                let payee_id = contract.contractor_id();
                let locked = lock_profiles(conn, &[payer_id, payee_id]).await?;
                let payer = take_profile(&locked, payer_id)?;
                let payee = take_profile(&locked, payee_id)?;
                let plan = plan_job_payment(&job, payer, payee)?;

                set_balance(conn, plan.payer_id, plan.payer_balance_after).await?;
                set_balance(conn, plan.payee_id, plan.payee_balance_after).await?;
                let marked = diesel::update(
                    jobs::table
                        .filter(jobs::id.eq(job_id.get()))
                        .filter(jobs::paid.eq(false)),
                )
                .set((jobs::paid.eq(true), jobs::payment_date.eq(Some(paid_at))))
                .execute(conn)
                .await?;
                if marked != 1 {
                    return Err(LedgerAbort::Lost("job was paid concurrently"));
                }

                debug!(%job_id, %payer_id, %payee_id, "job payment committed");
                Ok(PaymentReceipt::from_plan(&plan, paid_at))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_abort)
    }

    async fn deposit(
        &self,
        profile_id: ProfileId,
        amount: Money,
    ) -> Result<DepositReceipt, PaymentLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, LedgerAbort, _>(|conn| {
            async move {
                let outstanding = lock_outstanding(conn, profile_id).await?;
                let locked = lock_profiles(conn, &[profile_id]).await?;
                let profile = take_profile(&locked, profile_id)?;
                let plan = plan_deposit(profile, outstanding, amount)?;
                set_balance(conn, plan.profile_id, plan.balance_after).await?;

                debug!(%profile_id, amount = %plan.amount, "deposit committed");
                Ok(DepositReceipt::from(&plan))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_abort)
    }
}
