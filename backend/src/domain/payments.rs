//! Balance transfer rules for job payments and deposits.
//!
//! The functions here are pure: ledger adapters call them inside their
//! transaction with freshly locked rows and apply the returned plan only when
//! every check passes. A rejection means nothing was written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Contract, ContractStatus, Job, JobId, Money, Profile, ProfileId};

pub const JOB_PAID_MESSAGE: &str = "Job Paid Successfully!";
pub const DEPOSIT_ACCEPTED_MESSAGE: &str = "Amount Deposited Successfully!";

/// Share of the outstanding unpaid total a client may deposit, in percent.
pub const DEPOSIT_CAP_PERCENT: u32 = 25;

/// Why a payment or deposit was refused. Checks run in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentRejection {
    #[error("job {job_id} is not an unpaid job of an in-progress contract held by the payer")]
    JobNotFound { job_id: JobId },
    #[error("balance {balance} does not cover price {price}")]
    InsufficientFunds { balance: Money, price: Money },
    #[error("profile {profile_id} is not a client")]
    PayerNotClient { profile_id: ProfileId },
    #[error("profile {profile_id} not found")]
    ProfileNotFound { profile_id: ProfileId },
    #[error("profile {profile_id} has no unpaid in-progress jobs")]
    NothingOutstanding { profile_id: ProfileId },
    #[error("deposit {requested} exceeds the allowed maximum {cap}")]
    DepositCapExceeded { requested: Money, cap: Money },
    #[error("balance of profile {profile_id} would overflow")]
    BalanceOverflow { profile_id: ProfileId },
}

/// Balances to write when paying a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentPlan {
    pub job_id: JobId,
    pub amount: Money,
    pub payer_id: ProfileId,
    pub payer_balance_after: Money,
    pub payee_id: ProfileId,
    pub payee_balance_after: Money,
}

/// Outcome of a committed job payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub job_id: JobId,
    pub amount: Money,
    pub payer_id: ProfileId,
    pub payee_id: ProfileId,
    pub payer_balance_after: Money,
    pub paid_at: DateTime<Utc>,
}

impl PaymentReceipt {
    pub fn from_plan(plan: &PaymentPlan, paid_at: DateTime<Utc>) -> Self {
        Self {
            job_id: plan.job_id,
            amount: plan.amount,
            payer_id: plan.payer_id,
            payee_id: plan.payee_id,
            payer_balance_after: plan.payer_balance_after,
            paid_at,
        }
    }
}

/// Balance to write when depositing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositPlan {
    pub profile_id: ProfileId,
    pub amount: Money,
    pub balance_after: Money,
}

/// Outcome of a committed deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositReceipt {
    pub profile_id: ProfileId,
    pub amount: Money,
    pub balance_after: Money,
}

impl From<&DepositPlan> for DepositReceipt {
    fn from(plan: &DepositPlan) -> Self {
        Self {
            profile_id: plan.profile_id,
            amount: plan.amount,
            balance_after: plan.balance_after,
        }
    }
}

/// Confirm `found` is an unpaid job of an in-progress contract whose client
/// is `payer_id`.
pub fn ensure_payable(
    job_id: JobId,
    payer_id: ProfileId,
    found: Option<(&Job, &Contract)>,
) -> Result<(), PaymentRejection> {
    match found {
        Some((job, contract))
            if job.id() == job_id
                && !job.is_paid()
                && job.contract_id() == contract.id()
                && contract.status() == ContractStatus::InProgress
                && contract.client_id() == payer_id =>
        {
            Ok(())
        }
        _ => Err(PaymentRejection::JobNotFound { job_id }),
    }
}

/// Work out the balances after `payer` pays `job` to `payee`.
///
/// Funds are checked before the payer's role.
pub fn plan_job_payment(
    job: &Job,
    payer: &Profile,
    payee: &Profile,
) -> Result<PaymentPlan, PaymentRejection> {
    let price = job.price();
    let payer_balance_after =
        payer
            .balance()
            .checked_sub(price)
            .ok_or(PaymentRejection::InsufficientFunds {
                balance: payer.balance(),
                price,
            })?;
    if !payer.is_client() {
        return Err(PaymentRejection::PayerNotClient {
            profile_id: payer.id(),
        });
    }
    let payee_balance_after = credit(payee, price)?;
    Ok(PaymentPlan {
        job_id: job.id(),
        amount: price,
        payer_id: payer.id(),
        payer_balance_after,
        payee_id: payee.id(),
        payee_balance_after,
    })
}

/// The most a client owing `outstanding` may deposit.
pub fn deposit_cap(outstanding: Money) -> Money {
    outstanding.percentage(DEPOSIT_CAP_PERCENT)
}

/// Compare `100 * amount` with `DEPOSIT_CAP_PERCENT * outstanding` exactly.
fn exceeds_cap(amount: Money, outstanding: Money) -> bool {
    match (
        amount.checked_scale(100),
        outstanding.checked_scale(DEPOSIT_CAP_PERCENT),
    ) {
        (Some(scaled), Some(ceiling)) => scaled > ceiling,
        (None, Some(_)) => true,
        (Some(_), None) => false,
        (None, None) => amount > deposit_cap(outstanding),
    }
}

/// `profile`'s balance after receiving `amount`, bounded by the storage
/// columns.
fn credit(profile: &Profile, amount: Money) -> Result<Money, PaymentRejection> {
    profile
        .balance()
        .checked_add(amount)
        .filter(|balance| balance.fits_storage())
        .ok_or(PaymentRejection::BalanceOverflow {
            profile_id: profile.id(),
        })
}

/// Work out the balance after depositing `amount` into `profile`.
///
/// `outstanding` is the unpaid total across the profile's in-progress
/// contracts as client; `None` or zero means there is nothing to cap against.
pub fn plan_deposit(
    profile: &Profile,
    outstanding: Option<Money>,
    amount: Money,
) -> Result<DepositPlan, PaymentRejection> {
    let outstanding = outstanding
        .filter(|total| !total.is_zero())
        .ok_or(PaymentRejection::NothingOutstanding {
            profile_id: profile.id(),
        })?;
    if exceeds_cap(amount, outstanding) {
        return Err(PaymentRejection::DepositCapExceeded {
            requested: amount,
            cap: deposit_cap(outstanding),
        });
    }
    let balance_after = credit(profile, amount)?;
    Ok(DepositPlan {
        profile_id: profile.id(),
        amount,
        balance_after,
    })
}
