//! Port for atomic balance transfers.
//!
//! Adapters run each operation as one unit of work: they lock the rows they
//! read, evaluate the rules in [`crate::domain::payments`] against the
//! locked state, and either write every change or none.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{DepositReceipt, JobId, Money, PaymentReceipt, PaymentRejection, ProfileId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment ledger adapters.
    pub enum PaymentLedgerError {
        /// Ledger connection could not be established.
        Connection { message: String } =>
            "payment ledger connection failed: {message}",
        /// The unit of work failed and was rolled back.
        Transaction { message: String } =>
            "payment ledger transaction failed: {message}",
        /// A payment rule refused the operation; nothing was written.
        Rejected { rejection: PaymentRejection } =>
            "payment rejected: {rejection}",
    }
}

impl From<PaymentRejection> for PaymentLedgerError {
    fn from(rejection: PaymentRejection) -> Self {
        Self::Rejected { rejection }
    }
}

/// Port for moving money between profile balances.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentLedger: Send + Sync {
    /// Pay job `job_id` from `payer_id` to the contract's contractor and mark
    /// the job paid at `paid_at`.
    async fn pay_for_job(
        &self,
        job_id: JobId,
        payer_id: ProfileId,
        paid_at: DateTime<Utc>,
    ) -> Result<PaymentReceipt, PaymentLedgerError>;

    /// Credit `amount` to `profile_id` within the deposit cap.
    async fn deposit(
        &self,
        profile_id: ProfileId,
        amount: Money,
    ) -> Result<DepositReceipt, PaymentLedgerError>;
}

/// Fixture ledger holding no jobs and no outstanding obligations.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePaymentLedger;

#[async_trait]
impl PaymentLedger for FixturePaymentLedger {
    async fn pay_for_job(
        &self,
        job_id: JobId,
        _payer_id: ProfileId,
        _paid_at: DateTime<Utc>,
    ) -> Result<PaymentReceipt, PaymentLedgerError> {
        Err(PaymentLedgerError::rejected(PaymentRejection::JobNotFound {
            job_id,
        }))
    }

    async fn deposit(
        &self,
        profile_id: ProfileId,
        _amount: Money,
    ) -> Result<DepositReceipt, PaymentLedgerError> {
        Err(PaymentLedgerError::rejected(
            PaymentRejection::NothingOutstanding { profile_id },
        ))
    }
}
