//! Driving port for balance-changing operations.
//!
//! Both operations are all-or-nothing: a returned error means no balance and
//! no job changed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{DepositReceipt, Error, JobId, Money, PaymentReceipt, ProfileId};

/// Request to pay for a job as `payer_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayForJobRequest {
    pub job_id: JobId,
    pub payer_id: ProfileId,
}

/// Confirmation of a committed job payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayForJobResponse {
    pub message: String,
    pub receipt: PaymentReceipt,
}

/// Request to credit `amount` to `profile_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    pub profile_id: ProfileId,
    pub amount: Money,
}

/// Confirmation of a committed deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositResponse {
    pub message: String,
    pub receipt: DepositReceipt,
}

/// Payment and deposit use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentsCommand: Send + Sync {
    /// Transfer the job's price from the payer to the contractor and mark the
    /// job paid.
    ///
    /// Fails with `not_found` when the job is not an unpaid job of one of the
    /// payer's in-progress contracts, then `insufficient_funds`, then
    /// `forbidden` when the payer is not a client.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use marketplace::domain::{JobId, ProfileId};
    /// # use marketplace::domain::ports::{PayForJobRequest, PaymentsCommand};
    /// # async fn example(payments: &dyn PaymentsCommand) -> Result<(), marketplace::domain::Error> {
    /// let response = payments
    ///     .pay_for_job(PayForJobRequest {
    ///         job_id: JobId::new(2),
    ///         payer_id: ProfileId::new(1),
    ///     })
    ///     .await?;
    /// assert_eq!(response.message, "Job Paid Successfully!");
    /// # Ok(())
    /// # }
    /// ```
    async fn pay_for_job(&self, request: PayForJobRequest) -> Result<PayForJobResponse, Error>;

    /// Credit a deposit of at most a quarter of the profile's unpaid
    /// in-progress job total.
    async fn deposit(&self, request: DepositRequest) -> Result<DepositResponse, Error>;
}
