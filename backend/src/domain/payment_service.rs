//! Payment and deposit service implementing [`PaymentsCommand`].
//!
//! The service stamps payments with the injected clock, delegates the unit of
//! work to a [`PaymentLedger`], and maps ledger outcomes onto domain errors.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::payments::{DEPOSIT_ACCEPTED_MESSAGE, JOB_PAID_MESSAGE};
use crate::domain::ports::{
    DepositRequest, DepositResponse, PayForJobRequest, PayForJobResponse, PaymentLedger,
    PaymentLedgerError, PaymentsCommand,
};
use crate::domain::{Error, PaymentRejection};

pub(crate) const NOT_FOUND_MESSAGE: &str = "No Records Found!";
const INSUFFICIENT_BALANCE_MESSAGE: &str = "Insufficient Balance!";
const NOT_AUTHORIZED_TO_PAY_MESSAGE: &str = "User Is Not Authorized To Pay!";
const DEPOSIT_CAP_MESSAGE: &str = "Maximum Deposit Amount Exceeded.";
const PAYMENT_FAILED_MESSAGE: &str = "Error! while paying for the job";
const DEPOSIT_FAILED_MESSAGE: &str = "Error! while depositing money.";

fn map_rejection(rejection: &PaymentRejection, failure_message: &str) -> Error {
    match rejection {
        PaymentRejection::JobNotFound { .. }
        | PaymentRejection::ProfileNotFound { .. }
        | PaymentRejection::NothingOutstanding { .. } => Error::not_found(NOT_FOUND_MESSAGE),
        PaymentRejection::InsufficientFunds { balance, price } => {
            Error::insufficient_funds(INSUFFICIENT_BALANCE_MESSAGE).with_details(json!({
                "balance": balance,
                "price": price,
            }))
        }
        PaymentRejection::PayerNotClient { .. } => Error::forbidden(NOT_AUTHORIZED_TO_PAY_MESSAGE),
        PaymentRejection::DepositCapExceeded { requested, cap } => {
            Error::deposit_cap_exceeded(DEPOSIT_CAP_MESSAGE).with_details(json!({
                "requested": requested,
                "maxDeposit": cap,
            }))
        }
        PaymentRejection::BalanceOverflow { .. } => Error::transaction_failed(failure_message),
    }
}

fn map_ledger_error(error: PaymentLedgerError, failure_message: &str) -> Error {
    match error {
        PaymentLedgerError::Connection { message } => {
            Error::service_unavailable(format!("payment ledger unavailable: {message}"))
        }
        PaymentLedgerError::Transaction { message } => {
            tracing::error!(%message, "payment ledger transaction rolled back");
            Error::transaction_failed(failure_message)
        }
        PaymentLedgerError::Rejected { rejection } => map_rejection(&rejection, failure_message),
    }
}

/// Service moving money through a [`PaymentLedger`].
#[derive(Clone)]
pub struct PaymentService<L> {
    ledger: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<L> PaymentService<L> {
    /// Create a payment service over `ledger`, stamping payments with `clock`.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use marketplace::domain::PaymentService;
    /// # use marketplace::domain::ports::FixturePaymentLedger;
    /// # use mockable::DefaultClock;
    /// let service = PaymentService::new(Arc::new(FixturePaymentLedger), Arc::new(DefaultClock));
    /// # let _ = service;
    /// ```
    pub fn new(ledger: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self { ledger, clock }
    }
}

#[async_trait]
impl<L> PaymentsCommand for PaymentService<L>
where
    L: PaymentLedger,
{
    async fn pay_for_job(&self, request: PayForJobRequest) -> Result<PayForJobResponse, Error> {
        let PayForJobRequest { job_id, payer_id } = request;
        let paid_at = self.clock.utc();
        match self.ledger.pay_for_job(job_id, payer_id, paid_at).await {
            Ok(receipt) => {
                info!(
                    job_id = %receipt.job_id,
                    payer_id = %receipt.payer_id,
                    payee_id = %receipt.payee_id,
                    amount = %receipt.amount,
                    "job paid"
                );
                Ok(PayForJobResponse {
                    message: JOB_PAID_MESSAGE.to_owned(),
                    receipt,
                })
            }
            Err(err) => {
                warn!(%job_id, %payer_id, error = %err, "job payment refused");
                Err(map_ledger_error(err, PAYMENT_FAILED_MESSAGE))
            }
        }
    }

    async fn deposit(&self, request: DepositRequest) -> Result<DepositResponse, Error> {
        let DepositRequest { profile_id, amount } = request;
        match self.ledger.deposit(profile_id, amount).await {
            Ok(receipt) => {
                info!(
                    %profile_id,
                    %amount,
                    balance_after = %receipt.balance_after,
                    "deposit accepted"
                );
                Ok(DepositResponse {
                    message: DEPOSIT_ACCEPTED_MESSAGE.to_owned(),
                    receipt,
                })
            }
            Err(err) => {
                warn!(%profile_id, %amount, error = %err, "deposit refused");
                Err(map_ledger_error(err, DEPOSIT_FAILED_MESSAGE))
            }
        }
    }
}

#[cfg(test)]
#[path = "payment_service_tests.rs"]
mod tests;
