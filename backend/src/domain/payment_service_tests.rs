//! Tests for the payment service.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use mockable::MockClock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockPaymentLedger;
use crate::domain::{DepositReceipt, ErrorCode, JobId, Money, PaymentReceipt, ProfileId};

fn paid_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 8, 15, 19, 11, 26)
        .single()
        .expect("valid timestamp")
}

fn money(cents: i64) -> Money {
    Money::from_minor_units(cents).expect("valid cents")
}

#[fixture]
fn clock() -> Arc<dyn Clock> {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(paid_at());
    Arc::new(clock)
}

fn pay_request() -> PayForJobRequest {
    PayForJobRequest {
        job_id: JobId::new(2),
        payer_id: ProfileId::new(1),
    }
}

#[rstest]
#[tokio::test]
async fn pay_for_job_passes_clock_time_and_returns_receipt(clock: Arc<dyn Clock>) {
    let mut ledger = MockPaymentLedger::new();
    ledger
        .expect_pay_for_job()
        .withf(|job_id, payer_id, at| {
            *job_id == JobId::new(2) && *payer_id == ProfileId::new(1) && *at == paid_at()
        })
        .times(1)
        .return_once(|job_id, payer_id, at| {
            Ok(PaymentReceipt {
                job_id,
                amount: money(20_100),
                payer_id,
                payee_id: ProfileId::new(6),
                payer_balance_after: money(94_899),
                paid_at: at,
            })
        });

    let service = PaymentService::new(Arc::new(ledger), clock);
    let response = service
        .pay_for_job(pay_request())
        .await
        .expect("payment succeeds");

    assert_eq!(response.message, "Job Paid Successfully!");
    assert_eq!(response.receipt.payee_id, ProfileId::new(6));
    assert_eq!(response.receipt.paid_at, paid_at());
}

#[rstest]
#[case(
    PaymentRejection::JobNotFound { job_id: JobId::new(2) },
    ErrorCode::NotFound,
    "No Records Found!"
)]
#[case(
    PaymentRejection::InsufficientFunds { balance: money(5_000), price: money(8_000) },
    ErrorCode::InsufficientFunds,
    "Insufficient Balance!"
)]
#[case(
    PaymentRejection::PayerNotClient { profile_id: ProfileId::new(1) },
    ErrorCode::Forbidden,
    "User Is Not Authorized To Pay!"
)]
#[tokio::test]
async fn pay_for_job_maps_rejections(
    clock: Arc<dyn Clock>,
    #[case] rejection: PaymentRejection,
    #[case] code: ErrorCode,
    #[case] message: &str,
) {
    let mut ledger = MockPaymentLedger::new();
    ledger
        .expect_pay_for_job()
        .times(1)
        .return_once(move |_, _, _| Err(PaymentLedgerError::rejected(rejection)));

    let service = PaymentService::new(Arc::new(ledger), clock);
    let error = service
        .pay_for_job(pay_request())
        .await
        .expect_err("payment refused");

    assert_eq!(error.code(), code);
    assert_eq!(error.message(), message);
}

#[rstest]
#[tokio::test]
async fn rolled_back_payment_reports_generic_failure(clock: Arc<dyn Clock>) {
    let mut ledger = MockPaymentLedger::new();
    ledger
        .expect_pay_for_job()
        .times(1)
        .return_once(|_, _, _| Err(PaymentLedgerError::transaction("credit failed")));

    let service = PaymentService::new(Arc::new(ledger), clock);
    let error = service
        .pay_for_job(pay_request())
        .await
        .expect_err("payment rolled back");

    assert_eq!(error.code(), ErrorCode::TransactionFailed);
    assert_eq!(error.message(), "Error! while paying for the job");
}

#[rstest]
#[tokio::test]
async fn unreachable_ledger_is_service_unavailable(clock: Arc<dyn Clock>) {
    let mut ledger = MockPaymentLedger::new();
    ledger
        .expect_deposit()
        .times(1)
        .return_once(|_, _| Err(PaymentLedgerError::connection("pool timed out")));

    let service = PaymentService::new(Arc::new(ledger), clock);
    let error = service
        .deposit(DepositRequest {
            profile_id: ProfileId::new(2),
            amount: money(1_000),
        })
        .await
        .expect_err("ledger unavailable");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn deposit_returns_new_balance(clock: Arc<dyn Clock>) {
    let mut ledger = MockPaymentLedger::new();
    ledger
        .expect_deposit()
        .withf(|profile_id, amount| *profile_id == ProfileId::new(2) && *amount == money(4_000))
        .times(1)
        .return_once(|profile_id, amount| {
            Ok(DepositReceipt {
                profile_id,
                amount,
                balance_after: money(27_111),
            })
        });

    let service = PaymentService::new(Arc::new(ledger), clock);
    let response = service
        .deposit(DepositRequest {
            profile_id: ProfileId::new(2),
            amount: money(4_000),
        })
        .await
        .expect("deposit succeeds");

    assert_eq!(response.message, "Amount Deposited Successfully!");
    assert_eq!(response.receipt.balance_after, money(27_111));
}

#[rstest]
#[tokio::test]
async fn capped_deposit_reports_the_maximum(clock: Arc<dyn Clock>) {
    let mut ledger = MockPaymentLedger::new();
    ledger.expect_deposit().times(1).return_once(|_, amount| {
        Err(PaymentLedgerError::rejected(
            PaymentRejection::DepositCapExceeded {
                requested: amount,
                cap: money(5_000),
            },
        ))
    });

    let service = PaymentService::new(Arc::new(ledger), clock);
    let error = service
        .deposit(DepositRequest {
            profile_id: ProfileId::new(2),
            amount: money(6_000),
        })
        .await
        .expect_err("deposit capped");

    assert_eq!(error.code(), ErrorCode::DepositCapExceeded);
    assert_eq!(error.message(), "Maximum Deposit Amount Exceeded.");
    let details = error.details().expect("cap details");
    assert_eq!(details["maxDeposit"], serde_json::json!(50.0));
}
