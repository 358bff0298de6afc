//! Tests for the in-memory store.

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::example_data::demo_dataset;
use crate::domain::{ContractDraft, JobDraft, JobPayment, ProfileDraft};

fn money(cents: i64) -> Money {
    Money::from_minor_units(cents).expect("valid cents")
}

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 8, day, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn profile(id: i64, role: ProfileRole, cents: i64) -> Profile {
    Profile::new(ProfileDraft {
        id: ProfileId::new(id),
        first_name: format!("First{id}"),
        last_name: format!("Last{id}"),
        profession: "Trade".to_owned(),
        balance: money(cents),
        role,
    })
    .expect("valid profile")
}

fn contract(id: i64, status: ContractStatus) -> Contract {
    Contract::new(ContractDraft {
        id: ContractId::new(id),
        terms: "terms".to_owned(),
        status,
        client_id: ProfileId::new(1),
        contractor_id: ProfileId::new(2),
    })
    .expect("valid contract")
}

fn job(id: i64, cents: i64, contract: i64, payment: JobPayment) -> Job {
    Job::new(JobDraft {
        id: JobId::new(id),
        description: "work".to_owned(),
        price: money(cents),
        payment,
        contract_id: ContractId::new(contract),
    })
    .expect("valid job")
}

/// Client 1 holding `balance`, contractor 2 holding 10.00, and one unpaid
/// in-progress job 1 priced at `price`.
fn store_with(balance: i64, price: i64) -> InMemoryMarketplace {
    InMemoryMarketplace::with_dataset(ExampleDataset {
        profiles: vec![
            profile(1, ProfileRole::Client, balance),
            profile(2, ProfileRole::Contractor, 1_000),
        ],
        contracts: vec![contract(1, ContractStatus::InProgress)],
        jobs: vec![job(1, price, 1, JobPayment::Unpaid)],
    })
}

async fn balance_of(store: &InMemoryMarketplace, id: i64) -> Money {
    store
        .find_by_id(ProfileId::new(id))
        .await
        .expect("lookup succeeds")
        .expect("profile exists")
        .balance()
}

async fn job_state(store: &InMemoryMarketplace, id: i64) -> JobPayment {
    JobRepository::list_all(store)
        .await
        .expect("list succeeds")
        .into_iter()
        .find(|j| j.id() == JobId::new(id))
        .expect("job exists")
        .payment()
}

#[fixture]
fn demo() -> InMemoryMarketplace {
    InMemoryMarketplace::with_dataset(demo_dataset().expect("valid dataset"))
}

#[rstest]
#[tokio::test]
async fn payment_moves_price_and_marks_job_paid() {
    let store = store_with(10_000, 8_000);

    let receipt = store
        .pay_for_job(JobId::new(1), ProfileId::new(1), at(15))
        .await
        .expect("payment succeeds");

    assert_eq!(receipt.payer_balance_after, money(2_000));
    assert_eq!(balance_of(&store, 1).await, money(2_000));
    assert_eq!(balance_of(&store, 2).await, money(9_000));
    assert_eq!(job_state(&store, 1).await, JobPayment::Paid { paid_at: at(15) });
}

#[rstest]
#[tokio::test]
async fn insufficient_balance_changes_nothing() {
    let store = store_with(5_000, 8_000);

    let err = store
        .pay_for_job(JobId::new(1), ProfileId::new(1), at(15))
        .await
        .expect_err("insufficient funds");

    assert!(matches!(
        err,
        PaymentLedgerError::Rejected {
            rejection: PaymentRejection::InsufficientFunds { .. }
        }
    ));
    assert_eq!(balance_of(&store, 1).await, money(5_000));
    assert_eq!(balance_of(&store, 2).await, money(1_000));
    assert_eq!(job_state(&store, 1).await, JobPayment::Unpaid);
}

#[rstest]
#[case(LedgerStep::Debit)]
#[case(LedgerStep::Credit)]
#[case(LedgerStep::MarkPaid)]
#[tokio::test]
async fn failed_step_leaves_no_partial_effects(#[case] step: LedgerStep) {
    let store = store_with(10_000, 8_000).failing_at(step);

    let err = store
        .pay_for_job(JobId::new(1), ProfileId::new(1), at(15))
        .await
        .expect_err("injected failure");

    assert!(matches!(err, PaymentLedgerError::Transaction { .. }));
    assert_eq!(balance_of(&store, 1).await, money(10_000));
    assert_eq!(balance_of(&store, 2).await, money(1_000));
    assert_eq!(job_state(&store, 1).await, JobPayment::Unpaid);
}

#[rstest]
#[tokio::test]
async fn paid_job_is_never_charged_twice() {
    let store = store_with(20_000, 8_000);
    store
        .pay_for_job(JobId::new(1), ProfileId::new(1), at(15))
        .await
        .expect("first payment succeeds");

    let err = store
        .pay_for_job(JobId::new(1), ProfileId::new(1), at(16))
        .await
        .expect_err("already paid");

    assert_eq!(
        err,
        PaymentLedgerError::rejected(PaymentRejection::JobNotFound {
            job_id: JobId::new(1)
        })
    );
    assert_eq!(balance_of(&store, 1).await, money(12_000));
    assert_eq!(balance_of(&store, 2).await, money(9_000));
}

#[rstest]
#[tokio::test]
async fn contractor_cannot_pay_someone_elses_job() {
    let store = store_with(10_000, 8_000);

    let err = store
        .pay_for_job(JobId::new(1), ProfileId::new(2), at(15))
        .await
        .expect_err("not the client");

    assert!(matches!(
        err,
        PaymentLedgerError::Rejected {
            rejection: PaymentRejection::JobNotFound { .. }
        }
    ));
}

#[rstest]
#[tokio::test]
async fn payments_conserve_money(demo: InMemoryMarketplace) {
    let total = |profiles: Vec<Profile>| {
        profiles
            .iter()
            .try_fold(Money::ZERO, |acc, p| acc.checked_add(p.balance()))
            .expect("no overflow")
    };
    let before = total(ProfileRepository::list_all(&demo).await.expect("profiles"));

    demo.pay_for_job(JobId::new(2), ProfileId::new(1), at(20))
        .await
        .expect("job 2 payable by Harry");
    demo.pay_for_job(JobId::new(3), ProfileId::new(2), at(20))
        .await
        .expect("job 3 payable by Mr Robot");

    let after = total(ProfileRepository::list_all(&demo).await.expect("profiles"));
    assert_eq!(before, after);
}

#[rstest]
#[case(6_000, false)]
#[case(4_000, true)]
#[case(5_000, true)]
#[tokio::test]
async fn deposit_is_capped_by_outstanding_jobs(#[case] amount: i64, #[case] accepted: bool) {
    let store = store_with(10_000, 20_000);

    let result = store.deposit(ProfileId::new(1), money(amount)).await;

    if accepted {
        let receipt = result.expect("deposit accepted");
        assert_eq!(receipt.balance_after, money(10_000 + amount));
        assert_eq!(balance_of(&store, 1).await, money(10_000 + amount));
    } else {
        assert_eq!(
            result.expect_err("deposit capped"),
            PaymentLedgerError::rejected(PaymentRejection::DepositCapExceeded {
                requested: money(amount),
                cap: money(5_000),
            })
        );
        assert_eq!(balance_of(&store, 1).await, money(10_000));
    }
}

#[rstest]
#[tokio::test]
async fn oversized_deposit_is_refused_without_poisoning_the_store() {
    let store = store_with(10_000, 20_000);
    let huge = Money::new(rust_decimal::Decimal::MAX).expect("valid amount");

    let err = store
        .deposit(ProfileId::new(1), huge)
        .await
        .expect_err("deposit capped");

    assert!(matches!(
        err,
        PaymentLedgerError::Rejected {
            rejection: PaymentRejection::DepositCapExceeded { .. }
        }
    ));
    assert_eq!(balance_of(&store, 1).await, money(10_000));
    store
        .deposit(ProfileId::new(1), money(1_000))
        .await
        .expect("store still accepts deposits");
}

#[rstest]
#[tokio::test]
async fn overflowing_outstanding_total_is_rejected() {
    let max_price = Money::new(rust_decimal::Decimal::MAX).expect("valid amount");
    let big_job = |id| {
        Job::new(JobDraft {
            id: JobId::new(id),
            description: "work".to_owned(),
            price: max_price,
            payment: JobPayment::Unpaid,
            contract_id: ContractId::new(1),
        })
        .expect("valid job")
    };
    let store = InMemoryMarketplace::with_dataset(ExampleDataset {
        profiles: vec![
            profile(1, ProfileRole::Client, 10_000),
            profile(2, ProfileRole::Contractor, 0),
        ],
        contracts: vec![contract(1, ContractStatus::InProgress)],
        jobs: vec![big_job(1), big_job(2)],
    });

    let err = store
        .deposit(ProfileId::new(1), money(100))
        .await
        .expect_err("total overflows");

    assert_eq!(
        err,
        PaymentLedgerError::rejected(PaymentRejection::BalanceOverflow {
            profile_id: ProfileId::new(1)
        })
    );
    assert_eq!(balance_of(&store, 1).await, money(10_000));
}

#[rstest]
#[tokio::test]
async fn deposit_without_outstanding_jobs_is_not_found() {
    let store = InMemoryMarketplace::with_dataset(ExampleDataset {
        profiles: vec![
            profile(1, ProfileRole::Client, 10_000),
            profile(2, ProfileRole::Contractor, 0),
        ],
        contracts: vec![contract(1, ContractStatus::New)],
        jobs: vec![job(1, 20_000, 1, JobPayment::Unpaid)],
    });

    let err = store
        .deposit(ProfileId::new(1), money(100))
        .await
        .expect_err("nothing outstanding");

    assert_eq!(
        err,
        PaymentLedgerError::rejected(PaymentRejection::NothingOutstanding {
            profile_id: ProfileId::new(1)
        })
    );
}

#[rstest]
#[tokio::test]
async fn contract_lookup_is_scoped_to_participants(demo: InMemoryMarketplace) {
    let own = demo
        .find_for_participant(ContractId::new(1), ProfileId::new(5))
        .await
        .expect("lookup succeeds");
    assert!(own.is_some());

    let foreign = demo
        .find_for_participant(ContractId::new(1), ProfileId::new(2))
        .await
        .expect("lookup succeeds");
    assert!(foreign.is_none());
}

#[rstest]
#[tokio::test]
async fn active_contracts_exclude_terminated(demo: InMemoryMarketplace) {
    let ids: Vec<i64> = demo
        .list_active_for_participant(ProfileId::new(1))
        .await
        .expect("list succeeds")
        .iter()
        .map(|c| c.id().get())
        .collect();
    assert_eq!(ids, vec![2]);
}

#[rstest]
#[tokio::test]
async fn unpaid_jobs_cover_both_sides_of_in_progress_contracts(demo: InMemoryMarketplace) {
    let ids: Vec<i64> = demo
        .list_unpaid_for_participant(ProfileId::new(7))
        .await
        .expect("list succeeds")
        .iter()
        .map(|j| j.id().get())
        .collect();
    assert_eq!(ids, vec![4, 5]);
}

#[rstest]
#[tokio::test]
async fn best_profession_sums_paid_jobs_in_window(demo: InMemoryMarketplace) {
    let window = ReportWindow::new(at(1), at(31)).expect("valid window");
    let best = demo
        .best_profession(window)
        .await
        .expect("report succeeds")
        .expect("some profession earned");
    assert_eq!(best.profession, "Programmer");
    assert_eq!(best.earned, money(268_300));
}

#[rstest]
#[tokio::test]
async fn best_clients_rank_by_amount_then_id(demo: InMemoryMarketplace) {
    let window = ReportWindow::new(at(1), at(31)).expect("valid window");
    let limit = BestClientsLimit::new(3).expect("valid limit");
    let ranked = demo
        .best_clients(window, limit)
        .await
        .expect("report succeeds");
    let summary: Vec<(i64, Money)> = ranked.iter().map(|c| (c.id.get(), c.paid)).collect();
    assert_eq!(
        summary,
        vec![(4, money(202_000)), (1, money(44_200)), (2, money(44_200))]
    );
    assert_eq!(ranked.first().map(|c| c.full_name.as_str()), Some("Ash Kethcum"));
}

#[rstest]
#[tokio::test]
async fn reports_are_empty_outside_payment_dates(demo: InMemoryMarketplace) {
    let start = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).single().expect("start");
    let window = ReportWindow::new(start, start).expect("valid window");
    assert!(demo.best_profession(window).await.expect("report").is_none());
    assert!(
        demo.best_clients(window, BestClientsLimit::default())
            .await
            .expect("report")
            .is_empty()
    );
}

#[rstest]
#[tokio::test]
async fn seeding_applies_once() {
    let store = InMemoryMarketplace::new();
    let dataset = demo_dataset().expect("valid dataset");

    let first = store.seed_example_data(&dataset).await.expect("seed");
    let second = store.seed_example_data(&dataset).await.expect("seed");

    assert_eq!(first, SeedingResult::Applied);
    assert_eq!(second, SeedingResult::AlreadySeeded);
    assert_eq!(
        ProfileRepository::list_all(&store).await.expect("profiles").len(),
        8
    );
}
