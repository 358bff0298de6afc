//! Balance deposit endpoint.
//!
//! ```text
//! POST /balances/deposit/{userId}   {"amount": 50.25}
//! ```
//!
//! A deposit may not exceed a quarter of the unpaid price total across the
//! recipient's in-progress contracts as client.

use actix_web::{post, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ProfileId;
use crate::domain::ports::{DepositRequest, DepositResponse};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::Caller;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_deposit_amount, parse_id};

/// Deposit request payload.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct DepositRequestBody {
    /// Amount to credit; positive with at most two decimals.
    #[schema(value_type = f64, example = 50.25)]
    pub amount: Decimal,
}

/// Confirmation returned after a deposit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepositBody {
    #[schema(example = "Amount Deposited Successfully!")]
    pub message: String,
    pub profile_id: i64,
    #[schema(value_type = f64, example = 50.25)]
    pub amount: Decimal,
    /// The recipient's balance after the deposit.
    #[schema(value_type = f64, example = 1200.25)]
    pub balance: Decimal,
}

impl From<DepositResponse> for DepositBody {
    fn from(response: DepositResponse) -> Self {
        let DepositResponse { message, receipt } = response;
        Self {
            message,
            profile_id: receipt.profile_id.get(),
            amount: receipt.amount.amount(),
            balance: receipt.balance_after.amount(),
        }
    }
}

/// Credit a client's balance within the deposit cap.
#[utoipa::path(
    post,
    path = "/balances/deposit/{userId}",
    params(
        ("userId" = i64, Path, description = "Profile receiving the deposit"),
        ("profile_id" = i64, Header, description = "Acting profile id")
    ),
    request_body = DepositRequestBody,
    responses(
        (status = 200, description = "Deposit applied", body = DepositBody),
        (status = 400, description = "Malformed id or amount", body = ErrorSchema),
        (status = 401, description = "Caller not identified", body = ErrorSchema),
        (status = 404, description = "Recipient owes nothing", body = ErrorSchema),
        (status = 409, description = "Deposit cap exceeded", body = ErrorSchema),
        (status = 500, description = "Deposit rolled back", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "deposit"
)]
#[post("/balances/deposit/{userId}")]
pub async fn deposit(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
    payload: web::Json<DepositRequestBody>,
) -> ApiResult<web::Json<DepositBody>> {
    let profile_id = ProfileId::new(parse_id(&path.into_inner(), FieldName::new("userId"))?);
    let amount = parse_deposit_amount(payload.into_inner().amount)?;
    tracing::debug!(caller = %caller.id(), %profile_id, "deposit requested");
    let response = state
        .payments
        .deposit(DepositRequest { profile_id, amount })
        .await?;
    Ok(web::Json(response.into()))
}

#[cfg(test)]
mod tests {
    use actix_web::dev::ServiceResponse;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::Money;
    use crate::domain::ports::ProfileRepository;
    use crate::inbound::http::caller::PROFILE_ID_HEADER;
    use crate::inbound::http::test_utils::demo_store;
    use crate::inbound::http::validation::json_config;
    use crate::outbound::memory::InMemoryMarketplace;

    #[fixture]
    fn store() -> InMemoryMarketplace {
        demo_store()
    }

    async fn post_deposit(
        store: &InMemoryMarketplace,
        user: &str,
        body: Value,
        caller: Option<&str>,
    ) -> ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(HttpState::over_memory(
                    store,
                    std::sync::Arc::new(mockable::DefaultClock),
                )))
                .app_data(json_config())
                .service(deposit),
        )
        .await;
        let mut req = test::TestRequest::post()
            .uri(&format!("/balances/deposit/{user}"))
            .set_json(body);
        if let Some(id) = caller {
            req = req.insert_header((PROFILE_ID_HEADER, id));
        }
        test::call_service(&app, req.to_request()).await
    }

    async fn balance(store: &InMemoryMarketplace, id: i64) -> Money {
        store
            .find_by_id(ProfileId::new(id))
            .await
            .expect("lookup")
            .expect("profile exists")
            .balance()
    }

    fn cents(value: i64) -> Money {
        Money::from_minor_units(value).expect("valid cents")
    }

    #[rstest]
    #[actix_web::test]
    async fn deposit_within_cap_is_credited(store: InMemoryMarketplace) {
        // Jobs 3 and 4 leave 402.00 outstanding, so up to 100.50 is allowed.
        let res = post_deposit(&store, "2", json!({ "amount": 60 }), Some("2")).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: DepositBody = test::read_body_json(res).await;
        assert_eq!(body.message, "Amount Deposited Successfully!");
        assert_eq!(body.profile_id, 2);
        assert_eq!(body.amount, cents(6_000).amount());
        assert_eq!(body.balance, cents(29_111).amount());
        assert_eq!(balance(&store, 2).await, cents(29_111));
    }

    #[rstest]
    #[actix_web::test]
    async fn deposit_at_exactly_the_cap_is_accepted(store: InMemoryMarketplace) {
        let res = post_deposit(&store, "2", json!({ "amount": 100.5 }), Some("1")).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(balance(&store, 2).await, cents(33_161));
    }

    #[rstest]
    #[actix_web::test]
    async fn deposit_over_cap_is_a_conflict(store: InMemoryMarketplace) {
        let res = post_deposit(&store, "4", json!({ "amount": 60 }), Some("4")).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "deposit_cap_exceeded");
        assert_eq!(body["details"]["maxDeposit"], json!(50.0));
        assert_eq!(balance(&store, 4).await, cents(130));

        let retry = post_deposit(&store, "4", json!({ "amount": 40 }), Some("4")).await;
        assert_eq!(retry.status(), StatusCode::OK);
        assert_eq!(balance(&store, 4).await, cents(4_130));
    }

    #[rstest]
    #[case("3")]
    #[case("6")]
    #[case("99")]
    #[actix_web::test]
    async fn nothing_outstanding_is_not_found(store: InMemoryMarketplace, #[case] user: &str) {
        let res = post_deposit(&store, user, json!({ "amount": 1 }), Some("1")).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[case(json!({ "amount": 0 }))]
    #[case(json!({ "amount": -5 }))]
    #[case(json!({ "amount": 1.005 }))]
    #[actix_web::test]
    async fn invalid_amounts_are_rejected(store: InMemoryMarketplace, #[case] body: Value) {
        let res = post_deposit(&store, "2", body, Some("2")).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["code"], "invalid_amount");
        assert_eq!(balance(&store, 2).await, cents(23_111));
    }

    #[rstest]
    #[case(json!({ "amount": 1e27 }))]
    #[case(json!({ "amount": 10_000_000_000_u64 }))]
    #[actix_web::test]
    async fn oversized_amount_is_rejected_and_store_stays_usable(
        store: InMemoryMarketplace,
        #[case] body: Value,
    ) {
        let res = post_deposit(&store, "2", body, Some("2")).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["code"], "invalid_amount");

        let next = post_deposit(&store, "2", json!({ "amount": 60 }), Some("2")).await;
        assert_eq!(next.status(), StatusCode::OK);
        assert_eq!(balance(&store, 2).await, cents(29_111));
    }

    #[rstest]
    #[case(json!({ "amount": "lots" }))]
    #[case(json!({}))]
    #[case(json!({ "amount": 5, "currency": "EUR" }))]
    #[actix_web::test]
    async fn undecodable_bodies_are_json_bad_requests(
        store: InMemoryMarketplace,
        #[case] body: Value,
    ) {
        let res = post_deposit(&store, "2", body, Some("2")).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_recipient_is_a_bad_request(store: InMemoryMarketplace) {
        let res = post_deposit(&store, "abc", json!({ "amount": 1 }), Some("2")).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[actix_web::test]
    async fn deposit_requires_a_caller(store: InMemoryMarketplace) {
        let res = post_deposit(&store, "2", json!({ "amount": 1 }), None).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
