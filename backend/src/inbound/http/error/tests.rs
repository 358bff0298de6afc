//! Tests for HTTP error mapping.

use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

async fn response_payload(
    error: Error,
    expected_status: StatusCode,
    expected_trace_id: Option<&str>,
) -> Error {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id is valid UTF-8");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should be absent"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON deserialises")
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("who"), StatusCode::UNAUTHORIZED)]
#[case(Error::insufficient_funds("Insufficient Balance!"), StatusCode::PAYMENT_REQUIRED)]
#[case(Error::forbidden("User Is Not Authorized To Pay!"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("No Records Found!"), StatusCode::NOT_FOUND)]
#[case(Error::deposit_cap_exceeded("Maximum Deposit Amount Exceeded."), StatusCode::CONFLICT)]
#[case(Error::transaction_failed("Error! while paying for the job"), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("connection string leaked")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"secret": "x"}));

    let payload = response_payload(
        error,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;

    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), "Internal server error");
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn transaction_failures_keep_their_generic_message(expected_trace_id: String) {
    let error = Error::transaction_failed("Error! while depositing money.")
        .with_trace_id(expected_trace_id.clone());

    let payload = response_payload(
        error,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;

    assert_eq!(payload.code(), ErrorCode::TransactionFailed);
    assert_eq!(payload.message(), "Error! while depositing money.");
}

#[rstest]
#[actix_web::test]
async fn cap_details_reach_the_client() {
    let error = Error::deposit_cap_exceeded("Maximum Deposit Amount Exceeded.")
        .with_details(json!({"requested": 60.0, "maxDeposit": 50.0}));

    let payload = response_payload(error, StatusCode::CONFLICT, None).await;

    assert_eq!(payload.code(), ErrorCode::DepositCapExceeded);
    assert_eq!(
        payload.details(),
        Some(&json!({"requested": 60.0, "maxDeposit": 50.0}))
    );
    assert_eq!(payload.trace_id(), None);
}

#[rstest]
fn actix_errors_become_internal() {
    let actix = actix_web::error::ErrorBadGateway("upstream");
    let error = Error::from(actix);
    assert_eq!(error.code(), ErrorCode::InternalError);
}
