//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their serialised shape so utoipa can document them.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The `profile_id` header is missing, malformed or unknown.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The caller's role may not perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// Nothing matched the request.
    #[schema(rename = "not_found")]
    NotFound,
    /// The payer's balance is below the job price.
    #[schema(rename = "insufficient_funds")]
    InsufficientFunds,
    /// The deposit exceeds a quarter of the outstanding job total.
    #[schema(rename = "deposit_cap_exceeded")]
    DepositCapExceeded,
    /// The balance transfer was rolled back.
    #[schema(rename = "transaction_failed")]
    TransactionFailed,
    /// The database is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "No Records Found!")]
    message: String,
    /// Correlation identifier, also sent in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details such as the offending field or the deposit cap.
    details: Option<serde_json::Value>,
}
