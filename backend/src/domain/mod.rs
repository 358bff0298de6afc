//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed marketplace entities used by the API
//! and persistence layers, the pure payment rules, and the services that
//! implement the driving ports. Types are immutable outside this module;
//! balances change only through [`payments`] plans applied by a
//! [`ports::PaymentLedger`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Profile, Contract, Job: marketplace records.
//! - Money: exact non-negative amount with two fractional digits.

pub mod contract;
pub mod error;
pub mod example_data;
pub mod job;
pub mod marketplace_service;
pub mod money;
pub mod payment_service;
pub mod payments;
pub mod ports;
pub mod profile;
pub mod reports;
pub mod reports_service;
pub mod trace_id;

pub use self::contract::{
    Contract, ContractDraft, ContractId, ContractStatus, ContractValidationError,
    UnknownContractStatus,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::job::{Job, JobDraft, JobId, JobPayment, JobValidationError};
pub use self::marketplace_service::MarketplaceQueryService;
pub use self::money::{MAX_STORED_AMOUNT, MONEY_SCALE, Money, MoneyValidationError};
pub use self::payment_service::PaymentService;
pub use self::payments::{
    DepositPlan, DepositReceipt, PaymentPlan, PaymentReceipt, PaymentRejection,
};
pub use self::profile::{
    Profile, ProfileDraft, ProfileId, ProfileRole, ProfileValidationError, UnknownProfileRole,
};
pub use self::reports::{
    BestClientsLimit, BestClientsLimitError, ClientSpend, ProfessionEarnings, ReportWindow,
    ReportWindowError,
};
pub use self::reports_service::AdminReportsService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use marketplace::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
