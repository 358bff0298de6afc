//! Job endpoints.
//!
//! ```text
//! GET  /jobs/unpaid         caller's unpaid jobs in in-progress contracts
//! POST /jobs/{job_id}/pay   pay a job as its client
//! GET  /jobs                every job
//! ```

use actix_web::{get, post, web};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{PayForJobRequest, PayForJobResponse};
use crate::domain::{Job, JobId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::Caller;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// A job as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobBody {
    #[schema(example = 2)]
    pub id: i64,
    #[schema(example = "work")]
    pub description: String,
    #[schema(value_type = f64, example = 201.0)]
    pub price: Decimal,
    pub paid: bool,
    /// Set exactly when `paid` is true.
    pub payment_date: Option<DateTime<Utc>>,
    #[schema(example = 2)]
    pub contract_id: i64,
}

impl From<Job> for JobBody {
    fn from(job: Job) -> Self {
        Self {
            id: job.id().get(),
            description: job.description().to_owned(),
            price: job.price().amount(),
            paid: job.is_paid(),
            payment_date: job.payment().paid_at(),
            contract_id: job.contract_id().get(),
        }
    }
}

/// Receipt returned after paying a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBody {
    #[schema(example = "Job Paid Successfully!")]
    pub message: String,
    pub job_id: i64,
    #[schema(value_type = f64, example = 201.0)]
    pub amount: Decimal,
    pub payer_id: i64,
    pub payee_id: i64,
    /// The payer's balance after the transfer.
    #[schema(value_type = f64, example = 949.0)]
    pub balance: Decimal,
    pub paid_at: DateTime<Utc>,
}

impl From<PayForJobResponse> for PaymentBody {
    fn from(response: PayForJobResponse) -> Self {
        let PayForJobResponse { message, receipt } = response;
        Self {
            message,
            job_id: receipt.job_id.get(),
            amount: receipt.amount.amount(),
            payer_id: receipt.payer_id.get(),
            payee_id: receipt.payee_id.get(),
            balance: receipt.payer_balance_after.amount(),
            paid_at: receipt.paid_at,
        }
    }
}

fn bodies(jobs: Vec<Job>) -> Vec<JobBody> {
    jobs.into_iter().map(JobBody::from).collect()
}

/// List the caller's unpaid jobs in in-progress contracts.
#[utoipa::path(
    get,
    path = "/jobs/unpaid",
    params(("profile_id" = i64, Header, description = "Acting profile id")),
    responses(
        (status = 200, description = "Unpaid jobs", body = [JobBody]),
        (status = 401, description = "Caller not identified", body = ErrorSchema),
        (status = 404, description = "No unpaid jobs", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["jobs"],
    operation_id = "listUnpaidJobs"
)]
#[get("/jobs/unpaid")]
pub async fn list_unpaid_jobs(
    state: web::Data<HttpState>,
    caller: Caller,
) -> ApiResult<web::Json<Vec<JobBody>>> {
    let jobs = state.jobs.list_unpaid_jobs(caller.id()).await?;
    Ok(web::Json(bodies(jobs)))
}

/// Pay a job from the caller's balance to the contractor.
///
/// Checks run in order: the job must be an unpaid job of one of the
/// caller's in-progress contracts (404), the caller must hold at least the
/// price (402), and the caller must be a client (403).
#[utoipa::path(
    post,
    path = "/jobs/{job_id}/pay",
    params(
        ("job_id" = i64, Path, description = "Job id"),
        ("profile_id" = i64, Header, description = "Acting profile id")
    ),
    responses(
        (status = 200, description = "Job paid", body = PaymentBody),
        (status = 400, description = "Malformed job id", body = ErrorSchema),
        (status = 401, description = "Caller not identified", body = ErrorSchema),
        (status = 402, description = "Insufficient balance", body = ErrorSchema),
        (status = 403, description = "Caller is not a client", body = ErrorSchema),
        (status = 404, description = "No payable job", body = ErrorSchema),
        (status = 500, description = "Payment rolled back", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "payForJob"
)]
#[post("/jobs/{job_id}/pay")]
pub async fn pay_for_job(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
) -> ApiResult<web::Json<PaymentBody>> {
    let job_id = JobId::new(parse_id(&path.into_inner(), FieldName::new("job_id"))?);
    let response = state
        .payments
        .pay_for_job(PayForJobRequest {
            job_id,
            payer_id: caller.id(),
        })
        .await?;
    Ok(web::Json(response.into()))
}

/// List every job.
#[utoipa::path(
    get,
    path = "/jobs",
    responses(
        (status = 200, description = "All jobs", body = [JobBody]),
        (status = 404, description = "No jobs exist", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "listAllJobs",
    security([])
)]
#[get("/jobs")]
pub async fn list_all_jobs(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<JobBody>>> {
    let jobs = state.jobs.list_all_jobs().await?;
    Ok(web::Json(bodies(jobs)))
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
