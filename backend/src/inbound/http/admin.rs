//! Admin reporting endpoints.
//!
//! ```text
//! GET /admin/best-profession?start=..&end=..
//! GET /admin/best-clients?start=..&end=..&limit=..
//! ```
//!
//! Both windows are inclusive and match on the job's payment date.

use actix_web::{get, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{ClientSpend, ProfessionEarnings};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_limit, parse_window};

/// Report window parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WindowQuery {
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    #[param(example = "2020-08-01")]
    pub start: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`; a plain date covers the whole day.
    #[param(example = "2020-08-31")]
    pub end: Option<String>,
}

/// Best-clients parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BestClientsQuery {
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    #[param(example = "2020-08-01")]
    pub start: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`; a plain date covers the whole day.
    #[param(example = "2020-08-31")]
    pub end: Option<String>,
    /// Number of clients to return, 1 to 100. Defaults to 2.
    #[param(minimum = 1, maximum = 100, example = 2)]
    pub limit: Option<i64>,
}

/// The highest-earning profession in a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BestProfessionBody {
    #[schema(example = "Programmer")]
    pub profession: String,
    #[schema(value_type = f64, example = 2683.0)]
    pub earned: Decimal,
}

impl From<ProfessionEarnings> for BestProfessionBody {
    fn from(value: ProfessionEarnings) -> Self {
        Self {
            profession: value.profession,
            earned: value.earned.amount(),
        }
    }
}

/// One entry of the best-clients ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BestClientBody {
    #[schema(example = 4)]
    pub id: i64,
    #[schema(example = "Ash Kethcum")]
    pub full_name: String,
    #[schema(value_type = f64, example = 2020.0)]
    pub paid: Decimal,
}

impl From<ClientSpend> for BestClientBody {
    fn from(value: ClientSpend) -> Self {
        Self {
            id: value.id.get(),
            full_name: value.full_name,
            paid: value.paid.amount(),
        }
    }
}

/// Report the contractor profession that earned the most in the window.
///
/// The answer is a list holding at most one entry; it is empty when nothing
/// was paid in the window.
#[utoipa::path(
    get,
    path = "/admin/best-profession",
    params(WindowQuery),
    responses(
        (status = 200, description = "Top-earning profession, or none", body = [BestProfessionBody]),
        (status = 400, description = "Invalid window", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "bestProfession",
    security([])
)]
#[get("/admin/best-profession")]
pub async fn best_profession(
    state: web::Data<HttpState>,
    query: web::Query<WindowQuery>,
) -> ApiResult<web::Json<Vec<BestProfessionBody>>> {
    let query = query.into_inner();
    let window = parse_window(query.start.as_deref(), query.end.as_deref())?;
    let best = state.reports.best_profession(window).await?;
    Ok(web::Json(best.into_iter().map(BestProfessionBody::from).collect()))
}

/// Rank the clients that paid the most in the window.
#[utoipa::path(
    get,
    path = "/admin/best-clients",
    params(BestClientsQuery),
    responses(
        (status = 200, description = "Clients by amount paid, highest first", body = [BestClientBody]),
        (status = 400, description = "Invalid window or limit", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "bestClients",
    security([])
)]
#[get("/admin/best-clients")]
pub async fn best_clients(
    state: web::Data<HttpState>,
    query: web::Query<BestClientsQuery>,
) -> ApiResult<web::Json<Vec<BestClientBody>>> {
    let query = query.into_inner();
    let window = parse_window(query.start.as_deref(), query.end.as_deref())?;
    let limit = parse_limit(query.limit)?;
    let ranked = state.reports.best_clients(window, limit).await?;
    Ok(web::Json(ranked.into_iter().map(BestClientBody::from).collect()))
}
