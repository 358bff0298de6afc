//! Contract endpoints.
//!
//! ```text
//! GET /contracts/{id}   caller's contract
//! GET /contracts        caller's non-terminated contracts
//! GET /allContracts     every contract
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Contract, ContractId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::Caller;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// A contract as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractBody {
    #[schema(example = 2)]
    pub id: i64,
    #[schema(example = "bla bla bla")]
    pub terms: String,
    /// `new`, `in_progress` or `terminated`.
    #[schema(example = "in_progress")]
    pub status: String,
    #[schema(example = 1)]
    pub client_id: i64,
    #[schema(example = 6)]
    pub contractor_id: i64,
}

impl From<Contract> for ContractBody {
    fn from(contract: Contract) -> Self {
        Self {
            id: contract.id().get(),
            terms: contract.terms().to_owned(),
            status: contract.status().as_str().to_owned(),
            client_id: contract.client_id().get(),
            contractor_id: contract.contractor_id().get(),
        }
    }
}

fn bodies(contracts: Vec<Contract>) -> Vec<ContractBody> {
    contracts.into_iter().map(ContractBody::from).collect()
}

/// Fetch one of the caller's contracts.
#[utoipa::path(
    get,
    path = "/contracts/{id}",
    params(
        ("id" = i64, Path, description = "Contract id"),
        ("profile_id" = i64, Header, description = "Acting profile id")
    ),
    responses(
        (status = 200, description = "The contract", body = ContractBody),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Caller not identified", body = ErrorSchema),
        (status = 404, description = "No such contract for this caller", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["contracts"],
    operation_id = "getContract"
)]
#[get("/contracts/{id}")]
pub async fn get_contract(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
) -> ApiResult<web::Json<ContractBody>> {
    let id = ContractId::new(parse_id(&path.into_inner(), FieldName::new("id"))?);
    let contract = state.contracts.get_contract(caller.id(), id).await?;
    Ok(web::Json(contract.into()))
}

/// List the caller's non-terminated contracts.
#[utoipa::path(
    get,
    path = "/contracts",
    params(("profile_id" = i64, Header, description = "Acting profile id")),
    responses(
        (status = 200, description = "Active contracts", body = [ContractBody]),
        (status = 401, description = "Caller not identified", body = ErrorSchema),
        (status = 404, description = "No active contracts", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["contracts"],
    operation_id = "listContracts"
)]
#[get("/contracts")]
pub async fn list_contracts(
    state: web::Data<HttpState>,
    caller: Caller,
) -> ApiResult<web::Json<Vec<ContractBody>>> {
    let contracts = state.contracts.list_contracts(caller.id()).await?;
    Ok(web::Json(bodies(contracts)))
}

/// List every contract regardless of participant.
#[utoipa::path(
    get,
    path = "/allContracts",
    responses(
        (status = 200, description = "All contracts", body = [ContractBody]),
        (status = 404, description = "No contracts exist", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "listAllContracts",
    security([])
)]
#[get("/allContracts")]
pub async fn list_all_contracts(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ContractBody>>> {
    let contracts = state.contracts.list_all_contracts().await?;
    Ok(web::Json(bodies(contracts)))
}
