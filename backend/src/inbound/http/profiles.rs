//! Profile listing.
//!
//! ```text
//! GET /profiles
//! ```

use actix_web::{get, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Profile;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// A marketplace account as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileBody {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Harry")]
    pub first_name: String,
    #[schema(example = "Potter")]
    pub last_name: String,
    #[schema(example = "Wizard")]
    pub profession: String,
    #[schema(value_type = f64, example = 1150.0)]
    pub balance: Decimal,
    /// `client` or `contractor`.
    #[serde(rename = "type")]
    #[schema(example = "client")]
    pub role: String,
}

impl From<Profile> for ProfileBody {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id().get(),
            first_name: profile.first_name().to_owned(),
            last_name: profile.last_name().to_owned(),
            profession: profile.profession().to_owned(),
            balance: profile.balance().amount(),
            role: profile.role().as_str().to_owned(),
        }
    }
}

/// List every profile.
#[utoipa::path(
    get,
    path = "/profiles",
    responses(
        (status = 200, description = "All profiles", body = [ProfileBody]),
        (status = 404, description = "No profiles exist", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "listProfiles",
    security([])
)]
#[get("/profiles")]
pub async fn list_profiles(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<ProfileBody>>> {
    let profiles = state.profiles.list_profiles().await?;
    Ok(web::Json(profiles.into_iter().map(ProfileBody::from).collect()))
}
