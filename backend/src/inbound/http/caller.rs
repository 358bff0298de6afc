//! Caller identification.
//!
//! Every participant-scoped endpoint names its caller in the `profile_id`
//! request header. [`Caller`] parses the header and resolves the profile
//! through the [`crate::domain::ports::CallerResolver`] port held in
//! [`HttpState`].

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Error, Profile, ProfileId};
use crate::inbound::http::state::HttpState;

/// Request header naming the acting profile.
pub const PROFILE_ID_HEADER: &str = "profile_id";

/// The resolved acting profile.
#[derive(Debug, Clone)]
pub struct Caller(Profile);

impl Caller {
    pub fn id(&self) -> ProfileId {
        self.0.id()
    }

    pub fn profile(&self) -> &Profile {
        &self.0
    }
}

fn header_profile_id(req: &HttpRequest) -> Result<ProfileId, Error> {
    let raw = req
        .headers()
        .get(PROFILE_ID_HEADER)
        .ok_or_else(|| Error::unauthorized("profile_id header is required"))?;
    raw.to_str()
        .ok()
        .and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
        .map(ProfileId::new)
        .ok_or_else(|| Error::unauthorized("profile_id header must be a positive integer"))
}

impl FromRequest for Caller {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let id = header_profile_id(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let id = id?;
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let profile = state.caller.resolve_caller(id).await?;
            debug!(profile_id = %id, role = %profile.role(), "caller resolved");
            Ok(Caller(profile))
        })
    }
}
