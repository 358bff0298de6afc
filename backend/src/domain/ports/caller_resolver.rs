//! Driving port that turns a claimed profile id into the acting profile.

use async_trait::async_trait;

use crate::domain::{Error, Profile, ProfileId};

/// Resolve the profile named by an inbound request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallerResolver: Send + Sync {
    /// Load the caller's profile.
    ///
    /// Returns [`crate::domain::ErrorCode::Unauthorized`] when no profile has
    /// the given id.
    async fn resolve_caller(&self, id: ProfileId) -> Result<Profile, Error>;
}
