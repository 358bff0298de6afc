//! Driving port for profile listings.

use async_trait::async_trait;

use crate::domain::{Error, Profile};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfilesQuery: Send + Sync {
    /// Every profile; not found when there are none.
    async fn list_profiles(&self) -> Result<Vec<Profile>, Error>;
}
