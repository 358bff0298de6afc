//! Driving port for admin earnings reports.

use async_trait::async_trait;

use crate::domain::{BestClientsLimit, ClientSpend, Error, ProfessionEarnings, ReportWindow};

/// Admin report use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminReportsQuery: Send + Sync {
    /// The profession that earned the most within `window`, if anything was
    /// paid.
    async fn best_profession(
        &self,
        window: ReportWindow,
    ) -> Result<Option<ProfessionEarnings>, Error>;

    /// Clients who paid the most within `window`. May be empty.
    async fn best_clients(
        &self,
        window: ReportWindow,
        limit: BestClientsLimit,
    ) -> Result<Vec<ClientSpend>, Error>;
}
