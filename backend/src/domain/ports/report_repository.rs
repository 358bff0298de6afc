//! Port for aggregate reads over paid jobs.

use async_trait::async_trait;

use crate::domain::{BestClientsLimit, ClientSpend, ProfessionEarnings, ReportWindow};

use super::define_port_error;

define_port_error! {
    /// Errors raised by report repository adapters.
    pub enum ReportRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "report repository connection failed: {message}",
        /// Aggregate query failed during execution.
        Query { message: String } =>
            "report repository query failed: {message}",
    }
}

/// Port for earnings and spending aggregates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// The contractor profession with the highest total of job prices paid
    /// within `window`.
    async fn best_profession(
        &self,
        window: ReportWindow,
    ) -> Result<Option<ProfessionEarnings>, ReportRepositoryError>;

    /// Clients ordered by total paid within `window`, highest first.
    async fn best_clients(
        &self,
        window: ReportWindow,
        limit: BestClientsLimit,
    ) -> Result<Vec<ClientSpend>, ReportRepositoryError>;
}

/// Fixture implementation with no paid jobs.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReportRepository;

#[async_trait]
impl ReportRepository for FixtureReportRepository {
    async fn best_profession(
        &self,
        _window: ReportWindow,
    ) -> Result<Option<ProfessionEarnings>, ReportRepositoryError> {
        Ok(None)
    }

    async fn best_clients(
        &self,
        _window: ReportWindow,
        _limit: BestClientsLimit,
    ) -> Result<Vec<ClientSpend>, ReportRepositoryError> {
        Ok(Vec::new())
    }
}
