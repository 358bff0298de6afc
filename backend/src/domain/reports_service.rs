//! Admin report service implementing [`AdminReportsQuery`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{AdminReportsQuery, ReportRepository, ReportRepositoryError};
use crate::domain::{BestClientsLimit, ClientSpend, Error, ProfessionEarnings, ReportWindow};

fn map_repository_error(error: ReportRepositoryError) -> Error {
    match error {
        ReportRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("report repository unavailable: {message}"))
        }
        ReportRepositoryError::Query { message } => {
            Error::internal(format!("report repository error: {message}"))
        }
    }
}

#[derive(Clone)]
pub struct AdminReportsService<R> {
    reports: Arc<R>,
}

impl<R> AdminReportsService<R> {
    pub fn new(reports: Arc<R>) -> Self {
        Self { reports }
    }
}

#[async_trait]
impl<R> AdminReportsQuery for AdminReportsService<R>
where
    R: ReportRepository,
{
    async fn best_profession(
        &self,
        window: ReportWindow,
    ) -> Result<Option<ProfessionEarnings>, Error> {
        self.reports
            .best_profession(window)
            .await
            .map_err(map_repository_error)
    }

    async fn best_clients(
        &self,
        window: ReportWindow,
        limit: BestClientsLimit,
    ) -> Result<Vec<ClientSpend>, Error> {
        self.reports
            .best_clients(window, limit)
            .await
            .map_err(map_repository_error)
    }
}
