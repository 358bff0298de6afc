//! Builders for HTTP state ports over the configured store.

use std::sync::Arc;

use actix_web::web;
use mockable::Clock;

use marketplace::domain::example_data::{ExampleDataSeeder, ExampleDataSeedingError};
use marketplace::domain::ports::{ExampleDataSeedRepository, SeedingResult};
use marketplace::domain::{AdminReportsService, MarketplaceQueryService, PaymentService};
use marketplace::inbound::http::state::{HttpState, HttpStatePorts};
use marketplace::outbound::persistence::{
    DbPool, DieselContractRepository, DieselExampleDataSeedRepository, DieselJobRepository,
    DieselPaymentLedger, DieselProfileRepository, DieselReportRepository,
};

use super::ServerConfig;

fn http_state_over_pool(pool: &DbPool, clock: Arc<dyn Clock>) -> HttpState {
    let queries = Arc::new(MarketplaceQueryService::new(
        Arc::new(DieselProfileRepository::new(pool.clone())),
        Arc::new(DieselContractRepository::new(pool.clone())),
        Arc::new(DieselJobRepository::new(pool.clone())),
    ));
    HttpState::new(HttpStatePorts {
        caller: queries.clone(),
        contracts: queries.clone(),
        jobs: queries.clone(),
        profiles: queries,
        payments: Arc::new(PaymentService::new(
            Arc::new(DieselPaymentLedger::new(pool.clone())),
            clock,
        )),
        reports: Arc::new(AdminReportsService::new(Arc::new(
            DieselReportRepository::new(pool.clone()),
        ))),
    })
}

/// Build the shared HTTP state over PostgreSQL when a pool is configured,
/// otherwise over the in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => http_state_over_pool(pool, config.clock.clone()),
        None => HttpState::over_memory(&config.memory, config.clock.clone()),
    };
    web::Data::new(state)
}

async fn seed_with<R>(repository: R) -> Result<SeedingResult, ExampleDataSeedingError>
where
    R: ExampleDataSeedRepository,
{
    ExampleDataSeeder::new(Arc::new(repository))
        .seed_demo_data()
        .await
}

/// Load the demo dataset into the configured store unless it already holds
/// profiles.
///
/// # Errors
///
/// Returns [`ExampleDataSeedingError`] when the store rejects the dataset.
pub async fn seed_example_data(
    config: &ServerConfig,
) -> Result<SeedingResult, ExampleDataSeedingError> {
    match &config.db_pool {
        Some(pool) => seed_with(DieselExampleDataSeedRepository::new(pool.clone())).await,
        None => seed_with(config.memory.clone()).await,
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use chrono::{TimeZone, Utc};
    use marketplace::domain::{JobId, ProfileId};
    use marketplace::domain::ports::PayForJobRequest;
    use mockable::MockClock;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn config() -> ServerConfig {
        let addr: SocketAddr = "127.0.0.1:0".parse().expect("socket address");
        ServerConfig::new(addr)
    }

    #[rstest]
    #[tokio::test]
    async fn memory_store_starts_empty(config: ServerConfig) {
        let state = build_http_state(&config);
        let err = state
            .profiles
            .list_profiles()
            .await
            .expect_err("no profiles yet");
        assert_eq!(err.code(), marketplace::domain::ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn seeding_fills_the_memory_store_once(config: ServerConfig) {
        assert!(!config.uses_database());
        let first = seed_example_data(&config).await.expect("seed");
        let second = seed_example_data(&config).await.expect("seed");
        assert_eq!(first, SeedingResult::Applied);
        assert_eq!(second, SeedingResult::AlreadySeeded);

        let state = build_http_state(&config);
        let profiles = state.profiles.list_profiles().await.expect("profiles");
        assert_eq!(profiles.len(), 8);
    }

    #[rstest]
    #[tokio::test]
    async fn payments_are_stamped_by_the_configured_clock(config: ServerConfig) {
        let at = Utc
            .with_ymd_and_hms(2024, 5, 6, 7, 8, 9)
            .single()
            .expect("timestamp");
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(at);
        let config = config.with_clock(Arc::new(clock));
        seed_example_data(&config).await.expect("seed");

        let state = build_http_state(&config);
        let response = state
            .payments
            .pay_for_job(PayForJobRequest {
                job_id: JobId::new(2),
                payer_id: ProfileId::new(1),
            })
            .await
            .expect("payment succeeds");
        assert_eq!(response.receipt.paid_at, at);
    }
}
