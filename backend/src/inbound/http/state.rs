//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AdminReportsQuery, CallerResolver, ContractsQuery, JobsQuery, PaymentsCommand, ProfilesQuery,
};
use crate::domain::{AdminReportsService, MarketplaceQueryService, PaymentService};
use crate::outbound::memory::InMemoryMarketplace;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub caller: Arc<dyn CallerResolver>,
    pub contracts: Arc<dyn ContractsQuery>,
    pub jobs: Arc<dyn JobsQuery>,
    pub profiles: Arc<dyn ProfilesQuery>,
    pub payments: Arc<dyn PaymentsCommand>,
    pub reports: Arc<dyn AdminReportsQuery>,
}

/// Parameter object for [`HttpState::new`].
#[derive(Clone)]
pub struct HttpStatePorts {
    pub caller: Arc<dyn CallerResolver>,
    pub contracts: Arc<dyn ContractsQuery>,
    pub jobs: Arc<dyn JobsQuery>,
    pub profiles: Arc<dyn ProfilesQuery>,
    pub payments: Arc<dyn PaymentsCommand>,
    pub reports: Arc<dyn AdminReportsQuery>,
}

impl HttpState {
    /// Bundle the driving ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use marketplace::domain::{AdminReportsService, MarketplaceQueryService};
    /// use marketplace::domain::PaymentService;
    /// use marketplace::domain::ports::{
    ///     FixtureContractRepository, FixtureJobRepository, FixturePaymentLedger,
    ///     FixtureProfileRepository, FixtureReportRepository,
    /// };
    /// use marketplace::inbound::http::state::{HttpState, HttpStatePorts};
    /// use mockable::DefaultClock;
    ///
    /// let queries = Arc::new(MarketplaceQueryService::new(
    ///     Arc::new(FixtureProfileRepository),
    ///     Arc::new(FixtureContractRepository),
    ///     Arc::new(FixtureJobRepository),
    /// ));
    /// let state = HttpState::new(HttpStatePorts {
    ///     caller: queries.clone(),
    ///     contracts: queries.clone(),
    ///     jobs: queries.clone(),
    ///     profiles: queries,
    ///     payments: Arc::new(PaymentService::new(
    ///         Arc::new(FixturePaymentLedger),
    ///         Arc::new(DefaultClock),
    ///     )),
    ///     reports: Arc::new(AdminReportsService::new(Arc::new(FixtureReportRepository))),
    /// });
    /// let _ = state;
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            caller,
            contracts,
            jobs,
            profiles,
            payments,
            reports,
        } = ports;
        Self {
            caller,
            contracts,
            jobs,
            profiles,
            payments,
            reports,
        }
    }
}

impl HttpState {
    /// Wire every driving port to services over `store`, with payments
    /// stamped by `clock`.
    pub fn over_memory(store: &InMemoryMarketplace, clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(store.clone());
        let queries = Arc::new(MarketplaceQueryService::new(
            store.clone(),
            store.clone(),
            store.clone(),
        ));
        Self::new(HttpStatePorts {
            caller: queries.clone(),
            contracts: queries.clone(),
            jobs: queries.clone(),
            profiles: queries,
            payments: Arc::new(PaymentService::new(store.clone(), clock)),
            reports: Arc::new(AdminReportsService::new(store)),
        })
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
