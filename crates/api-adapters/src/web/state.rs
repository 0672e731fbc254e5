use std::sync::Arc;

use domains::{
    AccountRepository, ApplicationRepository, OpportunityRepository, PasswordHasher, TokenService,
};
use services::{ApplicationService, AuthService, DashboardService, OpportunityService};

use crate::metrics::HttpMetrics;
use crate::web::config::ApiConfig;

/// Shared application state. Cheap to clone; every field is an `Arc` or a
/// service holding `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub metrics: Arc<HttpMetrics>,
    pub auth: AuthService,
    pub opportunities: OpportunityService,
    pub applications: ApplicationService,
    pub dashboard: DashboardService,
}

/// The ports the HTTP layer needs wired to concrete adapters.
pub struct Ports {
    pub accounts: Arc<dyn AccountRepository>,
    pub opportunities: Arc<dyn OpportunityRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenService>,
}

impl AppState {
    pub fn new(config: ApiConfig, ports: Ports) -> Self {
        Self {
            config: Arc::new(config),
            metrics: Arc::new(HttpMetrics::new()),
            auth: AuthService::new(ports.accounts, ports.hasher, ports.tokens),
            opportunities: OpportunityService::new(Arc::clone(&ports.opportunities)),
            applications: ApplicationService::new(
                Arc::clone(&ports.applications),
                Arc::clone(&ports.opportunities),
            ),
            dashboard: DashboardService::new(ports.opportunities, ports.applications),
        }
    }
}
