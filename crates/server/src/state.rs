use std::sync::Arc;

use common::utils::log_sink::LogSink;
use configs::AppConfig;
use models::db::ProcedureExecutor;
use service::assignments::{AssignmentService, RoutineAssignmentRepository};
use service::auth::{Argon2SecurityService, AuthenticationService, TokenIssuer};
use service::catalog::{CatalogService, RoutineCatalogRepository};
use service::countries::{CountriesService, CountriesSource};
use service::dashboard::{DashboardService, RoutineDashboardRepository};
use service::providers::{ProviderService, RoutineProviderRepository};

use crate::errors::StartupError;

/// Everything the handlers need, shared across requests.
#[derive(Clone)]
pub struct AppState {
    pub providers: Arc<ProviderService<RoutineProviderRepository>>,
    pub catalog: Arc<CatalogService<RoutineCatalogRepository>>,
    pub assignments: Arc<AssignmentService<RoutineAssignmentRepository>>,
    pub dashboard: Arc<DashboardService<RoutineDashboardRepository>>,
    pub countries: Arc<CountriesService<dyn CountriesSource>>,
    pub auth: Arc<AuthenticationService>,
}

impl AppState {
    pub fn new(
        executor: Arc<ProcedureExecutor>,
        countries: CountriesService<dyn CountriesSource>,
        auth: AuthenticationService,
        log: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            providers: Arc::new(ProviderService::new(Arc::new(RoutineProviderRepository::new(executor.clone())))),
            catalog: Arc::new(CatalogService::new(Arc::new(RoutineCatalogRepository::new(executor.clone())))),
            assignments: Arc::new(AssignmentService::new(Arc::new(RoutineAssignmentRepository::new(executor.clone())))),
            dashboard: Arc::new(DashboardService::new(Arc::new(RoutineDashboardRepository::new(executor)), log)),
            countries: Arc::new(countries),
            auth: Arc::new(auth),
        }
    }

    /// Wire the use cases from configuration around an existing executor.
    pub fn from_config(
        cfg: &AppConfig,
        executor: Arc<ProcedureExecutor>,
        countries_source: Arc<dyn CountriesSource>,
        log: Arc<dyn LogSink>,
    ) -> Result<Self, StartupError> {
        let security = Arc::new(Argon2SecurityService::new(&cfg.argon2)?);
        let tokens = TokenIssuer::from_config(&cfg.jwt)?;
        let auth = AuthenticationService::new(cfg.admin.clone(), security, tokens, log.clone());
        let countries = CountriesService::from_config(countries_source, log.clone(), &cfg.rest_countries);
        Ok(Self::new(executor, countries, auth, log))
    }
}
