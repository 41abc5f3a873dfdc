#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use common::utils::log_sink::mock::RecordingLogSink;
use configs::{AdminConfig, Argon2Config};
use models::db::driver::mock::ScriptedDriver;
use models::db::{MappingCache, ProcedureExecutor};
use server::routes;
use server::AppState;
use service::auth::{Argon2SecurityService, AuthenticationService, SecurityService, TokenIssuer};
use service::countries::source::mock::StaticCountrySource;
use service::countries::{CountriesService, CountriesSource};
use tower_http::cors::CorsLayer;

pub const ADMIN_EMAIL: &str = "admin@tekus.co";
pub const ADMIN_PASSWORD: &str = "Adm1n!";
pub const JWT_SECRET: &str = "integration-secret";

pub struct TestApp {
    pub router: Router,
    pub driver: Arc<ScriptedDriver>,
    pub countries: Arc<StaticCountrySource>,
    pub log: Arc<RecordingLogSink>,
}

/// Full router over a scripted database and canned country responses.
pub fn build_app(driver: ScriptedDriver, countries: StaticCountrySource) -> TestApp {
    let driver = Arc::new(driver);
    let countries = Arc::new(countries);
    let log = Arc::new(RecordingLogSink::default());
    let executor = Arc::new(ProcedureExecutor::new(
        driver.clone(),
        Arc::new(MappingCache::new()),
        log.clone(),
        Duration::from_secs(5),
    ));

    let argon = Argon2Config { memory_kib: 1024, iterations: 2, parallelism: 1, hash_len: 32 };
    let security = Arc::new(Argon2SecurityService::new(&argon).expect("argon2 params"));
    let (password_hash, password_salt) = security.hash_password(ADMIN_PASSWORD).expect("hash");
    let admin = AdminConfig { email: ADMIN_EMAIL.into(), password_hash, password_salt, ..Default::default() };
    let tokens = TokenIssuer::new(JWT_SECRET, 6.0).expect("issuer");
    let auth = AuthenticationService::new(admin, security, tokens, log.clone());

    let source: Arc<dyn CountriesSource> = countries.clone();
    let catalog = CountriesService::new(source, log.clone(), true, Duration::from_secs(60));

    let state = AppState::new(executor, catalog, auth, log.clone());
    TestApp { router: routes::build_router(state, CorsLayer::very_permissive()), driver, countries, log }
}
