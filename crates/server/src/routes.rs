use axum::routing::{delete, get, post, put};
use axum::{middleware, Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod auth;
pub mod countries;
pub mod dashboard;
pub mod provider_services;
pub mod providers;
pub mod services;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Routes that require a valid bearer token.
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/Providers/paged", get(providers::get_paged))
        .route("/api/Providers", post(providers::create))
        .route("/api/Providers/:provider_id", delete(providers::delete))
        .route("/api/Providers/:provider_id/custom-fields", post(providers::add_custom_field))
        .route("/api/Services/paged", get(services::get_paged))
        .route("/api/Services", post(services::create))
        .route("/api/Services/:service_id", put(services::update).delete(services::delete))
        .route("/api/ProviderServices/assign", post(provider_services::assign))
        .route("/api/Countries/paged", get(countries::get_paged))
        .route("/api/Countries/all", get(countries::get_all))
        .route("/api/Countries/regions", get(countries::get_regions))
        .route("/api/Countries/region/:region", get(countries::get_by_region))
        .route("/api/Countries/search/:name", get(countries::search_by_name))
        .route("/api/Countries/:code", get(countries::get_by_code))
        .route("/api/Dashboard/summary", get(dashboard::summary))
        .route_layer(middleware::from_fn_with_state(state, auth::require_bearer))
}

/// Build the full application router: public routes, the bearer-protected
/// API, and the Swagger UI at `/docs`.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/api/Authentication/login", post(auth::login));

    public
        .merge(protected_routes(state.clone()))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
