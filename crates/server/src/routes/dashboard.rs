use axum::extract::State;
use axum::Json;
use models::dashboard::DashboardSummary;
use models::ResponseDto;

use crate::state::AppState;

#[utoipa::path(
    get, path = "/api/Dashboard/summary", tag = "dashboard",
    responses((status = 200, description = "Envelope with provider and service totals", body = crate::openapi::EnvelopeDoc)),
    security(("bearer" = []))
)]
pub async fn summary(State(state): State<AppState>) -> Json<ResponseDto<DashboardSummary>> {
    Json(state.dashboard.summary().await)
}
