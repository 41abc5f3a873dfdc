use axum::extract::State;
use axum::Json;
use models::provider_service::AssignServiceRequest;
use models::ResponseDto;

use crate::state::AppState;

#[utoipa::path(
    post, path = "/api/ProviderServices/assign", tag = "provider-services",
    request_body = crate::openapi::AssignServiceDoc,
    responses((status = 200, description = "Envelope with the routine verdict", body = crate::openapi::EnvelopeDoc)),
    security(("bearer" = []))
)]
pub async fn assign(State(state): State<AppState>, Json(input): Json<AssignServiceRequest>) -> Json<ResponseDto<()>> {
    Json(state.assignments.assign(&input).await)
}
