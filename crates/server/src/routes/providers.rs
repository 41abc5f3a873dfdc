use axum::extract::{Path, Query, State};
use axum::Json;
use models::provider::{AddCustomFieldRequest, CreateProviderRequest, GetProvidersPagedRequest, ProviderPagedRow};
use models::{ResponseDto, TablePage};

use crate::state::AppState;

#[utoipa::path(
    get, path = "/api/Providers/paged", tag = "providers",
    params(
        ("searchTerm" = Option<String>, Query, description = "Matches NIT, name or email"),
        ("isActive" = Option<bool>, Query,),
        ("pageSize" = Option<i32>, Query,),
        ("pageNumber" = Option<i32>, Query,),
        ("sortBy" = Option<String>, Query, description = "Defaults to ProviderName"),
        ("sortOrder" = Option<String>, Query, description = "ASC or DESC")
    ),
    responses((status = 200, description = "Envelope with results and totalRecords", body = crate::openapi::EnvelopeDoc)),
    security(("bearer" = []))
)]
pub async fn get_paged(
    State(state): State<AppState>,
    Query(filters): Query<GetProvidersPagedRequest>,
) -> Json<ResponseDto<TablePage<ProviderPagedRow>>> {
    Json(state.providers.get_paged(&filters).await)
}

#[utoipa::path(
    post, path = "/api/Providers", tag = "providers",
    request_body = crate::openapi::CreateProviderDoc,
    responses((status = 200, description = "Envelope with the routine verdict", body = crate::openapi::EnvelopeDoc)),
    security(("bearer" = []))
)]
pub async fn create(State(state): State<AppState>, Json(input): Json<CreateProviderRequest>) -> Json<ResponseDto<()>> {
    Json(state.providers.create(&input).await)
}

#[utoipa::path(
    delete, path = "/api/Providers/{providerId}", tag = "providers",
    params(("providerId" = i32, Path,)),
    responses((status = 200, description = "Envelope with the routine verdict", body = crate::openapi::EnvelopeDoc)),
    security(("bearer" = []))
)]
pub async fn delete(State(state): State<AppState>, Path(provider_id): Path<i32>) -> Json<ResponseDto<()>> {
    Json(state.providers.delete(provider_id).await)
}

#[utoipa::path(
    post, path = "/api/Providers/{providerId}/custom-fields", tag = "providers",
    params(("providerId" = i32, Path, description = "Takes precedence over providerId in the body")),
    request_body = crate::openapi::AddCustomFieldDoc,
    responses((status = 200, description = "Envelope with the routine verdict", body = crate::openapi::EnvelopeDoc)),
    security(("bearer" = []))
)]
pub async fn add_custom_field(
    State(state): State<AppState>,
    Path(provider_id): Path<i32>,
    Json(input): Json<AddCustomFieldRequest>,
) -> Json<ResponseDto<()>> {
    Json(state.providers.add_custom_field(provider_id, input).await)
}
