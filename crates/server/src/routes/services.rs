use axum::extract::{Path, Query, State};
use axum::Json;
use models::catalog::{CreateServiceRequest, GetServicesPagedRequest, ServicePagedRow, UpdateServiceRequest};
use models::{ResponseDto, TablePage};

use crate::state::AppState;

#[utoipa::path(
    get, path = "/api/Services/paged", tag = "services",
    params(
        ("searchTerm" = Option<String>, Query,),
        ("isActive" = Option<bool>, Query,),
        ("pageSize" = Option<i32>, Query,),
        ("pageNumber" = Option<i32>, Query,),
        ("sortBy" = Option<String>, Query, description = "Defaults to ServiceName"),
        ("sortOrder" = Option<String>, Query, description = "ASC or DESC")
    ),
    responses((status = 200, description = "Envelope with results and totalRecords", body = crate::openapi::EnvelopeDoc)),
    security(("bearer" = []))
)]
pub async fn get_paged(
    State(state): State<AppState>,
    Query(filters): Query<GetServicesPagedRequest>,
) -> Json<ResponseDto<TablePage<ServicePagedRow>>> {
    Json(state.catalog.get_paged(&filters).await)
}

#[utoipa::path(
    post, path = "/api/Services", tag = "services",
    request_body = crate::openapi::CreateServiceDoc,
    responses((status = 200, description = "Envelope with the routine verdict", body = crate::openapi::EnvelopeDoc)),
    security(("bearer" = []))
)]
pub async fn create(State(state): State<AppState>, Json(input): Json<CreateServiceRequest>) -> Json<ResponseDto<()>> {
    Json(state.catalog.create(&input).await)
}

#[utoipa::path(
    put, path = "/api/Services/{serviceId}", tag = "services",
    params(("serviceId" = i32, Path, description = "Takes precedence over serviceId in the body")),
    request_body = crate::openapi::UpdateServiceDoc,
    responses((status = 200, description = "Envelope with the routine verdict", body = crate::openapi::EnvelopeDoc)),
    security(("bearer" = []))
)]
pub async fn update(
    State(state): State<AppState>,
    Path(service_id): Path<i32>,
    Json(input): Json<UpdateServiceRequest>,
) -> Json<ResponseDto<()>> {
    Json(state.catalog.update(service_id, input).await)
}

#[utoipa::path(
    delete, path = "/api/Services/{serviceId}", tag = "services",
    params(("serviceId" = i32, Path,)),
    responses((status = 200, description = "Envelope with the routine verdict", body = crate::openapi::EnvelopeDoc)),
    security(("bearer" = []))
)]
pub async fn delete(State(state): State<AppState>, Path(service_id): Path<i32>) -> Json<ResponseDto<()>> {
    Json(state.catalog.delete(service_id).await)
}
