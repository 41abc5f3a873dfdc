use axum::extract::{Path, Query, State};
use axum::Json;
use models::country::{Country, CountryFilter, PagedResult};
use models::ResponseDto;

use crate::state::AppState;

#[utoipa::path(
    get, path = "/api/Countries/paged", tag = "countries",
    params(
        ("searchTerm" = Option<String>, Query, description = "Substring of name, code or official name"),
        ("region" = Option<String>, Query,),
        ("language" = Option<String>, Query,),
        ("pageNumber" = Option<i64>, Query,),
        ("pageSize" = Option<i64>, Query, description = "1 to 250"),
        ("sortBy" = Option<String>, Query, description = "name, population, code or region"),
        ("ascending" = Option<bool>, Query,)
    ),
    responses((status = 200, description = "Envelope with a paged country list", body = crate::openapi::EnvelopeDoc)),
    security(("bearer" = []))
)]
pub async fn get_paged(State(state): State<AppState>, Query(filter): Query<CountryFilter>) -> Json<ResponseDto<PagedResult<Country>>> {
    Json(state.countries.get_paged(&filter).await)
}

#[utoipa::path(
    get, path = "/api/Countries/all", tag = "countries",
    responses((status = 200, description = "Envelope with every country", body = crate::openapi::EnvelopeDoc)),
    security(("bearer" = []))
)]
pub async fn get_all(State(state): State<AppState>) -> Json<ResponseDto<Vec<Country>>> {
    Json(state.countries.get_all().await)
}

#[utoipa::path(
    get, path = "/api/Countries/{code}", tag = "countries",
    params(("code" = String, Path, description = "ISO 3166-1 alpha-3 code")),
    responses((status = 200, description = "Envelope with one country", body = crate::openapi::EnvelopeDoc)),
    security(("bearer" = []))
)]
pub async fn get_by_code(State(state): State<AppState>, Path(code): Path<String>) -> Json<ResponseDto<Country>> {
    Json(state.countries.get_by_code(&code).await)
}

#[utoipa::path(
    get, path = "/api/Countries/region/{region}", tag = "countries",
    params(("region" = String, Path,)),
    responses((status = 200, description = "Envelope with the region's countries", body = crate::openapi::EnvelopeDoc)),
    security(("bearer" = []))
)]
pub async fn get_by_region(State(state): State<AppState>, Path(region): Path<String>) -> Json<ResponseDto<Vec<Country>>> {
    Json(state.countries.get_by_region(&region).await)
}

#[utoipa::path(
    get, path = "/api/Countries/search/{name}", tag = "countries",
    params(("name" = String, Path,)),
    responses((status = 200, description = "Envelope with matching countries", body = crate::openapi::EnvelopeDoc)),
    security(("bearer" = []))
)]
pub async fn search_by_name(State(state): State<AppState>, Path(name): Path<String>) -> Json<ResponseDto<Vec<Country>>> {
    Json(state.countries.search_by_name(&name).await)
}

#[utoipa::path(
    get, path = "/api/Countries/regions", tag = "countries",
    responses((status = 200, description = "Envelope with distinct region names", body = crate::openapi::EnvelopeDoc)),
    security(("bearer" = []))
)]
pub async fn get_regions(State(state): State<AppState>) -> Json<ResponseDto<Vec<String>>> {
    Json(state.countries.get_available_regions().await)
}
