use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::auth::{LoginRequest, LoginResponse};
use models::ResponseDto;
use service::auth::TokenRejection;
use tracing::warn;

use crate::state::AppState;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized: Invalid credentials or access denied.";
pub const TOKEN_EXPIRED_HEADER: &str = "Token-Expired";

#[utoipa::path(
    post, path = "/api/Authentication/login", tag = "auth",
    request_body = crate::openapi::LoginRequestDoc,
    responses((status = 200, description = "Envelope with the token on success", body = crate::openapi::EnvelopeDoc))
)]
pub async fn login(State(state): State<AppState>, Json(input): Json<LoginRequest>) -> Json<ResponseDto<LoginResponse>> {
    Json(state.auth.login(&input).await)
}

fn unauthorized(expired: bool) -> Response {
    let body: ResponseDto<()> = ResponseDto::failure(UNAUTHORIZED_MESSAGE);
    let mut response = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    if expired {
        response.headers_mut().insert(TOKEN_EXPIRED_HEADER, HeaderValue::from_static("true"));
    }
    response
}

/// Require `Authorization: Bearer <token>`; verified claims are added to the
/// request extensions. Rejections answer 401 with a failed envelope.
pub async fn require_bearer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    let Some(token) = token else {
        warn!(%path, "missing or malformed Authorization header");
        return unauthorized(false);
    };
    match state.auth.tokens().verify(&token) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(rejection) => {
            warn!(%path, ?rejection, "token rejected");
            unauthorized(rejection == TokenRejection::Expired)
        }
    }
}
