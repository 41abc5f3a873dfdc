use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use serde::Serialize;
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// `{ isSuccess, message, data }`; `data` depends on the operation.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeDoc {
    pub is_success: bool,
    pub message: Option<String>,
    #[schema(value_type = Object)]
    pub data: Option<serde_json::Value>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestDoc { pub email: String, pub password: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProviderDoc { pub nit: String, pub provider_name: String, pub email: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCustomFieldDoc { pub provider_id: i32, pub field_name: String, pub field_value: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceDoc {
    pub service_name: String,
    #[serde(rename = "hourlyRateUSD")]
    pub hourly_rate_usd: f64,
    pub description: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceDoc {
    pub service_id: i32,
    pub service_name: Option<String>,
    #[serde(rename = "hourlyRateUSD")]
    pub hourly_rate_usd: Option<f64>,
    pub description: Option<String>,
}

/// `countryCodes` is JSON array text, e.g. `["COL","PER"]`.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignServiceDoc { pub provider_id: i32, pub service_id: i32, pub country_codes: String }

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::providers::get_paged,
        crate::routes::providers::create,
        crate::routes::providers::delete,
        crate::routes::providers::add_custom_field,
        crate::routes::services::get_paged,
        crate::routes::services::create,
        crate::routes::services::update,
        crate::routes::services::delete,
        crate::routes::provider_services::assign,
        crate::routes::countries::get_paged,
        crate::routes::countries::get_all,
        crate::routes::countries::get_by_code,
        crate::routes::countries::get_by_region,
        crate::routes::countries::search_by_name,
        crate::routes::countries::get_regions,
        crate::routes::dashboard::summary,
    ),
    components(
        schemas(
            HealthResponse,
            EnvelopeDoc,
            LoginRequestDoc,
            CreateProviderDoc,
            AddCustomFieldDoc,
            CreateServiceDoc,
            UpdateServiceDoc,
            AssignServiceDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "providers"),
        (name = "services"),
        (name = "provider-services"),
        (name = "countries"),
        (name = "dashboard")
    )
)]
pub struct ApiDoc;
