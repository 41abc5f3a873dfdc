use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::db::{Property, RowMapped};

/// Filters for `dbo.sp_GetProvidersPaged`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase", deserialize = "camelCase"))]
pub struct GetProvidersPagedRequest {
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub page_size: Option<i32>,
    #[serde(default)]
    pub page_number: Option<i32>,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_sort_order")]
    pub sort_order: String,
}

fn default_sort_by() -> String { "ProviderName".into() }
fn default_sort_order() -> String { "ASC".into() }

impl Default for GetProvidersPagedRequest {
    fn default() -> Self {
        Self {
            search_term: None,
            is_active: None,
            page_size: None,
            page_number: None,
            sort_by: default_sort_by(),
            sort_order: default_sort_order(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase", deserialize = "camelCase"))]
pub struct CreateProviderRequest {
    #[serde(default)]
    pub nit: String,
    #[serde(default)]
    pub provider_name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase", deserialize = "camelCase"))]
pub struct AddCustomFieldRequest {
    #[serde(default)]
    pub provider_id: i32,
    #[serde(default)]
    pub field_name: String,
    #[serde(default)]
    pub field_value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProviderIdParam {
    pub provider_id: i32,
}

/// One row of `dbo.sp_GetProvidersPaged`. `CustomFields` is JSON text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderPagedRow {
    pub provider_id: i32,
    pub nit: String,
    pub provider_name: String,
    pub email: String,
    pub custom_fields: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
    pub total_services: i32,
}

impl RowMapped for ProviderPagedRow {
    fn properties() -> Vec<Property<Self>> {
        vec![
            Property::<Self>::new("ProviderId", |r| &mut r.provider_id),
            Property::<Self>::new("Nit", |r| &mut r.nit),
            Property::<Self>::new("ProviderName", |r| &mut r.provider_name),
            Property::<Self>::new("Email", |r| &mut r.email),
            Property::<Self>::new("CustomFields", |r| &mut r.custom_fields),
            Property::<Self>::new("CreatedAt", |r| &mut r.created_at),
            Property::<Self>::new("UpdatedAt", |r| &mut r.updated_at),
            Property::<Self>::new("TotalServices", |r| &mut r.total_services),
        ]
    }
}
