//! Billable services offered by providers.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::{Property, RowMapped};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase", deserialize = "camelCase"))]
pub struct GetServicesPagedRequest {
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

fn default_sort_by() -> String { "ServiceName".into() }
fn default_sort_order() -> String { "ASC".into() }

impl Default for GetServicesPagedRequest {
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

// decimals travel as JSON numbers; the driver binds them as numeric
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase", deserialize = "camelCase"))]
pub struct CreateServiceRequest {
    #[serde(default)]
    pub service_name: String,
    #[serde(rename(serialize = "HourlyRateUSD", deserialize = "hourlyRateUSD"), with = "rust_decimal::serde::float")]
    pub hourly_rate_usd: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase", deserialize = "camelCase"))]
pub struct UpdateServiceRequest {
    #[serde(default)]
    pub service_id: i32,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(
        default,
        rename(serialize = "HourlyRateUSD", deserialize = "hourlyRateUSD"),
        with = "rust_decimal::serde::float_option"
    )]
    pub hourly_rate_usd: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceIdParam {
    pub service_id: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePagedRow {
    pub service_id: i32,
    pub service_name: String,
    #[serde(rename = "hourlyRateUSD", with = "rust_decimal::serde::float")]
    pub hourly_rate_usd: Decimal,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

impl RowMapped for ServicePagedRow {
    fn properties() -> Vec<Property<Self>> {
        vec![
            Property::<Self>::new("ServiceId", |r| &mut r.service_id),
            Property::<Self>::new("ServiceName", |r| &mut r.service_name),
            Property::<Self>::new("HourlyRateUSD", |r| &mut r.hourly_rate_usd),
            Property::<Self>::new("Description", |r| &mut r.description),
            Property::<Self>::new("CreatedAt", |r| &mut r.created_at),
            Property::<Self>::new("UpdatedAt", |r| &mut r.updated_at),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{bind_params, SqlValue};
    use serde_json::json;

    #[test]
    fn create_request_binds_rate_as_number() {
        let req: CreateServiceRequest =
            serde_json::from_value(json!({"serviceName": "Audit", "hourlyRateUSD": 85.5})).expect("parse");
        let bound = bind_params(Some(&req)).expect("bind");
        assert_eq!(bound[1].name, "@HourlyRateUSD");
        assert_eq!(bound[1].value, SqlValue::Float(85.5));
        assert_eq!(bound[2].value, SqlValue::Null);
    }

    #[test]
    fn update_request_leaves_missing_fields_null() {
        let req: UpdateServiceRequest = serde_json::from_value(json!({"serviceId": 4})).expect("parse");
        let bound = bind_params(Some(&req)).expect("bind");
        assert_eq!(bound[0].value, SqlValue::Int(4));
        assert!(bound[1..].iter().all(|p| p.value.is_null()));
    }
}
