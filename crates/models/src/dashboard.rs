//! Dashboard summary produced by `dbo.sp_ResumenDashboard` as JSON text.

use serde::{Deserialize, Serialize};

// incoming keys are lower-cased before decoding, which gives the
// case-insensitive property matching the routine's JSON relies on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct DashboardSummary {
    #[serde(default, rename(deserialize = "totalproviders"))]
    pub total_providers: i32,
    #[serde(default, rename(deserialize = "totalservices"))]
    pub total_services: i32,
    #[serde(default, rename(deserialize = "providersbycountry"))]
    pub providers_by_country: Vec<CountryProviders>,
    #[serde(default, rename(deserialize = "servicesbycountry"))]
    pub services_by_country: Vec<CountryServices>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct CountryProviders {
    #[serde(default)]
    pub country: String,
    #[serde(default, rename(deserialize = "totalproviders"))]
    pub total_providers: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct CountryServices {
    #[serde(default)]
    pub country: String,
    #[serde(default, rename(deserialize = "totalservices"))]
    pub total_services: i32,
}

fn lowercase_keys(value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;
    match value {
        Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k.to_lowercase(), lowercase_keys(v))).collect()),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

impl DashboardSummary {
    /// Parse the routine's JSON with case-insensitive property names.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        serde_json::from_value(lowercase_keys(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_any_key_casing() {
        let raw = r#"{"TotalProviders":4,"totalServices":7,
            "ProvidersByCountry":[{"Country":"COL","TotalProviders":3}],
            "servicesbycountry":[{"COUNTRY":"PER","totalServices":2}]}"#;
        let summary = DashboardSummary::from_json(raw).expect("parse");
        assert_eq!(summary.total_providers, 4);
        assert_eq!(summary.total_services, 7);
        assert_eq!(summary.providers_by_country[0].country, "COL");
        assert_eq!(summary.services_by_country[0].total_services, 2);
    }

    #[test]
    fn serializes_camel_case() {
        let v = serde_json::to_value(DashboardSummary::default()).expect("json");
        assert!(v.get("providersByCountry").is_some());
        assert!(v.get("totalProviders").is_some());
    }

    #[test]
    fn rejects_malformed_payload() {
        assert!(DashboardSummary::from_json("{not json").is_err());
        assert!(DashboardSummary::from_json(r#"{"totalProviders":"many"}"#).is_err());
    }
}
