use serde::{Deserialize, Serialize};

/// Links a service to a provider for a set of countries.
///
/// `country_codes` is the JSON array text the client sends (`["COL","PER"]`);
/// the routine parses it server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase", deserialize = "camelCase"))]
pub struct AssignServiceRequest {
    #[serde(default)]
    pub provider_id: i32,
    #[serde(default)]
    pub service_id: i32,
    #[serde(default)]
    pub country_codes: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{bind_params, SqlValue};

    #[test]
    fn country_codes_bind_as_text() {
        let req: AssignServiceRequest = serde_json::from_str(
            r#"{"providerId":1,"serviceId":2,"countryCodes":"[\"COL\",\"PER\"]"}"#,
        )
        .expect("parse");
        let bound = bind_params(Some(&req)).expect("bind");
        assert_eq!(bound[2].name, "@CountryCodes");
        assert_eq!(bound[2].value, SqlValue::Text(r#"["COL","PER"]"#.into()));
    }
}
