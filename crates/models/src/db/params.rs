//! Parameter binder: a serializable struct becomes `@Name = value` pairs.

use serde::Serialize;
use serde_json::Value;

use super::value::SqlValue;
use crate::errors::DataError;

#[derive(Debug, Clone, PartialEq)]
pub struct RoutineParam {
    /// `@` followed by the property name, case preserved.
    pub name: String,
    pub value: SqlValue,
}

impl RoutineParam {
    pub fn new(name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self { name: name.into(), value: value.into() }
    }

    /// Name without the leading `@`.
    pub fn bare_name(&self) -> &str {
        self.name.trim_start_matches('@')
    }
}

/// Parameter object for routines that take none.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NoParams {}

/// Flatten `params` into named parameters, one per serialized field, in
/// declaration order. Absent values bind as [`SqlValue::Null`].
pub fn bind_params<P>(params: Option<&P>) -> Result<Vec<RoutineParam>, DataError>
where
    P: Serialize + ?Sized,
{
    let params = params.ok_or_else(|| DataError::binding("parameter object is required"))?;
    let value = serde_json::to_value(params).map_err(|e| DataError::binding(e.to_string()))?;
    match value {
        Value::Object(fields) => Ok(fields
            .into_iter()
            .map(|(name, value)| RoutineParam { name: format!("@{name}"), value: SqlValue::from(value) })
            .collect()),
        other => Err(DataError::binding(format!("parameter object must be a struct, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct CreateParams {
        provider_name: String,
        nit: String,
        email: Option<String>,
        page_size: i32,
    }

    #[test]
    fn names_follow_pascal_case_and_null_becomes_sentinel() {
        let p = CreateParams { provider_name: "Acme".into(), nit: "900".into(), email: None, page_size: 10 };
        let bound = bind_params(Some(&p)).expect("bind");
        let names: Vec<&str> = bound.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["@ProviderName", "@Nit", "@Email", "@PageSize"]);
        assert_eq!(bound[2].value, SqlValue::Null);
        assert_eq!(bound[3].value, SqlValue::Int(10));
        assert_eq!(bound[0].bare_name(), "ProviderName");
    }

    #[test]
    fn missing_object_is_a_binding_error() {
        let err = bind_params::<CreateParams>(None).expect_err("none");
        assert!(matches!(err, DataError::Binding(_)));
    }

    #[test]
    fn scalars_are_rejected() {
        assert!(matches!(bind_params(Some(&5)), Err(DataError::Binding(_))));
    }

    #[test]
    fn empty_struct_binds_nothing() {
        assert!(bind_params(Some(&NoParams {})).expect("bind").is_empty());
    }
}
