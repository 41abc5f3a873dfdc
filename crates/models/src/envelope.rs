//! The uniform `{ isSuccess, message, data }` result wrapper.

use serde::{Deserialize, Serialize};

pub const OPERATION_COMPLETED: &str = "Operation completed successfully.";
pub const NO_DATA_RETURNED: &str = "No data returned from the service.";
pub const NO_INFORMATION_FOUND: &str = "No information found.";
pub const NO_DATA_FROM_PROCEDURE: &str = "No data returned from stored procedure.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDto<T = serde_json::Value> {
    pub is_success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ResponseDto<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self { is_success: true, message: Some(message.into()), data: Some(data) }
    }

    pub fn ok(data: T) -> Self {
        Self::success(data, OPERATION_COMPLETED)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { is_success: false, message: Some(message.into()), data: None }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResponseDto<U> {
        ResponseDto { is_success: self.is_success, message: self.message, data: self.data.map(f) }
    }

    /// Drop the typed payload for transports that want untyped JSON.
    pub fn into_json(self) -> ResponseDto
    where
        T: Serialize,
    {
        let Self { is_success, message, data } = self;
        match data.map(serde_json::to_value).transpose() {
            Ok(data) => ResponseDto { is_success, message, data },
            Err(e) => ResponseDto::failure(e.to_string()),
        }
    }
}

/// Page of rows plus the grand total reported by the routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePage<T> {
    pub results: Vec<T>,
    pub total_records: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_camel_case_with_explicit_null_data() {
        let env: ResponseDto<()> = ResponseDto::failure("No information found.");
        assert_eq!(
            serde_json::to_value(&env).expect("json"),
            json!({"isSuccess": false, "message": "No information found.", "data": null})
        );
    }

    #[test]
    fn table_page_shape() {
        let env = ResponseDto::ok(TablePage { results: vec![1, 2], total_records: 42 });
        let v = serde_json::to_value(&env).expect("json");
        assert_eq!(v["data"], json!({"results": [1, 2], "totalRecords": 42}));
        assert_eq!(v["message"], OPERATION_COMPLETED);
    }
}
