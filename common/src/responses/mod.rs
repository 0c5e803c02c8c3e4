//! The envelope every API endpoint answers with.

use serde::{Deserialize, Serialize};

/// `{ success, data?, error? }`. Failures carry a single user-facing message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    pub success: bool,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ServiceResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Collapses the envelope. A successful response without data yields
    /// `Ok(None)`.
    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self.error.unwrap_or_else(|| "Unknown error".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_carry_one_message() {
        let response: ServiceResponse<u32> = ServiceResponse::err("Database unavailable");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "Database unavailable"}));
        assert_eq!(response.into_result(), Err("Database unavailable".to_string()));
    }

    #[test]
    fn null_data_is_a_successful_none() {
        let response: ServiceResponse<u32> = serde_json::from_str(r#"{"success":true,"data":null}"#).unwrap();
        assert_eq!(response.into_result(), Ok(None));
        assert_eq!(ServiceResponse::ok(3).into_result(), Ok(Some(3)));
    }
}
