// Serializable success/failure envelope

use crate::error::StoreError;
use serde::{Deserialize, Serialize};

/// Uniform result shape for collaborators that exchange JSON
///
/// `data` is present only on success, `error` only on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Outcome<T> {
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
}

impl<T> From<Result<T, StoreError>> for Outcome<T> {
    fn from(result: Result<T, StoreError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    #[test]
    fn test_success_shape() {
        let outcome: Outcome<u32> = Ok(7).into();
        assert!(outcome.success);
        assert_eq!(serde_json::to_string(&outcome).unwrap(), r#"{"success":true,"data":7}"#);
    }

    #[test]
    fn test_failure_shape() {
        let outcome: Outcome<u32> = Err(StoreError::Validation(ValidationError::Empty)).into();
        assert!(!outcome.success);
        assert_eq!(
            serde_json::to_string(&outcome).unwrap(),
            r#"{"success":false,"error":"Todo text cannot be empty"}"#
        );
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let outcome: Outcome<String> = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.data, None);
        assert_eq!(outcome.error, None);
    }
}
