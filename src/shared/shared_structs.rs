// src/shared/shared_structs.rs

use serde::Serialize;

/// Generic structure standardizing every API response.
/// 'T' is the type of the response body, which may be absent.
#[derive(Debug, Serialize)]
pub struct GenericResponse<T> {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")] // Omit 'body' when None
    pub body: Option<T>,
}

impl<T> GenericResponse<T> {
    /// Successful response carrying a body.
    pub fn ok(message: impl Into<String>, body: T) -> Self {
        GenericResponse {
            status: "success".to_string(),
            message: message.into(),
            body: Some(body),
        }
    }
}

impl GenericResponse<()> {
    /// Successful response with a message only.
    pub fn success(message: impl Into<String>) -> Self {
        GenericResponse {
            status: "success".to_string(),
            message: message.into(),
            body: None,
        }
    }

    /// Error response with a message only.
    pub fn error(message: impl Into<String>) -> Self {
        GenericResponse {
            status: "error".to_string(),
            message: message.into(),
            body: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_omitted_when_absent() {
        let value = serde_json::to_value(GenericResponse::<()>::error("nope")).expect("serialize");
        assert_eq!(value["status"], "error");
        assert_eq!(value["message"], "nope");
        assert!(value.get("body").is_none());
    }

    #[test]
    fn body_is_present_when_set() {
        let value =
            serde_json::to_value(GenericResponse::ok("done", vec![1, 2, 3])).expect("serialize");
        assert_eq!(value["status"], "success");
        assert_eq!(value["body"], serde_json::json!([1, 2, 3]));
    }
}
