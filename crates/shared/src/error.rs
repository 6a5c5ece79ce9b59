use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    PayloadTooLarge,
    Internal,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::Forbidden,
            404 => ErrorCode::NotFound,
            400 | 415 | 422 => ErrorCode::Validation,
            413 => ErrorCode::PayloadTooLarge,
            _ => ErrorCode::Internal,
        }
    }
}

/// Error body a bill store may attach to a failed response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_http_statuses_to_codes() {
        assert_eq!(ErrorCode::from_status(404), ErrorCode::NotFound);
        assert_eq!(ErrorCode::from_status(415), ErrorCode::Validation);
        assert_eq!(ErrorCode::from_status(500), ErrorCode::Internal);
    }

    #[test]
    fn api_error_round_trips_snake_case_code() {
        let raw = r#"{"code":"payload_too_large","message":"receipt exceeds 5 MiB"}"#;
        let err: ApiError = serde_json::from_str(raw).expect("api error");
        assert_eq!(err.code, ErrorCode::PayloadTooLarge);
        assert_eq!(err.message, "receipt exceeds 5 MiB");
    }
}
