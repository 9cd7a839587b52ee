use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorCode {
    UnknownPage,
    RecordNotFound,
    InvalidSelection,
}

/// Machine-readable error envelope returned as `{"error": ...}` on every
/// non-2xx API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_use_snake_case_on_the_wire() {
        for (code, wire) in [
            (ApiErrorCode::UnknownPage, "\"unknown_page\""),
            (ApiErrorCode::RecordNotFound, "\"record_not_found\""),
            (ApiErrorCode::InvalidSelection, "\"invalid_selection\""),
        ] {
            assert_eq!(serde_json::to_string(&code).expect("serialize"), wire);
        }
    }
}
