//! API response wrappers and error payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generic API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded
    pub success: bool,

    /// Response payload on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Error payload on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,

    /// Timestamp of the response
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Create an error response
    pub fn error(error: impl Into<ErrorResponse>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }

    /// Consume the response, returning its payload
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// Unified error payload for API responses
///
/// Carries a stable machine-readable code plus a human-readable message.
/// The message never includes token material or other credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub error: String,

    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl ToString, message: impl ToString) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let response = ApiResponse::success(42);
        assert!(response.success);
        assert_eq!(response.into_data(), Some(42));
    }

    #[test]
    fn test_error_response() {
        let response: ApiResponse<()> = ApiResponse::error(ErrorResponse::new(
            "INVALID_TOKEN",
            "Invalid token",
        ));
        assert!(!response.success);
        assert_eq!(response.error.unwrap().error, "INVALID_TOKEN");
    }

    #[test]
    fn test_error_response_serialization() {
        let payload = ErrorResponse::new("INVALID_REFRESH_TOKEN", "Invalid refresh token");
        let json = serde_json::to_string(&payload).unwrap();
        let back: ErrorResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(payload, back);
    }
}
