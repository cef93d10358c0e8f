use crate::error::ApiError;

/// Request timeout applied by the HTTP client, reported back in timeout errors.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Convert reqwest errors to ApiError with endpoint context
pub fn convert_request_error(error: reqwest::Error, endpoint: &str) -> ApiError {
    if error.is_timeout() {
        return ApiError::Timeout {
            endpoint: endpoint.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        };
    }
    if error.is_connect() {
        return ApiError::Connection {
            endpoint: endpoint.to_string(),
            message: error.to_string(),
        };
    }
    if error.is_decode() {
        return ApiError::Decode {
            endpoint: endpoint.to_string(),
            message: error.to_string(),
        };
    }
    ApiError::Transport {
        endpoint: endpoint.to_string(),
        message: error.to_string(),
    }
}

/// Convert JSON deserialization errors to ApiError with endpoint context
pub fn convert_json_error(error: serde_json::Error, endpoint: &str) -> ApiError {
    ApiError::Decode {
        endpoint: endpoint.to_string(),
        message: format!("JSON parse error: {}", error),
    }
}

/// Helper macro for standardizing map_err patterns
#[macro_export]
macro_rules! map_api_error {
    ($result:expr, $endpoint:expr) => {
        $result.map_err(|e| $crate::utils::error_helpers::convert_request_error(e, $endpoint))
    };
}
