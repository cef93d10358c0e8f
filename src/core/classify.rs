//! Error classification
//!
//! Turns any [`AppError`] into exactly one user-facing [`ErrorCategory`] with a
//! message, an optional hint and an exit code. Classification is pure: the
//! same error always yields the same [`Outcome`]. Rendering lives in
//! [`crate::display::error_panel`].

use crate::core::exit_codes;
use crate::error::{ApiError, AppError, InputValidationError, ResponseBody};
use serde_json::{Map, Value};

const AUTH_HINT: &str = "Run 'polar auth login' to authenticate";
const CONNECTION_HINT: &str = "Check your internet connection and try again";
const TIMEOUT_HINT: &str = "The server took too long to respond. Try again later.";
const DEBUG_HINT: &str = "Run with POLAR_DEBUG=1 for more details";
const INPUT_HINT: &str = "Check the command options with --help";

const AUTH_ERROR_CODES: [&str; 3] = ["invalid_token", "expired_token", "Unauthorized"];

/// Leading path segment added by request-schema nesting.
const BODY_SEGMENT: &str = "body";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub location: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    Generic,
    Authentication,
    Validation(Vec<FieldError>),
    NotFound,
    Api { status: Option<u16> },
    Connection,
    Timeout,
}

impl ErrorCategory {
    pub fn title(&self) -> String {
        match self {
            ErrorCategory::Generic => "Error".to_string(),
            ErrorCategory::Authentication => "Authentication error".to_string(),
            ErrorCategory::Validation(_) => "Validation error".to_string(),
            ErrorCategory::NotFound => "Not found".to_string(),
            ErrorCategory::Api { status: Some(code) } => format!("API error ({})", code),
            ErrorCategory::Api { status: None } => "API error".to_string(),
            ErrorCategory::Connection => "Connection error".to_string(),
            ErrorCategory::Timeout => "Timeout".to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCategory::Generic | ErrorCategory::Api { .. } => exit_codes::ERROR,
            ErrorCategory::Authentication => exit_codes::AUTH_ERROR,
            ErrorCategory::Validation(_) => exit_codes::VALIDATION_ERROR,
            ErrorCategory::NotFound => exit_codes::NOT_FOUND,
            ErrorCategory::Connection | ErrorCategory::Timeout => exit_codes::CONNECTION_ERROR,
        }
    }

    fn default_hint(&self) -> Option<&'static str> {
        match self {
            ErrorCategory::Authentication => Some(AUTH_HINT),
            ErrorCategory::Connection => Some(CONNECTION_HINT),
            ErrorCategory::Timeout => Some(TIMEOUT_HINT),
            _ => None,
        }
    }
}

/// A classified failure, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliFailure {
    pub category: ErrorCategory,
    pub message: String,
    pub hint: Option<String>,
}

impl CliFailure {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        let hint = category.default_hint().map(str::to_string);
        Self {
            category,
            message: message.into(),
            hint,
        }
    }

    pub fn validation(errors: Vec<FieldError>) -> Self {
        let message = errors
            .iter()
            .map(|e| format!("  {}: {}", e.location, e.message))
            .collect::<Vec<_>>()
            .join("\n");
        Self::new(ErrorCategory::Validation(errors), message)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn title(&self) -> String {
        self.category.title()
    }

    pub fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }
}

/// What the command guard should do with a failed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Not an error: exit with this code without rendering anything.
    PassThrough(i32),
    /// The user interrupted the command.
    Cancelled,
    Failure(CliFailure),
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::PassThrough(code) => *code,
            Outcome::Cancelled => exit_codes::CANCELLED,
            Outcome::Failure(failure) => failure.exit_code(),
        }
    }
}

pub fn classify(error: &AppError) -> Outcome {
    match error {
        AppError::Exit(code) => Outcome::PassThrough(*code),
        AppError::Cancelled => Outcome::Cancelled,
        AppError::Cli(err) => {
            let mut failure = CliFailure::new(ErrorCategory::Generic, err.to_string());
            failure.hint = err.hint();
            Outcome::Failure(failure)
        }
        AppError::Validation(err) => Outcome::Failure(classify_input_error(err)),
        AppError::Api(err) => Outcome::Failure(classify_api_error(err)),
        other => Outcome::Failure(
            CliFailure::new(ErrorCategory::Generic, other.to_string()).with_hint(DEBUG_HINT),
        ),
    }
}

pub fn classify_input_error(error: &InputValidationError) -> CliFailure {
    let errors = error
        .issues
        .iter()
        .map(|issue| FieldError {
            location: normalize_location(&issue.loc),
            message: issue.msg.clone(),
        })
        .collect();
    CliFailure::validation(errors).with_hint(INPUT_HINT)
}

pub fn classify_api_error(error: &ApiError) -> CliFailure {
    match error {
        ApiError::Status { status, body, .. } => {
            let mut failure = parse_api_error(body, Some(*status));
            if failure.hint.is_none() {
                failure.hint = hint_for_status(Some(*status)).map(str::to_string);
            }
            failure
        }
        ApiError::Connection { .. } => {
            CliFailure::new(ErrorCategory::Connection, "Could not connect to API server")
        }
        ApiError::Timeout { .. } => CliFailure::new(ErrorCategory::Timeout, "Request timed out"),
        other => CliFailure::new(ErrorCategory::Generic, other.to_string()).with_hint(DEBUG_HINT),
    }
}

/// Classify an API error body. Checks run most specific first.
pub fn parse_api_error(body: &ResponseBody, status: Option<u16>) -> CliFailure {
    let api = |message: String| CliFailure::new(ErrorCategory::Api { status }, message);
    let not_found = status == Some(404);
    // A 404 is a missing resource whatever the body looks like.
    let unstructured = |message: String| {
        if not_found {
            CliFailure::new(ErrorCategory::NotFound, message)
        } else {
            api(message)
        }
    };

    let decoded = match body {
        ResponseBody::Empty => Value::Null,
        ResponseBody::Text(text) => match serde_json::from_str::<Value>(text) {
            Ok(value) => value,
            Err(_) => return unstructured(text.clone()),
        },
        ResponseBody::Json(value) => value.clone(),
    };

    let map = match decoded {
        Value::Object(map) => map,
        Value::Null if not_found => return unstructured("Resource not found".to_string()),
        Value::Null => return api("Unknown error".to_string()),
        other => return unstructured(value_text(&other)),
    };

    let error_type = match map.get("error") {
        None | Some(Value::Null) => String::new(),
        Some(value) => value_text(value),
    };

    if AUTH_ERROR_CODES.contains(&error_type.as_str()) {
        let message = match map.get("error_description") {
            Some(Value::String(description)) => description.clone(),
            _ => "Invalid or expired token".to_string(),
        };
        return CliFailure::new(ErrorCategory::Authentication, message);
    }

    if status == Some(404) || error_type == "NotFound" {
        let message = match map.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            _ => "Resource not found".to_string(),
        };
        return CliFailure::new(ErrorCategory::NotFound, message);
    }

    if let Some(Value::Array(entries)) = map.get("detail") {
        let errors = parse_validation_entries(entries);
        if !errors.is_empty() {
            return CliFailure::validation(errors);
        }
    }

    if let Some(Value::String(detail)) = map.get("detail") {
        return api(detail.clone());
    }

    if !error_type.is_empty() {
        let description =
            non_empty_text(map.get("error_description")).or_else(|| non_empty_text(map.get("detail")));
        let message = match description {
            Some(description) => format!("{}: {}", error_type, description),
            None => error_type,
        };
        return api(message);
    }

    api(pretty_json(map))
}

/// Parse `detail` entries of the form `{"loc": [...], "msg": "..."}`.
/// Entries that are not objects are skipped.
pub fn parse_validation_entries(entries: &[Value]) -> Vec<FieldError> {
    entries
        .iter()
        .filter_map(Value::as_object)
        .map(|entry| {
            let segments: Vec<String> = match entry.get("loc") {
                Some(Value::Array(parts)) => parts.iter().map(value_text).collect(),
                _ => Vec::new(),
            };
            let message = match entry.get("msg") {
                Some(Value::String(msg)) => msg.clone(),
                _ => "Invalid value".to_string(),
            };
            FieldError {
                location: normalize_location(&segments),
                message,
            }
        })
        .collect()
}

/// Join a location path with `.`, dropping a leading `body` segment.
/// An empty path becomes `input`.
pub fn normalize_location(segments: &[String]) -> String {
    let segments = match segments.split_first() {
        Some((first, rest)) if first == BODY_SEGMENT => rest,
        _ => segments,
    };
    if segments.is_empty() {
        "input".to_string()
    } else {
        segments.join(".")
    }
}

pub fn hint_for_status(status: Option<u16>) -> Option<&'static str> {
    match status? {
        401 => Some(AUTH_HINT),
        403 => Some("You don't have permission for this action"),
        404 => Some("Check that the ID is correct"),
        422 => Some("Check the input values and try again"),
        429 => Some("Too many requests. Wait a moment and try again."),
        500 => Some("Server error. Try again later."),
        502 | 503 => Some("Service temporarily unavailable. Try again later."),
        _ => None,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn non_empty_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(fields) if fields.is_empty() => None,
        other => Some(value_text(other)),
    }
}

fn pretty_json(map: Map<String, Value>) -> String {
    let value = Value::Object(map);
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CliError, FieldIssue, StorageError};
    use serde_json::json;

    fn status_error(status: u16, body: ResponseBody) -> AppError {
        AppError::Api(ApiError::Status {
            status,
            endpoint: "/v1/test/".to_string(),
            body,
        })
    }

    fn failure(outcome: Outcome) -> CliFailure {
        match outcome {
            Outcome::Failure(failure) => failure,
            other => panic!("Expected a failure, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_token_is_authentication_error() {
        let err = status_error(401, ResponseBody::Json(json!({"error": "invalid_token"})));
        let failure = failure(classify(&err));
        assert_eq!(failure.category, ErrorCategory::Authentication);
        assert_eq!(failure.title(), "Authentication error");
        assert_eq!(failure.message, "Invalid or expired token");
        assert_eq!(failure.exit_code(), 2);
        assert_eq!(failure.hint.as_deref(), Some(AUTH_HINT));
    }

    #[test]
    fn test_auth_error_codes_ignore_status() {
        for code in AUTH_ERROR_CODES {
            let body = ResponseBody::Json(json!({"error": code, "error_description": "Token expired"}));
            let failure = parse_api_error(&body, Some(400));
            assert_eq!(failure.category, ErrorCategory::Authentication);
            assert_eq!(failure.message, "Token expired");
        }
    }

    #[test]
    fn test_404_is_not_found_for_any_body() {
        let bodies = vec![
            ResponseBody::Empty,
            ResponseBody::Json(json!({"detail": "Customer not found"})),
            ResponseBody::Json(json!({"detail": [{"loc": ["id"], "msg": "bad"}]})),
            ResponseBody::Text(r#"{"foo": "bar"}"#.to_string()),
            ResponseBody::Text("Not Found".to_string()),
            ResponseBody::Json(json!(["gone"])),
        ];
        for body in bodies {
            let failure = failure(classify(&status_error(404, body)));
            assert_eq!(failure.category, ErrorCategory::NotFound);
            assert_eq!(failure.exit_code(), 4);
            assert_eq!(failure.hint.as_deref(), Some("Check that the ID is correct"));
        }
    }

    #[test]
    fn test_not_found_message() {
        let failure = parse_api_error(
            &ResponseBody::Json(json!({"detail": "Customer not found"})),
            Some(404),
        );
        assert_eq!(failure.message, "Customer not found");

        let failure = parse_api_error(&ResponseBody::Empty, Some(404));
        assert_eq!(failure.category, ErrorCategory::NotFound);
        assert_eq!(failure.message, "Resource not found");

        let failure = parse_api_error(&ResponseBody::Empty, Some(500));
        assert_eq!(failure.message, "Unknown error");

        let failure = parse_api_error(&ResponseBody::Json(json!({"error": "NotFound"})), Some(400));
        assert_eq!(failure.category, ErrorCategory::NotFound);
        assert_eq!(failure.message, "Resource not found");
    }

    #[test]
    fn test_validation_body_preserves_order_and_strips_body() {
        let body = ResponseBody::Text(
            r#"{"detail":[{"loc":["body","email"],"msg":"Invalid email"},{"loc":["body","prices",0,"price_amount"],"msg":"Too low"},{"loc":[],"type":"missing"}]}"#
                .to_string(),
        );
        let failure = failure(classify(&status_error(422, body)));
        assert_eq!(failure.exit_code(), 3);
        assert_eq!(
            failure.category,
            ErrorCategory::Validation(vec![
                FieldError {
                    location: "email".to_string(),
                    message: "Invalid email".to_string()
                },
                FieldError {
                    location: "prices.0.price_amount".to_string(),
                    message: "Too low".to_string()
                },
                FieldError {
                    location: "input".to_string(),
                    message: "Invalid value".to_string()
                },
            ])
        );
        assert_eq!(
            failure.hint.as_deref(),
            Some("Check the input values and try again")
        );
    }

    #[test]
    fn test_empty_validation_list_falls_back_to_raw_body() {
        let failure = parse_api_error(&ResponseBody::Json(json!({"detail": []})), Some(422));
        assert_eq!(failure.category, ErrorCategory::Api { status: Some(422) });
        assert_eq!(failure.message, "{\n  \"detail\": []\n}");
    }

    #[test]
    fn test_detail_string_is_api_error() {
        let failure = parse_api_error(
            &ResponseBody::Json(json!({"detail": "Payment required"})),
            Some(402),
        );
        assert_eq!(failure.category, ErrorCategory::Api { status: Some(402) });
        assert_eq!(failure.title(), "API error (402)");
        assert_eq!(failure.message, "Payment required");
    }

    #[test]
    fn test_error_type_with_description() {
        let failure = failure(classify(&status_error(
            429,
            ResponseBody::Json(json!({"error": "rate_limit", "error_description": "Too many requests"})),
        )));
        assert_eq!(failure.message, "rate_limit: Too many requests");
        assert_eq!(
            failure.hint.as_deref(),
            Some("Too many requests. Wait a moment and try again.")
        );

        let failure = parse_api_error(&ResponseBody::Json(json!({"error": "conflict"})), Some(409));
        assert_eq!(failure.message, "conflict");
        assert!(failure.hint.is_none());
    }

    #[test]
    fn test_unrecognized_body_shows_pretty_json() {
        let failure = failure(classify(&status_error(
            500,
            ResponseBody::Json(json!({"foo": "bar"})),
        )));
        assert_eq!(failure.category, ErrorCategory::Api { status: Some(500) });
        assert_eq!(failure.message, "{\n  \"foo\": \"bar\"\n}");
        assert_eq!(failure.hint.as_deref(), Some("Server error. Try again later."));
        assert_eq!(failure.exit_code(), 1);
    }

    #[test]
    fn test_plain_text_and_non_mapping_bodies() {
        let failure = parse_api_error(&ResponseBody::Text("Bad gateway".to_string()), Some(502));
        assert_eq!(failure.message, "Bad gateway");

        let failure = parse_api_error(&ResponseBody::Text("[1, 2]".to_string()), Some(400));
        assert_eq!(failure.message, "[1,2]");

        let failure = parse_api_error(&ResponseBody::Empty, None);
        assert_eq!(failure.title(), "API error");
        assert_eq!(failure.message, "Unknown error");
    }

    #[test]
    fn test_transport_failures() {
        let err = AppError::Api(ApiError::Connection {
            endpoint: "/v1/products/".to_string(),
            message: "refused".to_string(),
        });
        let failure = failure(classify(&err));
        assert_eq!(failure.category, ErrorCategory::Connection);
        assert_eq!(failure.message, "Could not connect to API server");
        assert_eq!(failure.exit_code(), 5);

        let err = AppError::Api(ApiError::Timeout {
            endpoint: "/v1/products/".to_string(),
            timeout_secs: 30,
        });
        let failure = self::failure(classify(&err));
        assert_eq!(failure.category, ErrorCategory::Timeout);
        assert_eq!(failure.message, "Request timed out");
        assert_eq!(failure.exit_code(), 5);
        assert!(failure.hint.as_deref().unwrap_or_default().contains("too long"));
    }

    #[test]
    fn test_local_validation_strips_only_leading_body() {
        let err = AppError::Validation(InputValidationError {
            issues: vec![
                FieldIssue::new(["body", "email"], "Invalid email"),
                FieldIssue::new(["body"], "Missing"),
                FieldIssue::new(["metadata", "body"], "Too long"),
            ],
        });
        let failure = failure(classify(&err));
        let ErrorCategory::Validation(errors) = &failure.category else {
            panic!("Expected validation category");
        };
        let locations: Vec<&str> = errors.iter().map(|e| e.location.as_str()).collect();
        assert_eq!(locations, vec!["email", "input", "metadata.body"]);
        assert_eq!(failure.message, "  email: Invalid email\n  input: Missing\n  metadata.body: Too long");
        assert_eq!(failure.hint.as_deref(), Some(INPUT_HINT));
    }

    #[test]
    fn test_pass_through_and_cancel() {
        assert_eq!(classify(&AppError::Exit(0)), Outcome::PassThrough(0));
        assert_eq!(classify(&AppError::Cancelled).exit_code(), 130);
    }

    #[test]
    fn test_uncategorized_errors_are_generic() {
        let err = AppError::Storage(StorageError::ConfigDirNotFound);
        let failure = failure(classify(&err));
        assert_eq!(failure.category, ErrorCategory::Generic);
        assert_eq!(failure.title(), "Error");
        assert_eq!(failure.message, "Configuration directory not found");
        assert_eq!(failure.hint.as_deref(), Some(DEBUG_HINT));

        let err = AppError::Cli(CliError::NoOrganization);
        let failure = self::failure(classify(&err));
        assert_eq!(failure.exit_code(), 1);
        assert!(failure.hint.unwrap_or_default().contains("set-default"));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let err = status_error(403, ResponseBody::Text(r#"{"detail":"Forbidden"}"#.to_string()));
        assert_eq!(classify(&err), classify(&err));
    }

    #[test]
    fn test_hint_table_edges() {
        assert_eq!(hint_for_status(None), None);
        assert_eq!(hint_for_status(Some(418)), None);
        assert_eq!(hint_for_status(Some(503)), hint_for_status(Some(502)));
    }
}
