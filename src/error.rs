use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Cli(#[from] CliError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Validation(#[from] InputValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Display(#[from] DisplayError),
    /// User interrupt (Ctrl-C) while a command was running.
    #[error("Cancelled")]
    Cancelled,
    /// Deliberate early exit that is not a failure, e.g. "Nothing to update".
    #[error("Exit with code {0}")]
    Exit(i32),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Not authenticated with {environment}")]
    NotAuthenticated { environment: String, sandbox: bool },
    #[error("No organization specified")]
    NoOrganization,
    #[error("Organization not found: {id_or_slug}")]
    OrganizationNotFound { id_or_slug: String },
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

impl CliError {
    pub fn hint(&self) -> Option<String> {
        match self {
            CliError::NotAuthenticated { sandbox, .. } => {
                let flag = if *sandbox { " --sandbox" } else { "" };
                Some(format!("Run 'polar auth login{}' first", flag))
            }
            CliError::NoOrganization => Some(
                "Pass --org <id> or set a default with 'polar org set-default <id>'".to_string(),
            ),
            CliError::OrganizationNotFound { .. } => {
                Some("Run 'polar org list' to see accessible organizations".to_string())
            }
            CliError::InvalidArguments(_) => None,
        }
    }
}

/// Body of a non-success API response, kept in whichever shape it arrived in.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Text(String),
    Json(Value),
}

impl From<String> for ResponseBody {
    fn from(text: String) -> Self {
        if text.trim().is_empty() {
            ResponseBody::Empty
        } else {
            ResponseBody::Text(text)
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Empty => write!(f, "<empty body>"),
            ResponseBody::Text(text) => write!(f, "{}", text),
            ResponseBody::Json(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP {status} from {endpoint}: {body}")]
    Status {
        status: u16,
        endpoint: String,
        body: ResponseBody,
    },
    #[error("Could not connect to {endpoint}: {message}")]
    Connection { endpoint: String, message: String },
    #[error("Request to {endpoint} timed out after {timeout_secs}s")]
    Timeout { endpoint: String, timeout_secs: u64 },
    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
    #[error("HTTP transport error on {endpoint}: {message}")]
    Transport { endpoint: String, message: String },
}

/// One problem found while validating command input locally.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    /// Location path as the request schema nests it, e.g. `["body", "email"]`.
    pub loc: Vec<String>,
    pub msg: String,
}

impl FieldIssue {
    pub fn new<I, S>(loc: I, msg: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            loc: loc.into_iter().map(Into::into).collect(),
            msg: msg.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid input: {}", summarize(.issues))]
pub struct InputValidationError {
    pub issues: Vec<FieldIssue>,
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.loc.join("."), issue.msg))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Keyring error: {0}")]
    KeyringError(String),
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Value has no document representation: {0}")]
    NotSerializable(String),
    #[error("Terminal output error: {0}")]
    TerminalOutput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_hints() {
        let err = CliError::NotAuthenticated {
            environment: "sandbox".to_string(),
            sandbox: true,
        };
        assert_eq!(err.to_string(), "Not authenticated with sandbox");
        assert_eq!(
            err.hint().as_deref(),
            Some("Run 'polar auth login --sandbox' first")
        );

        let err = CliError::InvalidArguments("bad".to_string());
        assert!(err.hint().is_none());
    }

    #[test]
    fn test_app_error_is_transparent() {
        let app_err = AppError::Cli(CliError::InvalidArguments("missing id".to_string()));
        assert_eq!(format!("{}", app_err), "Invalid arguments: missing id");

        let app_err = AppError::Api(ApiError::Timeout {
            endpoint: "/v1/products/".to_string(),
            timeout_secs: 30,
        });
        assert_eq!(
            format!("{}", app_err),
            "Request to /v1/products/ timed out after 30s"
        );
    }

    #[test]
    fn test_response_body_from_text() {
        assert_eq!(ResponseBody::from("  ".to_string()), ResponseBody::Empty);
        assert_eq!(
            ResponseBody::from("oops".to_string()),
            ResponseBody::Text("oops".to_string())
        );
    }

    #[test]
    fn test_input_validation_error_display() {
        let err = InputValidationError {
            issues: vec![
                FieldIssue::new(["body", "email"], "Invalid email"),
                FieldIssue::new(["body", "name"], "Required"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Invalid input: body.email: Invalid email; body.name: Required"
        );
    }
}
