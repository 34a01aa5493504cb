use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings Error: {0}")]
    Error(String),
}

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Logging Error: {0}")]
    Error(String),
}

/// Errors raised by the http wrapper. Only the status line is kept for
/// non-2xx responses, the body is never inspected.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to send request: {0}")]
    Transport(String),

    #[error("Request failed with status {status} {status_text}")]
    Status { status: u16, status_text: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Api Error: {0}")]
    Error(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Field keyed validation messages produced by local form checks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.errors.insert(field.to_string(), message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Ok when no field failed
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("No item selected for editing")]
    NoSelection,

    #[error("Cancelled")]
    Cancelled,

    #[error("Controller Error: {0}")]
    Error(String),
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to load permissions: {0}")]
    Load(#[from] ServiceError),

    #[error(
        "Failed to update permissions: {} addition(s) and {} removal(s) failed",
        .failed_adds.len(),
        .failed_removes.len()
    )]
    Partial {
        failed_adds: Vec<String>,
        failed_removes: Vec<String>,
        succeeded: usize,
    },
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Login failed: {0}")]
    Login(#[from] ServiceError),

    #[error("Invalid credentials: {0}")]
    Validation(ValidationErrors),

    #[error("Session store error: {0}")]
    Store(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = ApiError::Status {
            status: 404,
            status_text: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "Request failed with status 404 Not Found");
        assert_eq!(err.status(), Some(404));
        assert_eq!(ApiError::Transport("refused".to_string()).status(), None);
    }

    #[test]
    fn test_validation_errors() {
        let mut errors = ValidationErrors::new();
        assert!(errors.clone().into_result().is_ok());

        errors.add("username", "Username is required");
        errors.add("password", "Password is required");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("username"), Some("Username is required"));
        assert_eq!(
            errors.to_string(),
            "password: Password is required; username: Username is required"
        );
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_partial_sync_message() {
        let err = SyncError::Partial {
            failed_adds: vec!["p1".to_string()],
            failed_removes: vec![],
            succeeded: 2,
        };
        assert_eq!(
            err.to_string(),
            "Failed to update permissions: 1 addition(s) and 0 removal(s) failed"
        );
    }
}
