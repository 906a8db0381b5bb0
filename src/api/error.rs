//! Normalized fetch errors.

use thiserror::Error;

pub const NETWORK_MESSAGE: &str = "Network error. Please check your connection.";
pub const TIMEOUT_MESSAGE: &str = "The request timed out. Please try again.";
pub const AUTH_MESSAGE: &str = "Authentication failed. Please login again.";
pub const FALLBACK_MESSAGE: &str = "An error occurred while communicating with the server";

/// Failure of one backend query.
///
/// Network, timeout and auth failures are kept apart from generic failures
/// so the UI can show tailored copy for each.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No response was received
    #[error("network error: {0}")]
    Network(String),
    /// The request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,
    /// 401 or 403
    #[error("authentication failed (HTTP {status})")]
    Auth { status: u16 },
    /// Any other failure response, or an envelope flagged unsuccessful
    #[error("server error{}: {message}", status_suffix(.status))]
    Server { status: Option<u16>, message: String },
    /// The body could not be decoded
    #[error("invalid response: {0}")]
    Decode(String),
    /// The fetch task did not complete
    #[error("fetch task failed: {0}")]
    Task(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl FetchError {
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Network(_) | FetchError::Timeout)
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, FetchError::Auth { .. })
    }

    /// Copy shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Network(_) => NETWORK_MESSAGE.to_string(),
            FetchError::Timeout => TIMEOUT_MESSAGE.to_string(),
            FetchError::Auth { .. } => AUTH_MESSAGE.to_string(),
            FetchError::Server { message, .. } if !message.trim().is_empty() => message.clone(),
            FetchError::Server { .. } | FetchError::Decode(_) | FetchError::Task(_) => {
                FALLBACK_MESSAGE.to_string()
            }
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::Server {
                status: Some(status.as_u16()),
                message: String::new(),
            }
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// Extract the server-provided message from an error body.
///
/// Looks at `detail` (string, or any other JSON re-serialized) and then
/// `message`. Returns `None` for bodies that are not JSON objects.
pub fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    match object.get("detail") {
        Some(serde_json::Value::String(detail)) => return Some(detail.clone()),
        Some(serde_json::Value::Null) | None => {}
        Some(other) => return Some(other.to_string()),
    }

    object
        .get("message")
        .and_then(|m| m.as_str())
        .map(|m| m.to_string())
}
