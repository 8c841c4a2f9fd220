use serde::Deserialize;
use thiserror::Error;

/// Every way a backend call can fail, as seen by the UI.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("rejected input: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Pulls a readable message out of a FastAPI-style `{"detail": ...}` body.
/// Validation errors carry a list of objects with a `msg` field.
pub fn extract_detail(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return body.trim().to_string();
    };
    match parsed.detail {
        serde_json::Value::String(text) => text,
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

fn status_detail(status: u16, body: &str) -> String {
    let detail = extract_detail(body);
    if detail.is_empty() {
        format!("HTTP {}", status)
    } else {
        detail
    }
}

impl ApiError {
    /// Maps a non-success HTTP status and its body onto the error taxonomy.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = status_detail(status, body);
        match status {
            401 | 403 => ApiError::Auth(detail),
            404 => ApiError::NotFound(detail),
            409 => ApiError::Conflict(detail),
            400 | 422 => ApiError::Validation(detail),
            _ => ApiError::Network(format!("HTTP {}: {}", status, detail)),
        }
    }

    /// Like [`ApiError::from_status`] for filament writes: the backend reports
    /// duplicate names as 400 and lets constraint failures on rename or on a
    /// referenced delete surface as 500.
    pub fn from_write_status(status: u16, body: &str) -> Self {
        match status {
            400 | 500 => ApiError::Conflict(status_detail(status, body)),
            _ => Self::from_status(status, body),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth(_))
    }

    /// Inline text shown next to the panel or form that triggered the call.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Auth(_) => "Your session has expired. Please log in again.".to_string(),
            ApiError::Validation(detail) => format!("Please check your input: {}", detail),
            ApiError::Conflict(detail) => format!("The change was rejected: {}", detail),
            ApiError::NotFound(_) => "This entry no longer exists.".to_string(),
            ApiError::Network(_) => "Could not reach the server.".to_string(),
            ApiError::Decode(_) => "The server sent an unexpected response.".to_string(),
        }
    }
}
