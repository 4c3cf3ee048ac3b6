use thiserror::Error;

const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Session expired")]
    Unauthorized,

    #[error("Request failed with status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Malformed request: {0}")]
    Encode(String),
}

impl ApiError {
    /// Text shown to the user; server-provided detail wins over the generic copy.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Could not reach the server. Check your connection.".to_string(),
            ApiError::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            ApiError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.trim().to_string(),
            ApiError::Status { status: 404, .. } => "The record no longer exists.".to_string(),
            _ => GENERIC_MESSAGE.to_string(),
        }
    }

    /// Builds a status error from a non-2xx response body.
    pub fn from_status(status: u16, body: &str) -> Self {
        if status == 401 {
            return ApiError::Unauthorized;
        }
        ApiError::Status {
            status,
            message: extract_message(body),
        }
    }
}

/// Pulls the first readable message out of a JSON error body such as
/// `{"detail": "..."}`, `{"message": "..."}` or `{"amount": ["..."]}`.
fn extract_message(body: &str) -> Option<String> {
    let json = serde_json::from_str::<serde_json::Value>(body).ok()?;
    for key in ["detail", "message", "error"] {
        if let Some(text) = json.get(key).and_then(|v| v.as_str()) {
            return Some(text.to_string());
        }
    }
    json.as_object()?.iter().find_map(|(field, value)| {
        let text = match value {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(items) => {
                items.first().and_then(|v| v.as_str()).map(str::to_string)
            }
            _ => None,
        }?;
        Some(format!("{field}: {text}"))
    })
}
