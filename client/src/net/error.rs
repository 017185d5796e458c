//! Failure shape shared by every remote call.
//!
//! DESIGN
//! ======
//! The backend reports errors as `{ "message": "..." }` or
//! `{ "message": ["...", "..."] }`. That is normalized here, once, into an
//! ordered list so no caller ever inspects the raw shape again.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::Value;

/// Message shown for transport failures, in the app's language.
pub const TRANSPORT_MESSAGE: &str = "No se pudo conectar con el servidor";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The service answered with a failure status.
    #[error("request rejected with status {status}: {}", messages.join("; "))]
    Rejected { status: u16, messages: Vec<String> },

    /// No response arrived, or the body was not JSON.
    #[error("No se pudo conectar con el servidor: {0}")]
    Transport(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// Text for a user-facing alert: rejection messages one per line, or the
    /// generic transport message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { messages, .. } => messages.join("\n"),
            Self::Transport(_) | Self::HttpClientBuild(_) => TRANSPORT_MESSAGE.to_owned(),
        }
    }
}

/// Interpret a raw auth-service response.
///
/// The body is parsed as JSON whatever the status. An empty body reads as
/// `null`. A failure status becomes [`ApiError::Rejected`] with the messages
/// from [`extract_messages`].
pub(crate) fn interpret_response(status: u16, body: &str, fallback: &str) -> Result<Value, ApiError> {
    let payload = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str::<Value>(body).map_err(|e| ApiError::Transport(format!("invalid JSON body: {e}")))?
    };

    if !(200..300).contains(&status) {
        return Err(ApiError::Rejected { status, messages: extract_messages(&payload, fallback) });
    }
    Ok(payload)
}

/// Pull the ordered `message` list out of an error payload, falling back to
/// `fallback` when nothing usable is present.
pub(crate) fn extract_messages(payload: &Value, fallback: &str) -> Vec<String> {
    let messages: Vec<String> = match payload.get("message") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .map(str::to_owned)
            .collect(),
        Some(Value::String(message)) if !message.trim().is_empty() => vec![message.clone()],
        _ => Vec::new(),
    };

    if messages.is_empty() { vec![fallback.to_owned()] } else { messages }
}
