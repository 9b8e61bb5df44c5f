//! Normalised synchronisation errors.
//!
//! Transport failures, non-2xx API responses, undecodable payloads, and
//! identity-provider failures all collapse into one [`SyncError`] value. Stores
//! keep the last one they saw; nothing in the synchronisation layer raises
//! errors into presentation code.

use serde::{Deserialize, Serialize};

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request never produced an HTTP response.
    Transport,
    /// The API answered with a non-2xx status.
    Api,
    /// The response body did not match the expected payload shape.
    Decode,
    /// The identity provider failed to initialise or complete a redirect.
    Identity,
}

impl ErrorCode {
    const fn fallback_message(self) -> &'static str {
        match self {
            Self::Transport => "network request failed",
            Self::Api => "request was rejected by the server",
            Self::Decode => "unexpected response from the server",
            Self::Identity => "authentication failed",
        }
    }
}

/// Error payload stored in an entity store's `error` field.
///
/// ## Invariants
/// - `message` is non-empty once trimmed; blank input is replaced by a
///   category-specific fallback.
/// - `status` is only present for [`ErrorCode::Api`].
///
/// # Examples
/// ```
/// use frontend::domain::{ErrorCode, SyncError};
///
/// let err = SyncError::api(404, "question not found");
/// assert_eq!(err.code(), ErrorCode::Api);
/// assert_eq!(err.status(), Some(404));
/// assert_eq!(err.to_string(), "question not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncError {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
}

impl SyncError {
    /// Create a new error, substituting a fallback for blank messages.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.fallback_message().to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            status: None,
        }
    }

    /// Convenience constructor for [`ErrorCode::Transport`].
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Transport, message)
    }

    /// Convenience constructor for [`ErrorCode::Api`] carrying the status code.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            ..Self::new(ErrorCode::Api, message)
        }
    }

    /// Convenience constructor for [`ErrorCode::Decode`].
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Decode, message)
    }

    /// Convenience constructor for [`ErrorCode::Identity`].
    pub fn identity(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Identity, message)
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message for the UI.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// HTTP status for API rejections.
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SyncError {}

#[cfg(test)]
mod tests;
