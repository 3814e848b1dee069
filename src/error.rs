//! Error types for text and image generation.

/// Maximum length of an endpoint error body kept in an error message.
const MAX_ERROR_BODY_LEN: usize = 500;

/// Errors that can occur while generating text or images.
#[derive(Debug, thiserror::Error)]
pub enum GenChatError {
    /// API key missing or rejected by the endpoint.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Endpoint returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        message: String,
    },

    /// Endpoint answered successfully but the payload was unusable.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Network or HTTP transport error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Downloaded bytes could not be decoded into an image.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (temporary download file, saving results).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Broad failure class of a [`GenChatError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection, timeout or other transport failure.
    Transport,
    /// The endpoint reported a failure or sent a malformed payload.
    Endpoint,
    /// Image bytes could not be decoded.
    Decode,
    /// Local failure unrelated to the remote endpoints.
    Local,
}

impl GenChatError {
    /// Returns the failure class so callers can tell transport, endpoint
    /// and decode failures apart.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Network(e) if e.is_decode() => ErrorCategory::Endpoint,
            Self::Network(_) => ErrorCategory::Transport,
            Self::Auth(_) | Self::Api { .. } | Self::UnexpectedResponse(_) | Self::Json(_) => {
                ErrorCategory::Endpoint
            }
            Self::Decode(_) => ErrorCategory::Decode,
            Self::Io(_) | Self::InvalidRequest(_) => ErrorCategory::Local,
        }
    }

    /// Maps a non-success endpoint response to an error.
    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        let message = sanitize_error_message(body);
        match status {
            401 | 403 => Self::Auth(message),
            _ => Self::Api { status, message },
        }
    }
}

impl From<image::ImageError> for GenChatError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Self::Io(e),
            other => Self::Decode(other.to_string()),
        }
    }
}

/// Trims an endpoint error body for inclusion in an error message.
///
/// Bearer tokens are redacted and the body is truncated on a char boundary.
pub(crate) fn sanitize_error_message(body: &str) -> String {
    let redacted = body
        .split_whitespace()
        .scan(false, |after_bearer, word| {
            let out = if *after_bearer { "[REDACTED]" } else { word };
            *after_bearer = word.eq_ignore_ascii_case("bearer");
            Some(out)
        })
        .collect::<Vec<_>>()
        .join(" ");

    if redacted.chars().count() <= MAX_ERROR_BODY_LEN {
        return redacted;
    }
    let truncated: String = redacted.chars().take(MAX_ERROR_BODY_LEN).collect();
    format!("{truncated}...")
}

/// Result type alias for generation operations.
pub type Result<T> = std::result::Result<T, GenChatError>;
