//! Error types surfaced by the client.
//!
//! Every response with status >= 400 becomes an [`Error::Api`] carrying
//! the HTTP status plus whatever the server attached, decoded per the
//! response content type. Callers can branch on [`Error::status`] and
//! [`Error::message`] without destructuring the full shape.

use crate::datasets::ContentType;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing API token (pass one explicitly or set AXIOM_TOKEN)")]
    MissingToken,

    #[error("credential is not a valid {0} header value")]
    InvalidHeader(&'static str),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl Error {
    /// HTTP status of the failed call, when this error came from a
    /// response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(api) => Some(api.status),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Decoded server message, when the failure body carried one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Error::Api(api) => api.message(),
            _ => None,
        }
    }
}

/// A failed (>= 400) API response.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: u16,
    pub details: ErrorDetails,
}

impl ApiError {
    /// Decoded `message` field, when the body was a JSON error object.
    pub fn message(&self) -> Option<&str> {
        match &self.details {
            ErrorDetails::Json(body) => body.message.as_deref(),
            _ => None,
        }
    }

    /// Decoded `error` field (the service's error category).
    pub fn error_code(&self) -> Option<&str> {
        match &self.details {
            ErrorDetails::Json(body) => body.error.as_deref(),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API request failed: HTTP {}", self.status)?;
        match &self.details {
            ErrorDetails::Json(body) => {
                if let Some(message) = &body.message {
                    write!(f, ": {}", message)?;
                }
                if let Some(code) = &body.error {
                    write!(f, " ({})", code)?;
                }
            }
            ErrorDetails::NdJson(records) => {
                write!(f, ": {} per-event failure(s)", records.len())?;
            }
            ErrorDetails::Raw(body) => {
                if !body.is_empty() {
                    write!(f, ": {}", body)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// What the server attached to a failed response, keyed by its
/// `content-type` header.
#[derive(Debug, Clone)]
pub enum ErrorDetails {
    /// `application/json`: one decoded error object.
    Json(ApiErrorBody),
    /// `application/x-ndjson`: one record per line, as the service
    /// reports per-event ingestion failures.
    NdJson(Vec<serde_json::Value>),
    /// Anything else: the raw body text.
    Raw(String),
}

/// The error object shape the service returns. Every field is optional;
/// missing fields decode to `None` rather than failing.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

pub(crate) fn decode_error_details(content_type: Option<&str>, body: &str) -> ErrorDetails {
    match content_type.and_then(ContentType::from_header) {
        Some(ContentType::Json) => match serde_json::from_str(body) {
            Ok(decoded) => ErrorDetails::Json(decoded),
            Err(_) => ErrorDetails::Raw(body.to_string()),
        },
        Some(ContentType::NdJson) => ErrorDetails::NdJson(
            body.lines()
                .filter(|line| !line.trim().is_empty())
                .filter_map(|line| serde_json::from_str(line).ok())
                .collect(),
        ),
        Some(ContentType::Csv) | None => ErrorDetails::Raw(body.to_string()),
    }
}
