//! Error types for the client crate.

use std::collections::BTreeMap;
use std::path::PathBuf;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use sasb_auth::AccessError;
use sasb_core::DomainError;

/// Failure to reach the API at all. Non-2xx statuses are not transport errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("could not connect to {url}: {message}")]
    Connect { url: String, message: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("network error: {0}")]
    Network(String),
}

impl TransportError {
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
            }
        } else if err.is_connect() {
            TransportError::Connect {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else if err.is_builder() {
            TransportError::InvalidUrl(url.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access token file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode tokens: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("server unreachable: {0}")]
    Unreachable(#[source] TransportError),

    #[error("API error ({status}): {body}")]
    Api { status: StatusCode, body: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("failed to encode request body: {0}")]
    Encode(String),

    #[error("no refresh token stored; login required")]
    MissingRefreshToken,

    #[error("token storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("validation failed: {0}")]
    Validation(#[from] DomainError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status of an API rejection, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the API rejected the request as not authorized (401).
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Decoded body of an API rejection.
    pub fn api_error(&self) -> Option<ApiErrorBody> {
        match self {
            ClientError::Api { body, .. } => Some(ApiErrorBody::parse(body)),
            _ => None,
        }
    }
}

/// Error payload returned by the backend.
///
/// Seen shapes: `{"error": "...", "message": "..."}` for business-rule
/// rejections, `{"detail": "..."}` for auth and permission failures, and
/// `{"field": ["msg", ...]}` for serializer validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
    pub detail: Option<String>,
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ApiErrorBody {
    pub fn parse(body: &str) -> Self {
        #[derive(Deserialize)]
        struct Known {
            error: Option<String>,
            message: Option<String>,
            detail: Option<String>,
        }

        let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
            return Self::default();
        };

        let mut parsed = match serde_json::from_value::<Known>(value.clone()) {
            Ok(known) => Self {
                error: known.error,
                message: known.message,
                detail: known.detail,
                field_errors: BTreeMap::new(),
            },
            Err(_) => Self::default(),
        };

        if let serde_json::Value::Object(map) = value {
            for (field, messages) in map {
                if let Ok(messages) = serde_json::from_value::<Vec<String>>(messages) {
                    parsed.field_errors.insert(field, messages);
                }
            }
        }
        parsed
    }

    /// Best human-readable summary of the rejection.
    pub fn summary(&self) -> Option<String> {
        if let Some(message) = self.message.as_ref().or(self.detail.as_ref()) {
            return Some(message.clone());
        }
        if let Some(error) = &self.error {
            return Some(error.clone());
        }
        if self.field_errors.is_empty() {
            return None;
        }
        Some(
            self.field_errors
                .iter()
                .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
