//! Failure classification and the response envelope.
//!
//! # Design
//! Every failed call rejects with an `ApiError`, whatever went wrong: a 401,
//! another 4xx/5xx, a request that never got an answer, or one that could
//! not be sent at all. Callers branch on `Result` alone and read the
//! human-readable message; they never inspect transport status codes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const UNAUTHORIZED_MESSAGE: &str = "unauthorized, please log in again";
pub const REQUEST_FAILED_MESSAGE: &str = "request failed";
pub const NETWORK_FAILURE_MESSAGE: &str = "network connection failed, check server connectivity";
pub const CONFIGURATION_ERROR_MESSAGE: &str = "request configuration error, check network settings";

/// Normalized `{success, data, message}` shape.
///
/// A failure envelope always carries a non-empty `message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The four causes a call can fail with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The server answered 401.
    Unauthorized,
    /// The server answered with any other error status.
    ClientOrServerError,
    /// The request left but no response arrived (timeout, refused connection).
    NetworkFailure,
    /// The request could not be built or sent.
    ConfigurationError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::ClientOrServerError => "clientOrServerError",
            ErrorKind::NetworkFailure => "networkFailure",
            ErrorKind::ConfigurationError => "configurationError",
        }
    }
}

/// Rejected outcome of an API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ErrorKind,
    status: Option<u16>,
    message: String,
}

impl ApiError {
    /// Falls back to `default` when `message` is missing or blank.
    pub(crate) fn new(
        kind: ErrorKind,
        status: Option<u16>,
        message: Option<String>,
        default: &str,
    ) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default.to_string());
        Self { kind, status, message }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn envelope(&self) -> ResponseEnvelope {
        ResponseEnvelope {
            success: false,
            data: None,
            message: Some(self.message.clone()),
        }
    }
}

/// Why a `Transport` produced no response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request was sent but nothing came back.
    #[error("no response received: {0}")]
    NoResponse(String),

    /// The request could not be constructed or sent.
    #[error("request not sent: {0}")]
    NotSent(String),
}

/// Errors from persisting or loading the credential.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("no credential location available on this platform")]
    NoLocation,
}

/// Errors from loading `ClientConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid client configuration: {0}")]
    Invalid(#[from] figment::Error),
}
