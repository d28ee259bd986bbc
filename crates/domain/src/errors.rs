//! Error types used throughout the SDK

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::INVALID_SESSION_CODE;

/// Snapshot of the HTTP response that produced an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseInfo {
    pub status: u16,
    pub status_text: String,
    pub url: String,
}

/// Coarse classification of a [`StitchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Authenticated call attempted without a session
    AuthRequired,
    /// Server-reported error with message and code
    StitchError,
    /// Server rejected the presented access token
    InvalidSession,
    /// Non-JSON, non-2xx response
    TransportError,
    /// Could not reach the server at all
    Network,
    /// Caller-supplied configuration is unusable
    ConfigError,
    /// Caller-supplied arguments are unusable
    InvalidInput,
    /// Encoding or decoding a payload failed
    Codec,
    /// Token persistence failed
    Storage,
    /// Bug or broken invariant
    Internal,
}

/// Main error type for the Stitch SDK
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum StitchError {
    #[error("must authenticate first")]
    AuthRequired,

    #[error("{message}")]
    Server { message: String, code: Option<String>, response: Option<ResponseInfo> },

    #[error("{status_text}")]
    Transport { status_text: String, response: ResponseInfo },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Auth provider not found: {0}")]
    ProviderNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("Impersonation error: {0}")]
    Impersonation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StitchError {
    /// Build a server-reported error from the `{error, errorCode}` body shape.
    pub fn server(
        message: impl Into<String>,
        code: Option<String>,
        response: Option<ResponseInfo>,
    ) -> Self {
        Self::Server { message: message.into(), code, response }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthRequired => ErrorKind::AuthRequired,
            Self::Server { .. } if self.is_invalid_session() => ErrorKind::InvalidSession,
            Self::Server { .. } | Self::Impersonation(_) => ErrorKind::StitchError,
            Self::Transport { .. } => ErrorKind::TransportError,
            Self::Network(_) => ErrorKind::Network,
            Self::Config(_) => ErrorKind::ConfigError,
            Self::ProviderNotFound(_) | Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Codec(_) => ErrorKind::Codec,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Server error code, when the server supplied one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Server { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Response that carried the error, if any.
    pub fn response(&self) -> Option<&ResponseInfo> {
        match self {
            Self::Server { response, .. } => response.as_ref(),
            Self::Transport { response, .. } => Some(response),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }

    /// True when the server rejected the session (case-sensitive code match).
    pub fn is_invalid_session(&self) -> bool {
        self.code() == Some(INVALID_SESSION_CODE)
    }
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, StitchError>;
