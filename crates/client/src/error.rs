//! Typed error enum for the client crate.

use thiserror::Error;

/// Errors from liftlog API calls.
///
/// `Validation`, `NotFound`, `Conflict` and 4xx `HttpStatus` mean the server
/// answered and applied nothing. `Transport`, `Decode` and 5xx `HttpStatus`
/// mean the outcome is unknown: the write may have committed before the
/// failure (or behind a gateway that timed out).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("JSON parse error in {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("workout '{0}' has an unconfirmed mutation; refresh before editing")]
    Stale(String),
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl ClientError {
    /// Whether the server may or may not have applied the request.
    #[must_use]
    pub fn outcome_unknown(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Decode { .. } => true,
            Self::HttpStatus { code, .. } => *code >= 500,
            _ => false,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
