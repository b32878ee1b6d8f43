//! Lookup and export error types.

use std::fmt;

use thiserror::Error;

/// Contact field an export action needed but the user lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Mail,
    Telephone,
    PostalAddress,
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mail => "email address",
            Self::Telephone => "phone number",
            Self::PostalAddress => "mailing address",
        })
    }
}

/// Errors that can occur in lookup and export operations.
#[derive(Debug, Error)]
pub enum LookupError {
    // ── Lookup ──────────────────────────────────────────────────────────────

    #[error("Search text is empty")]
    EmptySearch,

    #[error("Could not build lookup URL: {0}")]
    InvalidSearch(#[from] url::ParseError),

    #[error("Lookup request failed: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Lookup response did not match the expected shape: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Superseded by a newer query. Expected, never shown to the user.
    #[error("Lookup was cancelled")]
    CancelError,

    // ── Export ──────────────────────────────────────────────────────────────

    #[error("{uid} has no {field}")]
    MissingContactInfo { uid: String, field: ContactField },

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("Could not open '{url}': {source}")]
    Launch {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

impl LookupError {
    /// Everything but a cancellation maps to the Error status.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::CancelError)
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
