use std::path::PathBuf;

use shared::error::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("failed to access session file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session file '{}' is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not authenticated: no session token is stored")]
    NotAuthenticated,
    #[error("invalid api base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("server responded {status} for {url}: {message}")]
    Http {
        url: String,
        status: u16,
        message: String,
    },
    #[error("invalid response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn api_error(&self) -> Option<ApiError> {
        match self {
            Self::Http {
                status, message, ..
            } => Some(ApiError::from_status(*status, message.clone())),
            _ => None,
        }
    }

    /// True when the server refused the bearer credential or none was available.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::NotAuthenticated)
            || self.api_error().is_some_and(|err| err.is_unauthorized())
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
