//! Error kinds surfaced by the remote store and the navigation entry point.

use thiserror::Error;

/// Failure of a call to the remote bills service.
///
/// The `Display` text is what the bills page shows in its error banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Erreur {status}")]
    Status { status: u16 },
    #[error("{0}")]
    Rejected(String),
    #[error("network error: {0}")]
    Transport(String),
    #[error("malformed store response: {0}")]
    Decode(String),
    #[error("invalid store url: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Decode(value.to_string())
        } else {
            Self::Transport(value.to_string())
        }
    }
}

impl From<url::ParseError> for StoreError {
    fn from(value: url::ParseError) -> Self {
        Self::InvalidUrl(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("navigation entry point already initialized")]
    AlreadyInitialized,
    #[error("navigation entry point not initialized")]
    NotInitialized,
}

/// A render target whose view was replaced by a later navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("render target generation {target} superseded by generation {current}")]
pub struct StaleView {
    pub target: u64,
    pub current: u64,
}
