//! Error taxonomy for fetching and presenting hypothesis data.

use thiserror::Error;

/// Errors produced by a [`Fetcher`](crate::api::Fetcher) operation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// The request was rejected, the server answered with a non-2xx status,
    /// or the body carried an `{"error": ...}` payload.
    #[error("{}", network_message(*status, message))]
    Network {
        status: Option<u16>,
        message: String,
    },

    /// The body was not valid JSON, or not the shape the caller expected.
    #[error("Decode error: {0}")]
    Decode(String),
}

fn network_message(status: Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("HTTP {}: {}", code, message),
        None => format!("Connection error: {}", message),
    }
}

impl FetchError {
    pub fn network(status: Option<u16>, message: impl Into<String>) -> Self {
        FetchError::Network {
            status,
            message: message.into(),
        }
    }

    /// HTTP status attached to the failure, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Network { status, .. } => *status,
            FetchError::Decode(_) => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::network(err.status().map(|s| s.as_u16()), err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Visual weight of a notice shown in the main content region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Danger,
}

impl NoticeLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Danger => "danger",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "info-circle",
            NoticeLevel::Warning => "exclamation-triangle",
            NoticeLevel::Danger => "x-circle",
        }
    }
}

/// Errors surfaced to the user by a navigation action.
///
/// None of these are fatal: the caller logs them and replaces the main
/// content region with a notice.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ViewError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A user action needs a selection (strategies, topic) that is missing.
    #[error("{0}")]
    EmptySelection(String),
}

impl ViewError {
    pub fn level(&self) -> NoticeLevel {
        match self {
            ViewError::EmptySelection(_) => NoticeLevel::Warning,
            ViewError::Fetch(_) => NoticeLevel::Danger,
        }
    }
}
