//! Error types for loophole.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

use crate::api::{RequestError, RequestErrorKind};
use crate::auth::AuthError;

/// Primary error type for loophole operations.
#[derive(Error, Debug)]
pub enum LoopholeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Key error: {0}")]
    Key(String),

    #[error("Tunnel error: {0}")]
    Tunnel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl LoopholeError {
    /// Developer-facing details, when the error carries any beyond its message.
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::Request(err) if !err.details.is_empty() => Some(err.details.as_str()),
            _ => None,
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Auth(err) => match err {
                AuthError::NotLoggedIn => ErrorCategory::Unauthenticated,
                AuthError::Aborted => ErrorCategory::Aborted,
                AuthError::Expired => ErrorCategory::Expired,
                AuthError::Denied => ErrorCategory::Denied,
                AuthError::Protocol(_) | AuthError::Rejected { .. } => ErrorCategory::Protocol,
                AuthError::Network(_) => ErrorCategory::Network,
                AuthError::UnexpectedResponse(_)
                | AuthError::Io(_)
                | AuthError::Serialization(_) => ErrorCategory::Unexpected,
            },
            Self::Request(err) => match err.kind {
                RequestErrorKind::Unauthenticated => ErrorCategory::Unauthenticated,
                RequestErrorKind::Validation => ErrorCategory::Validation,
                RequestErrorKind::PermissionDenied => ErrorCategory::PermissionDenied,
                RequestErrorKind::Conflict => ErrorCategory::Conflict,
                RequestErrorKind::Network => ErrorCategory::Network,
                RequestErrorKind::Unexpected => ErrorCategory::Unexpected,
            },
            Self::Http(_) => ErrorCategory::Network,
            Self::Key(_) | Self::Tunnel(_) | Self::Io(_) => ErrorCategory::Unexpected,
        }
    }

    /// Whether retrying the same operation later could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self.category(), ErrorCategory::Network)
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Unauthenticated => RecoverySuggestion::LogIn,
            ErrorCategory::Expired | ErrorCategory::Denied => RecoverySuggestion::LogInAgain,
            ErrorCategory::Validation | ErrorCategory::Conflict => {
                RecoverySuggestion::ChooseAnotherHostname
            }
            ErrorCategory::Network => RecoverySuggestion::CheckConnection,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::Aborted => RecoverySuggestion::None,
            _ => RecoverySuggestion::ContactSupport,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, LoopholeError>;
