use thiserror::Error;

use crate::auth::AuthError;

const HOSTNAME_RULES: &str = "The given hostname didn't match the requirements:
- Starts with a letter
- Contains only small letters and numbers";

const HOSTNAME_RULES_WITH_LENGTH: &str = "The given hostname didn't match the requirements:
- Starts with a letter
- Contains only small letters and numbers
- Minimum 6 characters (not applicable for premium users)";

/// What went wrong with a gateway request, independent of wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestErrorKind {
    /// No usable local credentials, or the gateway kept rejecting them.
    Unauthenticated,
    /// Hostname rejected by the gateway's format rules.
    Validation,
    PermissionDenied,
    /// Hostname already claimed by another account.
    Conflict,
    /// Transport or decode failure; no meaningful status.
    Network,
    /// Any other non-success status.
    Unexpected,
}

/// Failure surfaced by the gateway client: a user-facing message, a
/// developer-facing details string and the originating HTTP status.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RequestError {
    pub kind: RequestErrorKind,
    pub message: String,
    pub details: String,
    pub status_code: Option<u16>,
}

impl RequestError {
    pub fn new(
        kind: RequestErrorKind,
        message: impl Into<String>,
        details: impl Into<String>,
        status_code: Option<u16>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            details: details.into(),
            status_code,
        }
    }

    pub(crate) fn not_logged_in() -> Self {
        Self::new(
            RequestErrorKind::Unauthenticated,
            "You're not logged in, please use 'loophole account login'",
            "Cannot read locally stored token",
            Some(401),
        )
    }

    pub(crate) fn unreadable_token(error: &AuthError) -> Self {
        Self::new(
            RequestErrorKind::Unauthenticated,
            "There was a problem reading token",
            error.to_string(),
            Some(401),
        )
    }

    pub(crate) fn refresh_failed(error: &AuthError, gateway_message: &str) -> Self {
        Self::new(
            RequestErrorKind::Unauthenticated,
            "Authentication failed, then refreshing token failed",
            format!("{gateway_message} ({error})"),
            Some(401),
        )
    }

    pub(crate) fn network(error: impl std::fmt::Display) -> Self {
        Self::new(
            RequestErrorKind::Network,
            "There was a problem reaching the gateway",
            error.to_string(),
            None,
        )
    }

    /// Map a non-success gateway status (other than a recoverable 401) onto a domain error.
    pub(crate) fn from_status(status: u16, gateway_message: String) -> Self {
        match status {
            400 => Self::new(
                RequestErrorKind::Validation,
                gateway_message,
                HOSTNAME_RULES,
                Some(status),
            ),
            401 => Self::new(
                RequestErrorKind::Unauthenticated,
                "Authentication failed, try logging out and logging in again",
                gateway_message,
                Some(status),
            ),
            403 => Self::new(
                RequestErrorKind::PermissionDenied,
                "You don't have required permissions to establish tunnel with given parameters",
                gateway_message,
                Some(status),
            ),
            409 => Self::new(
                RequestErrorKind::Conflict,
                "Hostname already taken by different user",
                gateway_message,
                Some(status),
            ),
            422 => Self::new(
                RequestErrorKind::Validation,
                gateway_message,
                HOSTNAME_RULES_WITH_LENGTH,
                Some(status),
            ),
            _ => Self::new(
                RequestErrorKind::Unexpected,
                gateway_message,
                "Something unexpected happened, please let developers know",
                Some(status),
            ),
        }
    }
}
