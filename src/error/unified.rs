//! Error classification shared by the CLI surface.

/// Broad error category for routing user-facing handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// No or unreadable local credentials, or the gateway rejected them.
    Unauthenticated,
    /// Malformed request or response at the identity provider.
    Protocol,
    /// The device login was denied by the user.
    Denied,
    /// The device code or refresh grant expired.
    Expired,
    /// Hostname rejected by the gateway's format rules.
    Validation,
    /// Hostname taken by someone else.
    Conflict,
    PermissionDenied,
    Network,
    Configuration,
    /// The user cancelled the operation.
    Aborted,
    /// Unmapped status or local failure.
    Unexpected,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Run `account login` (after `account logout` if a stale record exists).
    LogIn,
    /// Start a fresh device login.
    LogInAgain,
    ChooseAnotherHostname,
    CheckConnection,
    CheckConfiguration,
    None,
    ContactSupport,
}
