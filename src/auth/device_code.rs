use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use strum::{AsRefStr, Display, EnumString};

use super::error::AuthError;
use super::token::Credentials;

/// Poll interval when the server does not send one.
const DEFAULT_INTERVAL_SECS: u64 = 5;
/// Lower bound on the poll interval.
const MIN_INTERVAL_SECS: u64 = 1;

/// Device-code session returned by the authorization server.
///
/// Lives for a single login attempt and is never persisted.
///
/// # Example
/// ```no_run
/// use loophole::auth::DeviceSession;
/// use chrono::Utc;
///
/// let session = DeviceSession {
///     device_code: "device-code".to_string(),
///     user_code: "ABCD-1234".to_string(),
///     verification_uri: "https://loophole.eu.auth0.com/activate".to_string(),
///     verification_uri_complete: None,
///     interval_secs: 5,
///     expires_in_secs: 900,
///     expires_at: Utc::now(),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct DeviceSession {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub verification_uri_complete: Option<String>,
    pub interval_secs: u64,
    pub expires_in_secs: u64,
    pub expires_at: DateTime<Utc>,
}

impl DeviceSession {
    /// URL to show the user; prefers the one with the user code already filled in.
    pub fn display_uri(&self) -> &str {
        self.verification_uri_complete
            .as_deref()
            .unwrap_or(&self.verification_uri)
    }

    /// Poll interval, never shorter than one second.
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.interval_secs.max(MIN_INTERVAL_SECS))
    }
}

/// Wire shape of the device-code endpoint response.
#[derive(Debug, Deserialize)]
pub(crate) struct DeviceCodeResponse {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    #[serde(default)]
    pub verification_uri_complete: Option<String>,
    #[serde(default = "default_interval")]
    pub interval: u64,
    pub expires_in: u64,
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_SECS
}

impl TryFrom<DeviceCodeResponse> for DeviceSession {
    type Error = AuthError;

    fn try_from(payload: DeviceCodeResponse) -> Result<Self, Self::Error> {
        let expires_at = i64::try_from(payload.expires_in)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                AuthError::Protocol(format!(
                    "invalid expires_in in device code response: {}",
                    payload.expires_in
                ))
            })?;
        Ok(Self {
            device_code: payload.device_code,
            user_code: payload.user_code,
            verification_uri: payload.verification_uri,
            verification_uri_complete: payload.verification_uri_complete,
            interval_secs: payload.interval,
            expires_in_secs: payload.expires_in,
            expires_at,
        })
    }
}

/// OAuth error codes the client distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum OAuthErrorCode {
    AuthorizationPending,
    SlowDown,
    ExpiredToken,
    InvalidGrant,
    AccessDenied,
    Other,
}

/// Error body returned by the authorization server (`{error, error_description}`).
#[derive(Debug, Clone, Deserialize)]
pub struct AuthServerError {
    pub error: String,
    #[serde(default, rename = "error_description")]
    pub description: String,
}

impl AuthServerError {
    pub fn code(&self) -> OAuthErrorCode {
        self.error.parse().unwrap_or(OAuthErrorCode::Other)
    }
}

/// Outcome of one non-terminal poll of the token endpoint.
///
/// Terminal outcomes (expired, denied, unexpected status) are returned as errors.
#[derive(Debug, Clone)]
pub enum DeviceCodePoll {
    /// The user has not approved yet.
    Pending,
    /// The server asked for a longer interval; polling continues at the configured one.
    SlowDown,
    /// A token was issued.
    Authorized { credentials: Credentials },
    /// Network trouble, an undecodable body or an unrecognised error code.
    Transient { reason: String },
}
