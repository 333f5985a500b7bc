use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::auth::device_code::{
    AuthServerError, DeviceCodePoll, DeviceCodeResponse, DeviceSession, OAuthErrorCode,
};
use crate::auth::error::AuthError;
use crate::auth::store::TokenStore;
use crate::auth::token::Credentials;
use crate::config::LoopholeConfig;

const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";
const REFRESH_TOKEN_GRANT: &str = "refresh_token";

/// Exchanges the stored refresh token for a new access token.
///
/// Used as the single recovery step after the gateway rejects an access token.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh_token(&self) -> Result<Credentials, AuthError>;
}

/// OAuth device-authorization client for the loophole identity provider.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use loophole::auth::{DeviceAuthClient, FileTokenStore};
/// use loophole::config::LoopholeConfig;
///
/// let config = LoopholeConfig::default();
/// let client = DeviceAuthClient::new(&config, Arc::new(FileTokenStore::new_default()))?;
/// # Ok::<(), loophole::auth::AuthError>(())
/// ```
pub struct DeviceAuthClient {
    client: reqwest::Client,
    device_code_url: String,
    token_url: String,
    client_id: String,
    scope: String,
    audience: String,
    token_store: Arc<dyn TokenStore>,
}

impl DeviceAuthClient {
    pub fn new(
        config: &LoopholeConfig,
        token_store: Arc<dyn TokenStore>,
    ) -> Result<Self, AuthError> {
        let client = crate::util::http::client_for(config)?;
        Ok(Self {
            client,
            device_code_url: config.device_code_url.clone(),
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            scope: config.scope.clone(),
            audience: config.audience.clone(),
            token_store,
        })
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.token_store
    }

    /// Start a device-code session. No retry happens at this step.
    pub async fn register_device(&self) -> Result<DeviceSession, AuthError> {
        let resp = self
            .client
            .post(&self.device_code_url)
            .header(ACCEPT, "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("scope", self.scope.as_str()),
                ("audience", self.audience.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                AuthError::Protocol(format!(
                    "There was a problem executing request for device code: {e}"
                ))
            })?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            AuthError::Protocol(format!(
                "There was a problem reading device code response body: {e}"
            ))
        })?;
        if !status.is_success() {
            return Err(AuthError::Protocol(format!(
                "Device code request failed with status {status}: {body}"
            )));
        }
        let payload: DeviceCodeResponse = serde_json::from_str(&body).map_err(|e| {
            AuthError::Protocol(format!(
                "There was a problem decoding device code response body: {e}"
            ))
        })?;
        debug!(
            interval_secs = payload.interval,
            expires_in_secs = payload.expires_in,
            "registered device"
        );
        payload.try_into()
    }

    /// Poll the token endpoint once for `device_code`.
    ///
    /// Transport failures come back as [`DeviceCodePoll::Transient`]; only
    /// terminal outcomes are errors.
    pub async fn poll_device_code(&self, device_code: &str) -> Result<DeviceCodePoll, AuthError> {
        let resp = match self
            .client
            .post(&self.token_url)
            .header(ACCEPT, "application/json")
            .form(&[
                ("grant_type", DEVICE_CODE_GRANT),
                ("device_code", device_code),
                ("client_id", self.client_id.as_str()),
            ])
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                return Ok(DeviceCodePoll::Transient {
                    reason: format!("There was a problem executing request for token: {e}"),
                })
            }
        };
        let status = resp.status();
        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                return Ok(DeviceCodePoll::Transient {
                    reason: format!("There was a problem reading token response body: {e}"),
                })
            }
        };
        classify_device_poll(status, &body)
    }

    /// Poll until a token is issued, the session ends, or `cancel` fires.
    ///
    /// Sleeps `interval` before every request. Cancellation is observed at each
    /// iteration boundary and while sleeping, never mid-request. Nothing is
    /// persisted here; the caller owns saving the returned record.
    pub async fn poll_for_token(
        &self,
        device_code: &str,
        interval: Duration,
        cancel: &CancellationToken,
    ) -> Result<Credentials, AuthError> {
        debug!(interval_ms = interval.as_millis() as u64, "polling with interval");
        let mut attempt: u32 = 0;
        loop {
            if cancel.is_cancelled() {
                return Err(AuthError::Aborted);
            }
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(AuthError::Aborted),
                _ = tokio::time::sleep(interval) => {}
            }
            attempt += 1;
            match self.poll_device_code(device_code).await? {
                DeviceCodePoll::Authorized { credentials } => {
                    debug!(attempt, "device authorized");
                    return Ok(credentials);
                }
                DeviceCodePoll::Pending => debug!(attempt, "authorization pending"),
                DeviceCodePoll::SlowDown => {
                    debug!(attempt, "authorization server asked to slow down")
                }
                DeviceCodePoll::Transient { reason } => {
                    warn!(attempt, reason = %reason, "token poll failed, retrying")
                }
            }
        }
    }

    async fn request_refresh(&self, refresh_token: &str) -> Result<Credentials, AuthError> {
        let resp = self
            .client
            .post(&self.token_url)
            .header(ACCEPT, "application/json")
            .form(&[
                ("grant_type", REFRESH_TOKEN_GRANT),
                ("client_id", self.client_id.as_str()),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;

        if status.is_success() {
            let mut credentials: Credentials = serde_json::from_str(&body)?;
            // The issuer may omit the refresh token; keep the one that was used.
            credentials.refresh_token = Some(refresh_token.to_string());
            return Ok(credentials);
        }
        if status.is_client_error() {
            let error: AuthServerError = serde_json::from_str(&body)?;
            debug!(
                error = %error.error,
                error_description = %error.description,
                "refresh rejected"
            );
            return Err(match error.code() {
                OAuthErrorCode::ExpiredToken | OAuthErrorCode::InvalidGrant => AuthError::Expired,
                OAuthErrorCode::AccessDenied => AuthError::Denied,
                _ => AuthError::Rejected {
                    error: error.error,
                    description: error.description,
                },
            });
        }
        Err(AuthError::UnexpectedResponse(body))
    }
}

#[async_trait]
impl TokenRefresher for DeviceAuthClient {
    /// Refresh and persist the credential record. Never retries.
    async fn refresh_token(&self) -> Result<Credentials, AuthError> {
        let refresh_token = self.token_store.refresh_token()?;
        let credentials = self.request_refresh(&refresh_token).await?;
        self.token_store.save(&credentials)?;
        debug!("access token refreshed");
        Ok(credentials)
    }
}

/// Map one token-endpoint response onto a poll outcome.
fn classify_device_poll(status: StatusCode, body: &str) -> Result<DeviceCodePoll, AuthError> {
    if status.is_client_error() {
        let error: AuthServerError = match serde_json::from_str(body) {
            Ok(error) => error,
            Err(e) => {
                return Ok(DeviceCodePoll::Transient {
                    reason: format!("There was a problem decoding token error body: {e}"),
                })
            }
        };
        debug!(
            error = %error.error,
            error_description = %error.description,
            "error response"
        );
        return match error.code() {
            OAuthErrorCode::AuthorizationPending => Ok(DeviceCodePoll::Pending),
            OAuthErrorCode::SlowDown => Ok(DeviceCodePoll::SlowDown),
            OAuthErrorCode::ExpiredToken | OAuthErrorCode::InvalidGrant => Err(AuthError::Expired),
            OAuthErrorCode::AccessDenied => Err(AuthError::Denied),
            OAuthErrorCode::Other => Ok(DeviceCodePoll::Transient {
                reason: format!("{}: {}", error.error, error.description),
            }),
        };
    }
    if status.is_success() {
        return match serde_json::from_str::<Credentials>(body) {
            Ok(credentials) => Ok(DeviceCodePoll::Authorized { credentials }),
            Err(e) => Ok(DeviceCodePoll::Transient {
                reason: format!("There was a problem decoding token response body: {e}"),
            }),
        };
    }
    Err(AuthError::UnexpectedResponse(body.to_string()))
}
