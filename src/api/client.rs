use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::error::RequestError;
use crate::auth::{TokenRefresher, TokenStore};
use crate::config::LoopholeConfig;

/// Site registration request: the tunnel's public key plus an optional
/// custom hostname.
#[derive(Debug, Clone, Serialize)]
pub struct SiteRegistration {
    #[serde(rename = "key")]
    pub public_key: String,
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
}

impl SiteRegistration {
    /// Blank site ids are treated as absent.
    pub fn new(public_key: impl Into<String>, site_id: Option<String>) -> Self {
        Self {
            public_key: public_key.into(),
            site_id: site_id.filter(|id| !id.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuccessResponse {
    site_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct ErrorResponse {
    #[serde(default)]
    status_code: Option<u16>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    error: String,
}

/// Gateway HTTP API client.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use loophole::api::{GatewayClient, SiteRegistration};
/// use loophole::auth::{DeviceAuthClient, FileTokenStore};
/// use loophole::config::LoopholeConfig;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = LoopholeConfig::default();
/// let store = Arc::new(FileTokenStore::new_default());
/// let refresher = Arc::new(DeviceAuthClient::new(&config, store.clone())?);
/// let gateway = GatewayClient::new(&config, store, refresher)?;
/// let site_id = gateway
///     .register_site(&SiteRegistration::new("ssh-ed25519 AAAA...", None))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct GatewayClient {
    client: reqwest::Client,
    api_url: String,
    user_agent: String,
    token_store: Arc<dyn TokenStore>,
    refresher: Arc<dyn TokenRefresher>,
}

impl GatewayClient {
    pub fn new(
        config: &LoopholeConfig,
        token_store: Arc<dyn TokenStore>,
        refresher: Arc<dyn TokenRefresher>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: crate::util::http::client_for(config)?,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent(),
            token_store,
            refresher,
        })
    }

    /// Register the public key with the gateway and return the assigned site id.
    ///
    /// A 401 triggers one token refresh followed by exactly one more attempt;
    /// a second 401 or a failed refresh is terminal. The retry budget belongs
    /// to this call only.
    pub async fn register_site(
        &self,
        registration: &SiteRegistration,
    ) -> Result<String, RequestError> {
        let mut refreshed = false;
        loop {
            let access_token = self.access_token()?;
            let resp = self
                .client
                .post(format!("{}/api/register-site", self.api_url))
                .header(CONTENT_TYPE, "application/json")
                .header(USER_AGENT, &self.user_agent)
                .header(AUTHORIZATION, format!("Bearer {access_token}"))
                .json(registration)
                .send()
                .await
                .map_err(RequestError::network)?;

            let status = resp.status();
            if status == StatusCode::OK || status == StatusCode::CREATED {
                let result: SuccessResponse = resp.json().await.map_err(RequestError::network)?;
                debug!(site_id = %result.site_id, "site registered");
                return Ok(result.site_id);
            }

            let gateway_message = error_message(resp).await;
            if status == StatusCode::UNAUTHORIZED && !refreshed {
                debug!("gateway rejected access token, refreshing");
                if let Err(e) = self.refresher.refresh_token().await {
                    warn!(error = %e, "token refresh failed");
                    return Err(RequestError::refresh_failed(&e, &gateway_message));
                }
                refreshed = true;
                continue;
            }
            return Err(RequestError::from_status(status.as_u16(), gateway_message));
        }
    }

    fn access_token(&self) -> Result<String, RequestError> {
        if !self.token_store.is_saved() {
            return Err(RequestError::not_logged_in());
        }
        self.token_store
            .access_token()
            .map_err(|e| RequestError::unreadable_token(&e))
    }
}

/// Gateway error message from a failed response, falling back to the raw body.
async fn error_message(resp: reqwest::Response) -> String {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(parsed) if !parsed.message.is_empty() => parsed.message,
        Ok(parsed) if !parsed.error.is_empty() => parsed.error,
        _ if !body.trim().is_empty() => body,
        _ => status.to_string(),
    }
}
