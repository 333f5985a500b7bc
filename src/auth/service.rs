use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::client::DeviceAuthClient;
use super::device_code::DeviceSession;
use super::error::AuthError;
use super::store::TokenStore;
use super::token::Credentials;

/// Result of [`AuthService::login`].
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// A credential record already exists; nothing was changed.
    AlreadyLoggedIn,
    /// The device flow completed and the record was saved.
    LoggedIn { credentials: Credentials },
}

/// Service facade for account commands.
///
/// All terminal I/O (printing the code, wiring Ctrl-C) belongs to the caller.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use loophole::auth::{AuthService, DeviceAuthClient, FileTokenStore};
/// use loophole::config::LoopholeConfig;
///
/// let store = Arc::new(FileTokenStore::new_default());
/// let client = DeviceAuthClient::new(&LoopholeConfig::default(), store)?;
/// let service = AuthService::new(client);
/// # Ok::<(), loophole::auth::AuthError>(())
/// ```
pub struct AuthService {
    client: DeviceAuthClient,
}

impl AuthService {
    pub fn new(client: DeviceAuthClient) -> Self {
        Self { client }
    }

    fn store(&self) -> &Arc<dyn TokenStore> {
        self.client.token_store()
    }

    /// Run the device login: register, show the session, poll, then persist.
    ///
    /// The record is only written once a token has been issued, so an aborted
    /// or failed login leaves storage untouched.
    pub async fn login<F>(
        &self,
        cancel: &CancellationToken,
        show: F,
    ) -> Result<LoginOutcome, AuthError>
    where
        F: FnOnce(&DeviceSession),
    {
        if self.store().is_saved() {
            return Ok(LoginOutcome::AlreadyLoggedIn);
        }
        let session = self.client.register_device().await?;
        show(&session);
        let credentials = self
            .client
            .poll_for_token(&session.device_code, session.interval(), cancel)
            .await?;
        self.store().save(&credentials)?;
        info!("logged in");
        Ok(LoginOutcome::LoggedIn { credentials })
    }

    /// Whether a credential record is present.
    pub fn status(&self) -> bool {
        self.store().is_saved()
    }

    /// Delete the credential record.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.store().clear()?;
        info!("logged out");
        Ok(())
    }
}
