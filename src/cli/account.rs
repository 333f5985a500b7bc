//! CLI handlers for `account login`, `account logout` and `account status`.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::auth::{
    AuthError, AuthService, DeviceAuthClient, DeviceSession, FileTokenStore, LoginOutcome,
    TokenStoreConfig,
};
use crate::config::LoopholeConfig;
use crate::error::LoopholeError;

fn auth_service(config: &LoopholeConfig) -> Result<AuthService, LoopholeError> {
    let store = Arc::new(FileTokenStore::new(TokenStoreConfig::new(
        config.storage_dir.clone(),
    )));
    Ok(AuthService::new(DeviceAuthClient::new(config, store)?))
}

fn show_session(session: &DeviceSession) {
    println!("🔗 Visit: {}", session.display_uri());
    println!("📋 Enter code: {}", session.user_code);
    println!("⏳ Waiting for authorization (Ctrl-C to abort)...");
}

/// Handle `loophole account login`.
pub async fn handle_login(config: &LoopholeConfig) -> Result<(), LoopholeError> {
    let service = auth_service(config)?;

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };
    let outcome = service.login(&cancel, show_session).await;
    ctrl_c.abort();

    match outcome? {
        LoginOutcome::AlreadyLoggedIn => {
            println!("✅ Already logged in. Use 'loophole account logout' to switch accounts.");
        }
        LoginOutcome::LoggedIn { .. } => println!("✅ Logged in successfully"),
    }
    Ok(())
}

/// Handle `loophole account logout`.
pub fn handle_logout(config: &LoopholeConfig) -> Result<(), LoopholeError> {
    match auth_service(config)?.logout() {
        Ok(()) => println!("✅ Logged out"),
        Err(AuthError::NotLoggedIn) => println!("❌ Not logged in"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Handle `loophole account status`.
pub fn handle_status(config: &LoopholeConfig) -> Result<(), LoopholeError> {
    if auth_service(config)?.status() {
        println!("✅ Logged in");
    } else {
        println!("❌ Not logged in");
    }
    Ok(())
}
