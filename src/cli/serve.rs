//! CLI handler for `loophole http`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::GatewayClient;
use crate::auth::{DeviceAuthClient, FileTokenStore, TokenStoreConfig};
use crate::cli::HttpArgs;
use crate::config::LoopholeConfig;
use crate::error::LoopholeError;
use crate::storage;
use crate::tunnel::{
    self, BasicAuth, ExposeHttpConfig, LocalEndpoint, RemoteEndpointSpecs, TunnelSession,
    TunnelTransport,
};

const DEFAULT_IDENTITY_FILE: &str = "id_ed25519";

/// Reports the registered site and keeps the session open until Ctrl-C.
pub struct ConsoleTransport;

#[async_trait]
impl TunnelTransport for ConsoleTransport {
    async fn establish(&self, session: TunnelSession) -> Result<(), LoopholeError> {
        println!("🌍 Forwarding {} -> {}", session.site_url, session.local.uri());
        if let Some(auth) = &session.basic_auth {
            println!("🔒 Protected with basic auth for user '{}'", auth.username);
        }
        println!("   Gateway: {}", session.gateway);
        println!("   Press Ctrl-C to stop");
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| LoopholeError::Tunnel(format!("cannot wait for Ctrl-C: {e}")))
    }
}

fn prompt_password() -> std::io::Result<String> {
    let term = console::Term::stderr();
    term.write_str("Enter basic auth password: ")?;
    term.read_secure_line()
}

/// Handle `loophole http <port> [host]`.
pub async fn handle_http(config: &LoopholeConfig, args: HttpArgs) -> Result<(), LoopholeError> {
    let basic_auth = BasicAuth::resolve(
        args.serve.basic_auth_username,
        args.serve.basic_auth_password,
        prompt_password,
    )?;
    let identity_file = match args.serve.identity_file {
        Some(path) => path,
        None => storage::local_file(&config.storage_dir, DEFAULT_IDENTITY_FILE, ".ssh")?,
    };
    let expose = ExposeHttpConfig {
        local: LocalEndpoint::http(args.host, args.port),
        remote: RemoteEndpointSpecs::new(identity_file)
            .with_site_id(args.serve.hostname)
            .with_basic_auth(basic_auth),
    };

    let store = Arc::new(FileTokenStore::new(TokenStoreConfig::new(
        config.storage_dir.clone(),
    )));
    let refresher = Arc::new(DeviceAuthClient::new(config, store.clone())?);
    let gateway = GatewayClient::new(config, store, refresher)?;

    tunnel::serve(config, &gateway, &ConsoleTransport, expose).await
}
