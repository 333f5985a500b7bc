//! Exposing a local service: expose configuration, site registration and the
//! hand-off to the tunnel transport.

pub mod expose;

pub use expose::{BasicAuth, ExposeHttpConfig, LocalEndpoint, RemoteEndpointSpecs};

use std::sync::Arc;

use async_trait::async_trait;
use russh_keys::PrivateKey;
use tracing::info;
use uuid::Uuid;

use crate::api::{GatewayClient, SiteRegistration};
use crate::config::{Endpoint, LoopholeConfig};
use crate::error::LoopholeError;
use crate::keys;

/// Everything a transport needs to hold a tunnel for a registered site.
#[derive(Clone)]
pub struct TunnelSession {
    pub tunnel_id: Uuid,
    pub site_id: String,
    pub site_url: String,
    pub gateway: Endpoint,
    pub local: LocalEndpoint,
    pub basic_auth: Option<BasicAuth>,
    pub key: Arc<PrivateKey>,
}

/// Data plane that connects to the gateway and forwards traffic for a site.
#[async_trait]
pub trait TunnelTransport: Send + Sync {
    /// Establish the tunnel and hold it until it ends.
    async fn establish(&self, session: TunnelSession) -> Result<(), LoopholeError>;
}

/// Register a site for `expose` and hand the session to `transport`.
///
/// The identity key is loaded from (or generated at) the configured identity
/// file. Registration failures are returned before the transport is touched.
pub async fn serve(
    config: &LoopholeConfig,
    gateway: &GatewayClient,
    transport: &dyn TunnelTransport,
    expose: ExposeHttpConfig,
) -> Result<(), LoopholeError> {
    let key = keys::load_or_generate(&expose.remote.identity_file)?;
    let registration = SiteRegistration::new(
        keys::public_key_string(&key)?,
        expose.remote.site_id.clone(),
    );
    let site_id = gateway.register_site(&registration).await?;
    let session = TunnelSession {
        tunnel_id: expose.remote.tunnel_id,
        site_url: config.site_url(&site_id),
        site_id,
        gateway: config.gateway.clone(),
        local: expose.local,
        basic_auth: expose.remote.basic_auth,
        key: Arc::new(key),
    };
    info!(
        tunnel_id = %session.tunnel_id,
        site_id = %session.site_id,
        local = %session.local.uri(),
        "site registered, establishing tunnel"
    );
    transport.establish(session).await
}
