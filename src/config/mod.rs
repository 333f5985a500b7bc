//! Configuration system (layered: code > env > defaults).

pub mod endpoint;

pub use endpoint::Endpoint;

use std::path::PathBuf;
use std::time::Duration;

use crate::error::LoopholeError;

const DEFAULT_DEVICE_CODE_URL: &str = "https://loophole.eu.auth0.com/oauth/device/code";
const DEFAULT_TOKEN_URL: &str = "https://loophole.eu.auth0.com/oauth/token";
const DEFAULT_CLIENT_ID: &str = "9ocnSAnfJSb6C52waL8xcPidCkRhUwBs";
const DEFAULT_SCOPE: &str = "openid offline_access";
const DEFAULT_AUDIENCE: &str = "https://api.loophole.cloud";
const DEFAULT_API_URL: &str = "https://api.loophole.cloud";
const DEFAULT_GATEWAY_HOST: &str = "gateway.loophole.host";
const DEFAULT_GATEWAY_PORT: u16 = 8022;
const DEFAULT_SITE_HOST: &str = "loophole.site";
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

mod env {
    pub const DEVICE_CODE_URL: &str = "LOOPHOLE_DEVICE_CODE_URL";
    pub const TOKEN_URL: &str = "LOOPHOLE_TOKEN_URL";
    pub const CLIENT_ID: &str = "LOOPHOLE_CLIENT_ID";
    pub const AUDIENCE: &str = "LOOPHOLE_AUDIENCE";
    pub const API_URL: &str = "LOOPHOLE_API_URL";
    pub const GATEWAY_HOST: &str = "LOOPHOLE_GATEWAY_HOST";
    pub const GATEWAY_PORT: &str = "LOOPHOLE_GATEWAY_PORT";
    pub const SITE_HOST: &str = "LOOPHOLE_SITE_HOST";
    pub const CONNECT_TIMEOUT_SECS: &str = "LOOPHOLE_CONNECT_TIMEOUT_SECS";
    pub const REQUEST_TIMEOUT_SECS: &str = "LOOPHOLE_REQUEST_TIMEOUT_SECS";
    pub const STORAGE_DIR: &str = "LOOPHOLE_STORAGE_DIR";
}

/// Client configuration: identity provider, gateway and local storage settings.
///
/// # Example
/// ```no_run
/// use loophole::config::LoopholeConfig;
///
/// let config = LoopholeConfig::from_env()?
///     .with_api_url("http://localhost:3000");
/// assert_eq!(config.api_url, "http://localhost:3000");
/// # Ok::<(), loophole::error::LoopholeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct LoopholeConfig {
    pub device_code_url: String,
    pub token_url: String,
    pub client_id: String,
    pub scope: String,
    pub audience: String,
    /// Base URL of the gateway HTTP API.
    pub api_url: String,
    /// SSH endpoint the tunnel transport connects to.
    pub gateway: Endpoint,
    /// Domain public site URLs are built on.
    pub site_host: String,
    pub version: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub storage_dir: PathBuf,
}

impl Default for LoopholeConfig {
    fn default() -> Self {
        Self {
            device_code_url: DEFAULT_DEVICE_CODE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            gateway: Endpoint::new("", DEFAULT_GATEWAY_HOST, DEFAULT_GATEWAY_PORT),
            site_host: DEFAULT_SITE_HOST.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            storage_dir: crate::storage::default_dir(),
        }
    }
}

impl LoopholeConfig {
    /// Load from environment variables (`LOOPHOLE_*`), reading `.env` first if present.
    pub fn from_env() -> Result<Self, LoopholeError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from defaults overridden by whatever `lookup` returns per variable name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LoopholeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let string_overrides: [(&str, &mut String); 7] = [
            (env::DEVICE_CODE_URL, &mut config.device_code_url),
            (env::TOKEN_URL, &mut config.token_url),
            (env::CLIENT_ID, &mut config.client_id),
            (env::AUDIENCE, &mut config.audience),
            (env::API_URL, &mut config.api_url),
            (env::GATEWAY_HOST, &mut config.gateway.host),
            (env::SITE_HOST, &mut config.site_host),
        ];
        for (key, slot) in string_overrides {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *slot = value.trim().to_string();
            }
        }

        if let Some(port) = lookup(env::GATEWAY_PORT) {
            config.gateway.port = parse_number(env::GATEWAY_PORT, &port)?;
        }
        if let Some(secs) = lookup(env::CONNECT_TIMEOUT_SECS) {
            config.connect_timeout =
                Duration::from_secs(parse_number(env::CONNECT_TIMEOUT_SECS, &secs)?);
        }
        if let Some(secs) = lookup(env::REQUEST_TIMEOUT_SECS) {
            config.request_timeout =
                Duration::from_secs(parse_number(env::REQUEST_TIMEOUT_SECS, &secs)?);
        }
        if let Some(dir) = lookup(env::STORAGE_DIR).filter(|v| !v.trim().is_empty()) {
            config.storage_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    pub fn with_device_code_url(mut self, url: impl Into<String>) -> Self {
        self.device_code_url = url.into();
        self
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// `User-Agent` sent to the gateway: `loophole/<version> (<os>/<arch>) <site host>`.
    pub fn user_agent(&self) -> String {
        format!(
            "loophole/{} ({}/{}) {}",
            self.version,
            std::env::consts::OS,
            std::env::consts::ARCH,
            self.site_host
        )
    }

    /// Public URL of a registered site.
    pub fn site_url(&self, site_id: &str) -> String {
        format!("https://{}.{}", site_id, self.site_host)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, LoopholeError> {
    raw.trim()
        .parse()
        .map_err(|_| LoopholeError::Configuration(format!("{key} must be a number, got '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_hosted_service() {
        let config = LoopholeConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(config.scope, "openid offline_access");
        assert_eq!(config.audience, "https://api.loophole.cloud");
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.gateway.hostname(), "gateway.loophole.host:8022");
    }

    #[test]
    fn env_values_override_defaults() {
        let config = LoopholeConfig::from_lookup(lookup_from(&[
            (env::API_URL, "http://localhost:3000"),
            (env::GATEWAY_PORT, "2222"),
            (env::REQUEST_TIMEOUT_SECS, "10"),
            (env::STORAGE_DIR, "/tmp/loophole-test"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "http://localhost:3000");
        assert_eq!(config.gateway.port, 2222);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/loophole-test"));
    }

    #[test]
    fn blank_values_are_ignored() {
        let config =
            LoopholeConfig::from_lookup(lookup_from(&[(env::CLIENT_ID, "  ")])).unwrap();
        assert_eq!(config.client_id, DEFAULT_CLIENT_ID);
    }

    #[test]
    fn invalid_number_is_configuration_error() {
        let err = LoopholeConfig::from_lookup(lookup_from(&[(env::GATEWAY_PORT, "ssh")]))
            .unwrap_err();
        assert!(matches!(err, LoopholeError::Configuration(_)));
        assert!(err.to_string().contains("LOOPHOLE_GATEWAY_PORT"));
    }

    #[test]
    fn user_agent_names_version_platform_and_host() {
        let config = LoopholeConfig::default().with_version("1.2.3");
        let ua = config.user_agent();
        assert!(ua.starts_with("loophole/1.2.3 ("));
        assert!(ua.contains(std::env::consts::OS));
        assert!(ua.ends_with(") loophole.site"));
    }

    #[test]
    fn site_url_uses_site_host() {
        let config = LoopholeConfig::default();
        assert_eq!(config.site_url("abc123"), "https://abc123.loophole.site");
    }
}
