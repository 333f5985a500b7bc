//! HTTP client construction.

use std::time::Duration;

use crate::config::LoopholeConfig;

/// Build a client with bounded connect and overall response timeouts.
pub fn build_client(
    connect_timeout: Duration,
    request_timeout: Duration,
) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(request_timeout)
        .build()
}

/// [`build_client`] with the timeouts from `config`.
pub fn client_for(config: &LoopholeConfig) -> Result<reqwest::Client, reqwest::Error> {
    build_client(config.connect_timeout, config.request_timeout)
}
