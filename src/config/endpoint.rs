use std::fmt;

use serde::{Deserialize, Serialize};

/// Network address of a remote service, optionally with a protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub protocol: String,
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(protocol: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            protocol: protocol.into(),
            host: host.into(),
            port,
        }
    }

    /// `protocol://host:port`, or `host:port` when no protocol is set.
    pub fn uri(&self) -> String {
        if self.protocol.is_empty() {
            self.hostname()
        } else {
            format!("{}://{}:{}", self.protocol, self.host, self.port)
        }
    }

    /// `host:port` without the protocol.
    pub fn hostname(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_includes_protocol_when_present() {
        let endpoint = Endpoint::new("https", "api.loophole.cloud", 443);
        assert_eq!(endpoint.uri(), "https://api.loophole.cloud:443");
        assert_eq!(endpoint.hostname(), "api.loophole.cloud:443");
    }

    #[test]
    fn uri_without_protocol_is_hostname() {
        let endpoint = Endpoint::new("", "gateway.loophole.host", 8022);
        assert_eq!(endpoint.uri(), "gateway.loophole.host:8022");
        assert_eq!(endpoint.to_string(), "gateway.loophole.host:8022");
    }
}
