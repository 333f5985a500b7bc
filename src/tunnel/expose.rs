use std::fmt;
use std::path::PathBuf;

use uuid::Uuid;

use crate::error::LoopholeError;

/// Local service being exposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalEndpoint {
    pub host: String,
    pub port: u16,
    pub https: bool,
}

impl LocalEndpoint {
    pub fn http(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            https: false,
        }
    }

    pub fn uri(&self) -> String {
        let scheme = if self.https { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }
}

/// Basic-auth credentials protecting the public site.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"..")
            .finish()
    }
}

impl BasicAuth {
    /// Combine the username/password flags.
    ///
    /// A username without a password asks `prompt` for one; a password
    /// without a username is a configuration error.
    pub fn resolve<P>(
        username: Option<String>,
        password: Option<String>,
        prompt: P,
    ) -> Result<Option<Self>, LoopholeError>
    where
        P: FnOnce() -> std::io::Result<String>,
    {
        let username = username.filter(|v| !v.is_empty());
        let password = password.filter(|v| !v.is_empty());
        match (username, password) {
            (None, None) => Ok(None),
            (Some(username), Some(password)) => Ok(Some(Self { username, password })),
            (Some(username), None) => {
                let password = prompt()?;
                Ok(Some(Self { username, password }))
            }
            (None, Some(_)) => Err(LoopholeError::Configuration(
                "When using basic auth, both basic-auth-username and basic-auth-password \
                 have to be provided"
                    .to_string(),
            )),
        }
    }
}

/// Public side of an expose request.
#[derive(Debug, Clone)]
pub struct RemoteEndpointSpecs {
    pub identity_file: PathBuf,
    pub site_id: Option<String>,
    pub basic_auth: Option<BasicAuth>,
    /// Fresh per expose invocation.
    pub tunnel_id: Uuid,
}

impl RemoteEndpointSpecs {
    pub fn new(identity_file: PathBuf) -> Self {
        Self {
            identity_file,
            site_id: None,
            basic_auth: None,
            tunnel_id: Uuid::new_v4(),
        }
    }

    pub fn with_site_id(mut self, site_id: Option<String>) -> Self {
        self.site_id = site_id;
        self
    }

    pub fn with_basic_auth(mut self, basic_auth: Option<BasicAuth>) -> Self {
        self.basic_auth = basic_auth;
        self
    }
}

/// Expose request for a local HTTP service.
#[derive(Debug, Clone)]
pub struct ExposeHttpConfig {
    pub local: LocalEndpoint,
    pub remote: RemoteEndpointSpecs,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_prompt() -> std::io::Result<String> {
        panic!("prompt must not be called")
    }

    #[test]
    fn no_flags_means_no_basic_auth() {
        assert_eq!(BasicAuth::resolve(None, None, no_prompt).unwrap(), None);
    }

    #[test]
    fn both_flags_are_used_as_given() {
        let auth = BasicAuth::resolve(Some("admin".into()), Some("hunter2".into()), no_prompt)
            .unwrap()
            .unwrap();
        assert_eq!(auth.username, "admin");
        assert_eq!(auth.password, "hunter2");
    }

    #[test]
    fn username_alone_prompts_for_password() {
        let auth = BasicAuth::resolve(Some("admin".into()), None, || Ok("typed".to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(auth.password, "typed");
    }

    #[test]
    fn password_alone_is_configuration_error() {
        let err = BasicAuth::resolve(None, Some("hunter2".into()), no_prompt).unwrap_err();
        assert!(matches!(err, LoopholeError::Configuration(_)));
    }

    #[test]
    fn debug_output_hides_password() {
        let auth = BasicAuth {
            username: "admin".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{auth:?}").contains("hunter2"));
    }

    #[test]
    fn each_remote_spec_gets_its_own_tunnel_id() {
        let a = RemoteEndpointSpecs::new(PathBuf::from("id"));
        let b = RemoteEndpointSpecs::new(PathBuf::from("id"));
        assert_ne!(a.tunnel_id, b.tunnel_id);
    }

    #[test]
    fn local_uri_uses_scheme() {
        assert_eq!(
            LocalEndpoint::http("127.0.0.1", 8080).uri(),
            "http://127.0.0.1:8080"
        );
    }
}
