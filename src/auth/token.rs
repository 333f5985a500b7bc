use serde::{Deserialize, Serialize};

/// Credential record issued by the authorization server and kept by a token store.
///
/// The same shape decodes the token endpoint's success body, so the refresh
/// token is optional: issuers may omit it on refresh.
///
/// # Example
/// ```no_run
/// use loophole::auth::Credentials;
///
/// let credentials = Credentials {
///     access_token: "access".to_string(),
///     refresh_token: Some("refresh".to_string()),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
        }
    }
}
