use thiserror::Error;

/// Failures on the identity-provider side: device login, refresh and local credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("Login operation aborted")]
    Aborted,
    #[error("The device token expired, please reinitialize the login")]
    Expired,
    #[error("The device token got denied, please reinitialize the login")]
    Denied,
    #[error("Authorization server rejected the request: {error} ({description})")]
    Rejected { error: String, description: String },
    #[error("Unexpected response from authorization server: {0}")]
    UnexpectedResponse(String),
    #[error("Protocol error: {0}")]
    Protocol(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}
