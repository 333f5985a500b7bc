//! OAuth device-code login, token refresh and credential storage.

pub mod client;
pub mod device_code;
pub mod error;
pub mod service;
pub mod store;
pub mod token;

pub use client::{DeviceAuthClient, TokenRefresher};
pub use device_code::{AuthServerError, DeviceCodePoll, DeviceSession, OAuthErrorCode};
pub use error::AuthError;
pub use service::{AuthService, LoginOutcome};
pub use store::{FileTokenStore, TokenStore, TokenStoreConfig};
pub use token::Credentials;
