//! loophole: expose local services to the public internet through the
//! loophole gateway.
//!
//! This crate covers the client side of authentication and tunnel
//! registration:
//!
//! - [`auth`]: OAuth device-code login, the local token store and token refresh
//! - [`api`]: gateway API client for site registration
//! - [`tunnel`]: expose configuration and the hand-off to a tunnel transport
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use loophole::auth::{AuthService, DeviceAuthClient, FileTokenStore, LoginOutcome};
//! use loophole::config::LoopholeConfig;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> loophole::error::Result<()> {
//! let config = LoopholeConfig::from_env()?;
//! let store = Arc::new(FileTokenStore::new_default());
//! let service = AuthService::new(DeviceAuthClient::new(&config, store)?);
//! let outcome = service
//!     .login(&CancellationToken::new(), |session| {
//!         println!("Visit {} and enter {}", session.display_uri(), session.user_code);
//!     })
//!     .await?;
//! if let LoginOutcome::LoggedIn { .. } = outcome {
//!     println!("logged in");
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod keys;
pub mod storage;
pub mod tunnel;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
