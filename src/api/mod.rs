//! Gateway HTTP API: site registration.

pub mod client;
pub mod error;

pub use client::{GatewayClient, SiteRegistration};
pub use error::{RequestError, RequestErrorKind};
