#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use loophole::auth::{AuthError, Credentials, TokenRefresher, TokenStore};
use loophole::config::LoopholeConfig;
use wiremock::MockServer;

#[derive(Default)]
pub struct InMemoryTokenStore {
    credentials: Mutex<Option<Credentials>>,
    saves: AtomicUsize,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(access_token: &str, refresh_token: Option<&str>) -> Self {
        let store = Self::new();
        *store.credentials.lock().expect("store lock poisoned") = Some(Credentials::new(
            access_token,
            refresh_token.map(str::to_string),
        ));
        store
    }

    pub fn get(&self) -> Option<Credentials> {
        self.credentials.lock().expect("store lock poisoned").clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl TokenStore for InMemoryTokenStore {
    fn load(&self) -> Result<Option<Credentials>, AuthError> {
        Ok(self.get())
    }

    fn save(&self, credentials: &Credentials) -> Result<(), AuthError> {
        *self.credentials.lock().expect("store lock poisoned") = Some(credentials.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        self.credentials
            .lock()
            .expect("store lock poisoned")
            .take()
            .map(|_| ())
            .ok_or(AuthError::NotLoggedIn)
    }
}

/// Refresher that counts calls and either succeeds with `at1` or fails.
pub struct CountingRefresher {
    store: Arc<InMemoryTokenStore>,
    fail: bool,
    calls: AtomicUsize,
}

impl CountingRefresher {
    pub fn succeeding(store: Arc<InMemoryTokenStore>) -> Self {
        Self {
            store,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(store: Arc<InMemoryTokenStore>) -> Self {
        Self {
            store,
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenRefresher for CountingRefresher {
    async fn refresh_token(&self) -> Result<Credentials, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AuthError::Expired);
        }
        let credentials = Credentials::new("at1", Some("rt0".to_string()));
        self.store.save(&credentials)?;
        Ok(credentials)
    }
}

/// Config with every remote endpoint pointed at `server`.
pub fn config_for(server: &MockServer) -> LoopholeConfig {
    LoopholeConfig::default()
        .with_device_code_url(format!("{}/oauth/device/code", server.uri()))
        .with_token_url(format!("{}/oauth/token", server.uri()))
        .with_api_url(server.uri())
        .with_version("0.0.0-test")
}

pub fn oauth_error(code: &str) -> serde_json::Value {
    serde_json::json!({ "error": code, "error_description": format!("{code} description") })
}
