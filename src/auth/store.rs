use std::fs;
use std::path::{Path, PathBuf};

use super::error::AuthError;
use super::token::Credentials;

const TOKENS_FILE_NAME: &str = "tokens.json";

/// Storage abstraction for the persisted credential record.
///
/// At most one record exists at a time; every write replaces it as a whole.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<Credentials>, AuthError>;
    fn save(&self, credentials: &Credentials) -> Result<(), AuthError>;
    fn clear(&self) -> Result<(), AuthError>;

    fn is_saved(&self) -> bool {
        matches!(self.load(), Ok(Some(_)))
    }

    fn access_token(&self) -> Result<String, AuthError> {
        self.load()?
            .map(|credentials| credentials.access_token)
            .ok_or(AuthError::NotLoggedIn)
    }

    fn refresh_token(&self) -> Result<String, AuthError> {
        self.load()?
            .ok_or(AuthError::NotLoggedIn)?
            .refresh_token
            .ok_or_else(|| {
                AuthError::Protocol("stored credentials have no refresh token".to_string())
            })
    }
}

/// Configuration for file-backed token storage.
#[derive(Debug, Clone)]
pub struct TokenStoreConfig {
    pub base_dir: PathBuf,
}

impl TokenStoreConfig {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn default_dir() -> PathBuf {
        crate::storage::default_dir()
    }
}

/// File-backed token store keeping the record in `tokens.json`.
///
/// # Example
/// ```no_run
/// use loophole::auth::{Credentials, FileTokenStore, TokenStore};
///
/// let store = FileTokenStore::new_default();
/// store.save(&Credentials::new("access", Some("refresh".to_string())))?;
/// # Ok::<(), loophole::auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    base_dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(config: TokenStoreConfig) -> Self {
        Self {
            base_dir: config.base_dir,
        }
    }

    pub fn new_default() -> Self {
        Self {
            base_dir: TokenStoreConfig::default_dir(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.base_dir.join(TOKENS_FILE_NAME)
    }

    fn ensure_parent(path: &Path) -> Result<(), AuthError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<Credentials>, AuthError> {
        let raw = match fs::read_to_string(self.path()) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AuthError::Io(err.to_string())),
        };
        let credentials: Credentials = serde_json::from_str(&raw)?;
        Ok(Some(credentials))
    }

    fn save(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let path = self.path();
        Self::ensure_parent(&path)?;
        let serialized = serde_json::to_vec(credentials)?;
        // Rename over the old file so readers never observe a partial record.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, serialized)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&staging, fs::Permissions::from_mode(0o600))?;
        }
        fs::rename(&staging, &path)?;
        tracing::debug!(path = %path.display(), "saved credentials");
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        match fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(AuthError::NotLoggedIn),
            Err(err) => Err(AuthError::Io(err.to_string())),
        }
    }

    fn is_saved(&self) -> bool {
        match fs::metadata(self.path()) {
            Ok(_) => true,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => false,
            Err(err) => {
                tracing::warn!(error = %err, "There was a problem reading tokens file");
                false
            }
        }
    }
}
