//! Identity key pair used to register and hold a tunnel.

use std::fs;
use std::path::Path;

use russh_keys::ssh_key::LineEnding;
use russh_keys::{Algorithm, HashAlg, PrivateKey};
use tracing::info;

use crate::error::LoopholeError;

/// Load the OpenSSH private key at `path`, generating an Ed25519 key there if
/// the file does not exist yet.
pub fn load_or_generate(path: &Path) -> Result<PrivateKey, LoopholeError> {
    if path.exists() {
        info!(path = %path.display(), "loading identity key");
        let key_data = fs::read_to_string(path)?;
        let key = PrivateKey::from_openssh(&key_data).map_err(|e| {
            LoopholeError::Key(format!("cannot parse identity file {}: {e}", path.display()))
        })?;
        info!(fingerprint = %key.public_key().fingerprint(HashAlg::Sha256), "identity key loaded");
        return Ok(key);
    }

    info!(path = %path.display(), "generating new Ed25519 identity key");
    let key = PrivateKey::random(&mut rand::thread_rng(), Algorithm::Ed25519)
        .map_err(|e| LoopholeError::Key(format!("cannot generate identity key: {e}")))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let key_data = key
        .to_openssh(LineEnding::LF)
        .map_err(|e| LoopholeError::Key(format!("cannot encode identity key: {e}")))?;
    fs::write(path, key_data.as_bytes())?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    info!(fingerprint = %key.public_key().fingerprint(HashAlg::Sha256), "identity key saved");
    Ok(key)
}

/// Public half as `"<algorithm> <base64>"`, the form the gateway expects.
pub fn public_key_string(key: &PrivateKey) -> Result<String, LoopholeError> {
    let encoded = key
        .public_key()
        .to_openssh()
        .map_err(|e| LoopholeError::Key(format!("cannot encode public key: {e}")))?;
    // Drop the trailing comment.
    Ok(encoded.split_whitespace().take(2).collect::<Vec<_>>().join(" "))
}
