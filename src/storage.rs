//! Local storage layout under the user's home directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const STORAGE_DIR_NAME: &str = ".loophole";

/// `~/.loophole`, or `./.loophole` when no home directory can be resolved.
pub fn default_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(STORAGE_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(STORAGE_DIR_NAME))
}

/// Get or create `base/sub` (or `base` itself when `sub` is empty).
pub fn local_dir(base: &Path, sub: &str) -> io::Result<PathBuf> {
    let dir = if sub.is_empty() {
        base.to_path_buf()
    } else {
        base.join(sub)
    };
    fs::create_dir_all(&dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o700))?;
    }
    Ok(dir)
}

/// Path of `name` inside `base/sub`, creating the directory but not the file.
pub fn local_file(base: &Path, name: &str, sub: &str) -> io::Result<PathBuf> {
    Ok(local_dir(base, sub)?.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn local_dir_creates_nested_directory() {
        let root = TempDir::new().unwrap();
        let dir = local_dir(root.path(), ".ssh").unwrap();
        assert!(dir.is_dir());
        assert_eq!(dir, root.path().join(".ssh"));
    }

    #[test]
    fn local_file_does_not_create_file() {
        let root = TempDir::new().unwrap();
        let file = local_file(root.path(), "tokens.json", "").unwrap();
        assert_eq!(file, root.path().join("tokens.json"));
        assert!(!file.exists());
    }
}
