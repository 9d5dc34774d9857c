use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::{EsshError, Result};

/// Directory name under the home directory when nothing else is given.
const DEFAULT_DIR_NAME: &str = ".essh";

/// The per-user data directory and the fixed file names inside it.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Use `root` as the data directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the directory from an explicit path or `~/.essh`.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Ok(Self::new(path)),
            None => dirs::home_dir()
                .map(|home| Self::new(home.join(DEFAULT_DIR_NAME)))
                .ok_or(EsshError::HomeDirUnavailable),
        }
    }

    /// Create the directory if needed.
    ///
    /// Fails with `DataDirNotDirectory` if the path exists as a file.
    pub fn ensure(&self) -> Result<()> {
        if self.root.exists() && !self.root.is_dir() {
            return Err(EsshError::DataDirNotDirectory(self.root.clone()));
        }
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
            info!(path = %self.root.display(), "created data directory");

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&self.root, fs::Permissions::from_mode(0o700))?;
            }
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Encrypted profile list.
    pub fn vault_path(&self) -> PathBuf {
        self.root.join(".essh")
    }

    /// Key-derivation salt.
    pub fn salt_path(&self) -> PathBuf {
        self.root.join(".salt")
    }

    /// Cached master password for the current terminal session.
    pub fn session_path(&self) -> PathBuf {
        self.root.join(".esession")
    }
}
