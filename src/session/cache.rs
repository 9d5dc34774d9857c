//! Per-terminal cache of the master password.
//!
//! The password is sealed in the same envelope as the vault, under a key
//! derived from the terminal fingerprint and the vault salt.  Only a
//! process that computes the same fingerprint can open it; everything
//! else (missing file, other terminal, garbage) reads as "no session".

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::errors::Result;
use crate::vault::format::{self, SESSION_MAGIC};

/// Handle on the session cache file.
pub struct SessionCache {
    path: PathBuf,
    iterations: u32,
}

impl SessionCache {
    pub fn new(path: impl Into<PathBuf>, iterations: u32) -> Self {
        Self {
            path: path.into(),
            iterations,
        }
    }

    /// The cached master password for `fingerprint`, if any.
    pub fn load(&self, fingerprint: &str, salt: &[u8]) -> Option<Zeroizing<String>> {
        let plaintext =
            match format::read_sealed(&self.path, SESSION_MAGIC, fingerprint.as_bytes(), salt) {
                Ok(Some(bytes)) => bytes,
                Ok(None) => {
                    debug!("no session cache file");
                    return None;
                }
                Err(e) => {
                    debug!(error = %e, "session cache unusable for this terminal");
                    return None;
                }
            };

        match String::from_utf8(plaintext) {
            Ok(password) => Some(Zeroizing::new(password)),
            Err(e) => {
                // Wipe the bytes carried inside the error before discarding.
                drop(Zeroizing::new(e.into_bytes()));
                None
            }
        }
    }

    /// Seal `master_pass` for `fingerprint`, replacing any previous entry.
    pub fn store(&self, fingerprint: &str, salt: &[u8], master_pass: &str) -> Result<()> {
        format::write_sealed(
            &self.path,
            SESSION_MAGIC,
            fingerprint.as_bytes(),
            salt,
            self.iterations,
            master_pass.as_bytes(),
        )?;
        info!("master password cached for this terminal session");
        Ok(())
    }

    /// Delete the cache file.  Returns whether one existed.
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
