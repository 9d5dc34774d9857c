//! High-level vault operations used by the command router.
//!
//! `VaultStore` owns the encrypted profile file and the salt file.  It
//! converts every "this passphrase does not open the vault" condition
//! into `Ok(None)` so callers can branch on a sentinel instead of
//! matching crypto errors.

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::config::DataDir;
use crate::errors::{EsshError, Result};

use super::format::{self, VAULT_MAGIC};
use super::profile::ServerProfile;

/// Number of random bytes behind the salt text.
const SALT_BYTES: usize = 64;

/// The vault handle.  Holds paths and the salt, never the master password.
pub struct VaultStore {
    /// Path to the encrypted profile file.
    vault_path: PathBuf,

    /// Raw salt file contents, fed to key derivation as-is.
    salt: Vec<u8>,

    /// PBKDF2 rounds for newly written files.
    iterations: u32,
}

impl VaultStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Open the store inside `data_dir`, creating the salt on first use.
    pub fn open(data_dir: &DataDir, iterations: u32) -> Result<Self> {
        Self::with_paths(data_dir.vault_path(), &data_dir.salt_path(), iterations)
    }

    /// Open a store with explicit file locations.
    pub fn with_paths(vault_path: PathBuf, salt_path: &Path, iterations: u32) -> Result<Self> {
        let salt = load_or_create_salt(salt_path, &vault_path)?;
        Ok(Self {
            vault_path,
            salt,
            iterations,
        })
    }

    // ------------------------------------------------------------------
    // Profiles
    // ------------------------------------------------------------------

    /// Decrypt the vault with `master_pass`.
    ///
    /// - `Ok(Some(list))` on success,
    /// - `Ok(Some(vec![]))` when no vault file exists yet,
    /// - `Ok(None)` when the passphrase is wrong or the file is corrupt,
    /// - `Err` only for I/O failures other than "not found".
    pub fn load_profiles(&self, master_pass: &str) -> Result<Option<Vec<ServerProfile>>> {
        let plaintext = match format::read_sealed(
            &self.vault_path,
            VAULT_MAGIC,
            master_pass.as_bytes(),
            &self.salt,
        ) {
            Ok(Some(bytes)) => Zeroizing::new(bytes),
            Ok(None) => {
                debug!(path = %self.vault_path.display(), "no vault file yet, starting empty");
                return Ok(Some(Vec::new()));
            }
            Err(EsshError::DecryptionFailed) => {
                debug!("vault did not authenticate under the given passphrase");
                return Ok(None);
            }
            Err(EsshError::InvalidVaultFormat(reason)) => {
                warn!(%reason, "vault file is malformed");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        match serde_json::from_slice::<Vec<ServerProfile>>(&plaintext) {
            Ok(profiles) => Ok(Some(profiles)),
            Err(e) => {
                warn!(error = %e, "vault decrypted but its contents are not a profile list");
                Ok(None)
            }
        }
    }

    /// Encrypt `profiles` under `master_pass` and overwrite the vault file.
    pub fn save_profiles(&self, master_pass: &str, profiles: &[ServerProfile]) -> Result<()> {
        let json = Zeroizing::new(
            serde_json::to_vec(profiles)
                .map_err(|e| EsshError::SerializationError(format!("profiles: {e}")))?,
        );

        format::write_sealed(
            &self.vault_path,
            VAULT_MAGIC,
            master_pass.as_bytes(),
            &self.salt,
            self.iterations,
            &json,
        )?;

        info!(count = profiles.len(), "vault saved");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Salt bytes shared with the session cache.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.vault_path
    }

    /// Returns `true` once a vault file has been written.
    pub fn exists(&self) -> bool {
        self.vault_path.exists()
    }

    /// PBKDF2 rounds used for new writes.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

// ----------------------------------------------------------------------
// Lookup
// ----------------------------------------------------------------------

/// Find the single profile matching `query`.
///
/// An IPv4/IPv6 literal is matched against `address`, anything else
/// against `name`.  Zero or several matches both return `None`.
pub fn find<'a>(profiles: &'a [ServerProfile], query: &str) -> Option<&'a ServerProfile> {
    position(profiles, query).map(|i| &profiles[i])
}

/// Index of the single profile matching `query`, by the rules of [`find`].
pub fn position(profiles: &[ServerProfile], query: &str) -> Option<usize> {
    let by_address = query.parse::<IpAddr>().is_ok();

    let mut matches = profiles.iter().enumerate().filter(|(_, p)| {
        if by_address {
            p.address == query
        } else {
            p.name.as_deref() == Some(query)
        }
    });

    match (matches.next(), matches.next()) {
        (Some((index, _)), None) => Some(index),
        _ => None,
    }
}

// ----------------------------------------------------------------------
// Salt
// ----------------------------------------------------------------------

/// Read the salt file, generating and persisting a new salt if absent.
///
/// The file's bytes are used verbatim; new salts are base64 text.  An
/// empty salt file is only replaced while no vault exists, since the
/// vault was sealed under whatever the file held.
pub fn load_or_create_salt(path: &Path, vault_path: &Path) -> Result<Vec<u8>> {
    if let Some(salt) = format::read_optional(path)? {
        if !salt.is_empty() {
            return Ok(salt);
        }
        if vault_path.exists() {
            warn!(path = %path.display(), "salt file is empty, using it as-is for the existing vault");
            return Ok(salt);
        }
        warn!(path = %path.display(), "salt file is empty, generating a new one");
    }

    let mut raw = [0u8; SALT_BYTES];
    rand::rng().fill_bytes(&mut raw);
    let salt = URL_SAFE_NO_PAD.encode(raw).into_bytes();

    format::write_atomic(path, &salt)?;
    info!(path = %path.display(), "generated new salt");
    Ok(salt)
}
