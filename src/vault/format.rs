//! Versioned encrypted envelope shared by the vault and session cache files.
//!
//! An envelope has this layout:
//!
//! ```text
//! [magic: 4 bytes][version: 1 byte][iterations: 4 bytes LE][nonce: 12 bytes][ciphertext + tag]
//! ```
//!
//! - **Magic**: `ESVT` for the profile vault, `ESSN` for the session cache.
//! - **Version**: format version (currently `1`).
//! - **Iterations**: PBKDF2 rounds used to derive the key for this file.
//! - **Nonce + ciphertext**: AES-256-GCM output; the 9 header bytes are
//!   passed as associated data so any header edit fails authentication.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use crate::crypto::{self, MAX_ITERATIONS};
use crate::errors::{EsshError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of the profile vault file.
pub const VAULT_MAGIC: &[u8; 4] = b"ESVT";

/// Magic bytes at the start of the session cache file.
pub const SESSION_MAGIC: &[u8; 4] = b"ESSN";

/// Current envelope format version.
pub const CURRENT_VERSION: u8 = 1;

/// Fixed-size header: 4 (magic) + 1 (version) + 4 (iterations).
pub const HEADER_LEN: usize = 9;

// ---------------------------------------------------------------------------
// Sealing and opening
// ---------------------------------------------------------------------------

/// Encrypt `plaintext` into a complete envelope.
pub fn seal(
    magic: &[u8; 4],
    passphrase: &[u8],
    salt: &[u8],
    iterations: u32,
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    let header = encode_header(magic, iterations);
    let key = crypto::derive_key(passphrase, salt, iterations);
    let body = crypto::encrypt(key.as_bytes(), plaintext, &header)?;

    let mut buf = Vec::with_capacity(HEADER_LEN + body.len());
    buf.extend_from_slice(&header);
    buf.extend_from_slice(&body);
    Ok(buf)
}

/// Decrypt an envelope produced by `seal`.
///
/// Returns `InvalidVaultFormat` for a header that cannot be ours and
/// `DecryptionFailed` for a wrong passphrase or tampered contents.
pub fn open(magic: &[u8; 4], passphrase: &[u8], salt: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let iterations = decode_header(magic, data)?;
    let (header, body) = data.split_at(HEADER_LEN);
    let key = crypto::derive_key(passphrase, salt, iterations);
    crypto::decrypt(key.as_bytes(), body, header)
}

/// Seal `plaintext` and write it to `path` atomically.
pub fn write_sealed(
    path: &Path,
    magic: &[u8; 4],
    passphrase: &[u8],
    salt: &[u8],
    iterations: u32,
    plaintext: &[u8],
) -> Result<()> {
    let sealed = seal(magic, passphrase, salt, iterations, plaintext)?;
    write_atomic(path, &sealed)
}

/// Read and open the envelope at `path`.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_sealed(
    path: &Path,
    magic: &[u8; 4],
    passphrase: &[u8],
    salt: &[u8],
) -> Result<Option<Vec<u8>>> {
    match read_optional(path)? {
        Some(data) => open(magic, passphrase, salt, &data).map(Some),
        None => Ok(None),
    }
}

fn encode_header(magic: &[u8; 4], iterations: u32) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    header[..4].copy_from_slice(magic);
    header[4] = CURRENT_VERSION;
    header[5..].copy_from_slice(&iterations.to_le_bytes());
    header
}

/// Validate the fixed header and return the stored iteration count.
fn decode_header(magic: &[u8; 4], data: &[u8]) -> Result<u32> {
    if data.len() < HEADER_LEN {
        return Err(EsshError::InvalidVaultFormat(
            "file too small to hold a header".into(),
        ));
    }

    if &data[0..4] != magic {
        return Err(EsshError::InvalidVaultFormat("unexpected magic bytes".into()));
    }

    let version = data[4];
    if version != CURRENT_VERSION {
        return Err(EsshError::InvalidVaultFormat(format!(
            "unsupported version {version}, expected {CURRENT_VERSION}"
        )));
    }

    let iterations = u32::from_le_bytes(
        data[5..HEADER_LEN]
            .try_into()
            .map_err(|_| EsshError::InvalidVaultFormat("bad iteration field".into()))?,
    );
    if iterations == 0 || iterations > MAX_ITERATIONS {
        return Err(EsshError::InvalidVaultFormat(format!(
            "iteration count {iterations} out of range"
        )));
    }

    Ok(iterations)
}

// ---------------------------------------------------------------------------
// File helpers
// ---------------------------------------------------------------------------

/// Write `data` to `path` **atomically**.
///
/// Writes a temp file in the same directory, then renames it over the
/// target, so a crash or Ctrl-C never leaves a half-written file.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    // Owner-only read/write on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Read a whole file, mapping "not found" to `None`.
pub fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
