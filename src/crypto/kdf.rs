//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The iteration count is deliberately high so that brute-forcing a
//! stolen vault file is expensive.  The count used to write a file is
//! recorded in that file's header, so raising the configured default
//! later never breaks existing vaults.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use super::keys::{DerivedKey, KEY_LEN};

/// Default number of PBKDF2 rounds for newly written files.
pub const DEFAULT_ITERATIONS: u32 = 480_000;

/// Lowest iteration count the configuration may select.
pub const MIN_ITERATIONS: u32 = 400_000;

/// Upper bound accepted when reading a file header.
///
/// Anything above this is treated as a corrupted header rather than
/// a request to spin the CPU for hours.
pub const MAX_ITERATIONS: u32 = 10_000_000;

/// Derive a 32-byte key from a passphrase and salt.
///
/// The same passphrase + salt + iterations always produce the same key.
pub fn derive_key(passphrase: &[u8], salt: &[u8], iterations: u32) -> DerivedKey {
    let mut bytes = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(passphrase, salt, iterations, &mut bytes);
    DerivedKey::new(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let a = derive_key(b"hunter22", b"salt", 1_000);
        let b = derive_key(b"hunter22", b"salt", 1_000);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn iteration_count_changes_the_key() {
        let a = derive_key(b"hunter22", b"salt", 1_000);
        let b = derive_key(b"hunter22", b"salt", 1_001);
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn default_satisfies_minimum() {
        assert!(DEFAULT_ITERATIONS >= MIN_ITERATIONS);
        assert!(DEFAULT_ITERATIONS <= MAX_ITERATIONS);
    }
}
