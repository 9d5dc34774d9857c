//! Cryptographic primitives for essh.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - PBKDF2-HMAC-SHA256 password-based key derivation (`kdf`)
//! - A zeroizing key holder (`keys`)

pub mod encryption;
pub mod kdf;
pub mod keys;

pub use encryption::{decrypt, encrypt};
pub use kdf::{derive_key, DEFAULT_ITERATIONS, MAX_ITERATIONS, MIN_ITERATIONS};
pub use keys::DerivedKey;
