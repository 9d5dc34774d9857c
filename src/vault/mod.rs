//! Vault module: encrypted profile storage.
//!
//! This module provides:
//! - The `ServerProfile` record (`profile`)
//! - The versioned encrypted envelope and atomic file writes (`format`)
//! - `VaultStore` for loading and saving the profile list, plus lookup (`store`)

pub mod format;
pub mod profile;
pub mod store;

// Re-export the most commonly used items.
pub use profile::{ServerProfile, DEFAULT_USER};
pub use store::{find, position, VaultStore};
