use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in essh.
#[derive(Debug, Error)]
pub enum EsshError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong password or corrupted data")]
    DecryptionFailed,

    #[error("Invalid file format: {0}")]
    InvalidVaultFormat(String),

    // --- Data directory errors ---
    #[error("{0} exists but is not a directory — remove it or pick another --data-dir")]
    DataDirNotDirectory(PathBuf),

    #[error("Could not determine the home directory — pass --data-dir or set ESSH_HOME")]
    HomeDirUnavailable,

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- Prompt errors ---
    #[error("Password prompt failed: {0}")]
    PromptFailed(String),

    #[error("Interrupted by user")]
    Interrupted,

    #[error("This command needs an unlocked vault")]
    VaultLocked,

    // --- SSH errors ---
    #[error("SSH connection failed: {0}")]
    SshFailed(String),

    #[error("SSH never asked for a password: {0}")]
    PasswordPromptNotFound(String),
}

/// Convenience type alias for essh results.
pub type Result<T> = std::result::Result<T, EsshError>;
