use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::crypto::{DEFAULT_ITERATIONS, MIN_ITERATIONS};
use crate::errors::{EsshError, Result};

/// User-level configuration, loaded from `<data_dir>/config.toml`.
///
/// Every field has a sensible default so essh works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// PBKDF2 rounds for newly written vault and session files.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// SSH client executable.
    #[serde(default = "default_ssh_program")]
    pub ssh_program: String,

    /// Port used when `--port` is not given.
    #[serde(default = "default_ssh_port")]
    pub ssh_port: u16,

    /// Seconds to wait for the SSH client to ask for a password.
    #[serde(default = "default_prompt_timeout_secs")]
    pub prompt_timeout_secs: u64,

    /// Remember the master password for the current terminal session.
    #[serde(default = "default_session_cache")]
    pub session_cache: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_kdf_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

fn default_ssh_program() -> String {
    "ssh".to_string()
}

fn default_ssh_port() -> u16 {
    22
}

fn default_prompt_timeout_secs() -> u64 {
    20
}

fn default_session_cache() -> bool {
    true
}

/// Longest accepted wait for the SSH password prompt, in seconds.
pub const MAX_PROMPT_TIMEOUT_SECS: u64 = 3600;

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            kdf_iterations: default_kdf_iterations(),
            ssh_program: default_ssh_program(),
            ssh_port: default_ssh_port(),
            prompt_timeout_secs: default_prompt_timeout_secs(),
            session_cache: default_session_cache(),
        }
    }
}

impl Settings {
    /// Name of the config file inside the data directory.
    pub const FILE_NAME: &'static str = "config.toml";

    /// Load settings from `<data_dir>/config.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            EsshError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that would weaken the vault or cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.kdf_iterations < MIN_ITERATIONS {
            return Err(EsshError::ConfigError(format!(
                "kdf_iterations must be at least {MIN_ITERATIONS} (got {})",
                self.kdf_iterations
            )));
        }
        if !(1..=MAX_PROMPT_TIMEOUT_SECS).contains(&self.prompt_timeout_secs) {
            return Err(EsshError::ConfigError(format!(
                "prompt_timeout_secs must be between 1 and {MAX_PROMPT_TIMEOUT_SECS} (got {})",
                self.prompt_timeout_secs
            )));
        }
        if self.ssh_program.trim().is_empty() {
            return Err(EsshError::ConfigError("ssh_program cannot be empty".into()));
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────
