//! `essh --drop`: discard every profile and set a new master password.

use tracing::info;

use crate::errors::Result;
use crate::router::prompt::{prompt_new_master_password, PasswordPrompt};
use crate::router::Outcome;
use crate::vault::VaultStore;

/// Execute `--drop`.  The old password is never asked for.
pub fn execute(store: &VaultStore, prompt: &mut dyn PasswordPrompt) -> Result<Outcome> {
    let password = prompt_new_master_password(
        prompt,
        "Enter new master password (ALL saved servers will be erased)",
    )?;

    store.save_profiles(&password, &[])?;
    info!(path = %store.path().display(), "vault reset");
    Ok(Outcome::VaultReset)
}
