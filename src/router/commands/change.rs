//! `essh --change`: re-encrypt the vault under a new master password.

use tracing::info;

use crate::errors::Result;
use crate::router::prompt::{prompt_new_master_password, PasswordPrompt};
use crate::router::{Outcome, VaultSession};
use crate::vault::VaultStore;

/// Execute `--change`.  Profiles are kept; the session cache is left alone
/// and simply stops matching once the password differs.
pub fn execute(
    store: &VaultStore,
    prompt: &mut dyn PasswordPrompt,
    session: &mut VaultSession,
) -> Result<Outcome> {
    let password = prompt_new_master_password(prompt, "Enter new master password")?;

    store.save_profiles(&password, session.profiles())?;
    session.set_master_pass(password);

    let profiles = session.profiles().len();
    info!(profiles, "master password changed");
    Ok(Outcome::PasswordChanged { profiles })
}
