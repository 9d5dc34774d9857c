//! `essh --remove <ip|name>`: delete one saved server.

use tracing::info;

use crate::errors::Result;
use crate::router::{Outcome, VaultSession};
use crate::vault::{position, VaultStore};

/// Execute `--remove`.  Uses the same single-match rule as connecting, so
/// an ambiguous query removes nothing.
pub fn execute(store: &VaultStore, session: &mut VaultSession, query: &str) -> Result<Outcome> {
    let Some(index) = position(session.profiles(), query) else {
        return Ok(Outcome::NotFound(query.to_string()));
    };

    let removed = session.profiles_mut().remove(index);
    store.save_profiles(session.master_pass(), session.profiles())?;

    let remaining = session.profiles().len();
    info!(address = %removed.address, remaining, "profile removed");
    Ok(Outcome::Removed {
        address: removed.address.clone(),
        remaining,
    })
}
