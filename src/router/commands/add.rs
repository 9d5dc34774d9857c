//! `essh --add`: append a server profile.

use std::net::IpAddr;

use tracing::info;

use crate::errors::Result;
use crate::router::{AddRequest, Outcome, VaultSession};
use crate::vault::{ServerProfile, VaultStore};

/// Execute `--add`.  Address and password are required; user defaults to
/// `root`.  Duplicates are allowed and simply make lookups ambiguous.
pub fn execute(store: &VaultStore, session: &mut VaultSession, req: AddRequest) -> Result<Outcome> {
    let address = req.address.filter(|a| !a.is_empty());
    let password = req.password.filter(|p| !p.is_empty());
    let (Some(address), Some(password)) = (address, password) else {
        return Ok(Outcome::MissingProfileFields);
    };

    if address.parse::<IpAddr>().is_err() {
        return Ok(Outcome::InvalidAddress(address));
    }

    let name = req.name.filter(|n| !n.is_empty());
    let profile = ServerProfile::new(address.as_str(), password.as_str(), name, req.user);
    session.profiles_mut().push(profile);

    store.save_profiles(session.master_pass(), session.profiles())?;

    let total = session.profiles().len();
    info!(address = %address, total, "profile added");
    Ok(Outcome::ProfileAdded { address, total })
}
