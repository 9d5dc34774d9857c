//! `essh --list`

use crate::errors::Result;
use crate::router::{Outcome, ProfileSummary, VaultSession};

pub fn execute(session: &mut VaultSession) -> Result<Outcome> {
    let rows = session
        .profiles()
        .iter()
        .map(|p| ProfileSummary {
            name: p.name.clone(),
            address: p.address.clone(),
            user: p.user.clone(),
        })
        .collect();
    Ok(Outcome::Listed(rows))
}
