//! `essh --lock`: forget the cached master password.

use crate::errors::Result;
use crate::router::Outcome;
use crate::session::SessionCache;

pub fn execute(cache: &SessionCache) -> Result<Outcome> {
    let existed = cache.clear()?;
    Ok(Outcome::SessionForgotten { existed })
}
