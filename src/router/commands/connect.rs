//! `essh <ip|name>`: open an SSH session to a saved server.

use tracing::{info, warn};

use crate::errors::{EsshError, Result};
use crate::router::{ConnectRequest, Outcome, VaultSession};
use crate::ssh::{ConnectTarget, SshConnector};
use crate::vault::find;

/// Execute a connection.  Connector failures are reported as an outcome;
/// only an interrupt propagates.
pub fn execute(
    connector: &dyn SshConnector,
    session: &mut VaultSession,
    req: ConnectRequest,
) -> Result<Outcome> {
    let Some(profile) = find(session.profiles(), &req.query) else {
        return Ok(Outcome::NotFound(req.query));
    };

    let target = ConnectTarget {
        address: &profile.address,
        user: &profile.user,
        password: &profile.password,
        port: req.port,
        extra_args: &req.ssh_args,
    };

    info!(address = %profile.address, user = %profile.user, port = req.port, "connecting");
    match connector.connect(&target) {
        Ok(()) => Ok(Outcome::Connected {
            address: profile.address.clone(),
            user: profile.user.clone(),
        }),
        Err(EsshError::Interrupted) => Err(EsshError::Interrupted),
        Err(e) => {
            warn!(address = %profile.address, error = %e, "connection failed");
            Ok(Outcome::ConnectionFailed {
                address: profile.address.clone(),
                reason: e.to_string(),
            })
        }
    }
}
