//! Interactive SSH sessions.
//!
//! The router only knows the [`SshConnector`] trait; the production
//! implementation drives the system `ssh` client on a pseudo-terminal.

mod pty;

pub use pty::{build_args, contains_password_prompt, PtySshConnector};

use crate::errors::Result;

/// Everything needed to open one SSH session.
pub struct ConnectTarget<'a> {
    pub address: &'a str,
    pub user: &'a str,
    pub password: &'a str,
    pub port: u16,
    /// Extra arguments forwarded verbatim to the SSH client.
    pub extra_args: &'a [String],
}

/// Opens an interactive SSH session and returns once it ends.
pub trait SshConnector {
    fn connect(&self, target: &ConnectTarget<'_>) -> Result<()>;
}
