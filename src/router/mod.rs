//! Request dispatch.
//!
//! The CLI turns flags into one [`Request`].  The [`Router`] runs the
//! password gate when the request needs the decrypted vault, then hands the
//! command only the pieces it uses and returns an [`Outcome`] for the CLI
//! to render.

pub mod commands;
pub mod prompt;
pub mod session;

pub use prompt::{prompt_new_master_password, PasswordPrompt};
pub use session::VaultSession;

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::errors::{EsshError, Result};
use crate::session::SessionCache;
use crate::ssh::SshConnector;
use crate::vault::VaultStore;

/// Profile fields supplied with `--add`.
#[derive(Default)]
pub struct AddRequest {
    pub address: Option<String>,
    pub password: Option<Zeroizing<String>>,
    pub name: Option<String>,
    pub user: Option<String>,
}

/// Target and pass-through options for a connection.
pub struct ConnectRequest {
    /// IP address or profile name.
    pub query: String,
    /// Extra arguments forwarded to the SSH client.
    pub ssh_args: Vec<String>,
    pub port: u16,
}

/// One user intent per invocation.
pub enum Request {
    /// Wipe the vault and start over with a new master password.
    Drop,
    Connect(ConnectRequest),
    /// Re-encrypt the vault under a new master password.
    Change,
    Add(AddRequest),
    List,
    Remove { query: String },
    /// Forget the cached master password for this terminal.
    Lock,
}

impl Request {
    /// Whether the password gate must run before the command.
    pub fn requires_unlock(&self) -> bool {
        !matches!(self, Request::Drop | Request::Lock)
    }

    /// Whether the request reads or writes the vault and salt files.
    pub fn uses_vault(&self) -> bool {
        !matches!(self, Request::Lock)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Request::Drop => "drop",
            Request::Connect(_) => "connect",
            Request::Change => "change",
            Request::Add(_) => "add",
            Request::List => "list",
            Request::Remove { .. } => "remove",
            Request::Lock => "lock",
        }
    }
}

/// Row of `--list` output.  Never carries the login password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    pub name: Option<String>,
    pub address: String,
    pub user: String,
}

/// What a command did.  Expected failures (unknown profile, missing flags)
/// are outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    VaultReset,
    ProfileAdded { address: String, total: usize },
    MissingProfileFields,
    InvalidAddress(String),
    PasswordChanged { profiles: usize },
    Connected { address: String, user: String },
    ConnectionFailed { address: String, reason: String },
    NotFound(String),
    Listed(Vec<ProfileSummary>),
    Removed { address: String, remaining: usize },
    SessionForgotten { existed: bool },
}

/// Runs one request against the vault.
pub struct Router<'a> {
    store: &'a VaultStore,
    cache: &'a SessionCache,
    prompt: &'a mut dyn PasswordPrompt,
    connector: &'a dyn SshConnector,
    fingerprint: Option<String>,
    env_password: Option<Zeroizing<String>>,
}

impl<'a> Router<'a> {
    pub fn new(
        store: &'a VaultStore,
        cache: &'a SessionCache,
        prompt: &'a mut dyn PasswordPrompt,
        connector: &'a dyn SshConnector,
    ) -> Self {
        Self {
            store,
            cache,
            prompt,
            connector,
            fingerprint: None,
            env_password: None,
        }
    }

    /// Terminal fingerprint keying the session cache.  `None` disables
    /// the cache entirely.
    pub fn with_fingerprint(mut self, fingerprint: Option<String>) -> Self {
        self.fingerprint = fingerprint;
        self
    }

    /// Master password taken from the environment, tried once before
    /// prompting.
    pub fn with_env_password(mut self, password: Option<Zeroizing<String>>) -> Self {
        self.env_password = password.filter(|p| !p.is_empty());
        self
    }

    pub fn dispatch(&mut self, request: Request) -> Result<Outcome> {
        debug!(command = request.name(), "dispatching");

        let mut session = if request.requires_unlock() {
            Some(self.unlock()?)
        } else {
            None
        };

        match request {
            Request::Drop => commands::drop::execute(self.store, &mut *self.prompt),
            Request::Lock => commands::lock::execute(self.cache),
            Request::Connect(req) => {
                commands::connect::execute(self.connector, unlocked(&mut session)?, req)
            }
            Request::Change => {
                commands::change::execute(self.store, &mut *self.prompt, unlocked(&mut session)?)
            }
            Request::Add(req) => commands::add::execute(self.store, unlocked(&mut session)?, req),
            Request::List => commands::list::execute(unlocked(&mut session)?),
            Request::Remove { query } => {
                commands::remove::execute(self.store, unlocked(&mut session)?, &query)
            }
        }
    }

    /// The password gate: session cache, then `ESSH_PASSWORD`, then the
    /// prompt until a password opens the vault.
    fn unlock(&mut self) -> Result<VaultSession> {
        if let Some(fingerprint) = self.fingerprint.as_deref() {
            if let Some(cached) = self.cache.load(fingerprint, self.store.salt()) {
                if let Some(profiles) = self.store.load_profiles(&cached)? {
                    debug!("vault unlocked from session cache");
                    return Ok(VaultSession::new(cached, profiles));
                }
                debug!("cached master password no longer opens the vault");
            }
        }

        if let Some(password) = self.env_password.take() {
            match self.store.load_profiles(&password)? {
                Some(profiles) => {
                    debug!("vault unlocked from ESSH_PASSWORD");
                    return Ok(VaultSession::new(password, profiles));
                }
                None => self
                    .prompt
                    .notify("ESSH_PASSWORD does not open the vault, falling back to the prompt."),
            }
        }

        loop {
            let password = self.prompt.read_password("Enter master password")?;
            if password.is_empty() {
                self.prompt.notify("Master password cannot be 0 length");
                continue;
            }

            match self.store.load_profiles(&password)? {
                Some(profiles) => {
                    self.remember(&password);
                    return Ok(VaultSession::new(password, profiles));
                }
                None => self
                    .prompt
                    .notify("Wrong master password or damaged vault, try again."),
            }
        }
    }

    fn remember(&self, password: &str) {
        let Some(fingerprint) = self.fingerprint.as_deref() else {
            return;
        };
        if let Err(e) = self.cache.store(fingerprint, self.store.salt(), password) {
            warn!(error = %e, path = %self.cache.path().display(), "could not cache master password");
        }
    }
}

/// Run a request that never touches the vault or salt files, so a
/// damaged vault cannot get in its way.
pub fn dispatch_standalone(cache: &SessionCache, request: Request) -> Result<Outcome> {
    debug!(command = request.name(), "dispatching without the vault");
    match request {
        Request::Lock => commands::lock::execute(cache),
        _ => Err(EsshError::VaultLocked),
    }
}

fn unlocked(session: &mut Option<VaultSession>) -> Result<&mut VaultSession> {
    session.as_mut().ok_or(EsshError::VaultLocked)
}
