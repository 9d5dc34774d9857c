//! Terminal-backed [`PasswordPrompt`].

use std::io::ErrorKind;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::errors::{EsshError, Result};
use crate::router::PasswordPrompt;

/// Reads hidden input with `dialoguer`.
pub struct TerminalPrompt;

impl PasswordPrompt for TerminalPrompt {
    fn read_password(&mut self, prompt: &str) -> Result<Zeroizing<String>> {
        // Empty input is allowed through so the caller can explain why it
        // was rejected.
        dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map(Zeroizing::new)
            .map_err(prompt_error)
    }

    fn notify(&mut self, message: &str) {
        output::warning(message);
    }
}

fn prompt_error(err: dialoguer::Error) -> EsshError {
    match err {
        dialoguer::Error::IO(e) if e.kind() == ErrorKind::Interrupted => EsshError::Interrupted,
        other => EsshError::PromptFailed(other.to_string()),
    }
}
