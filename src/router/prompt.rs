//! Password input seam.
//!
//! The router never talks to the terminal directly; it asks a
//! [`PasswordPrompt`], which the CLI backs with `dialoguer` and tests back
//! with a script.

use zeroize::Zeroizing;

use crate::errors::Result;

/// Source of secret input and sink for short notices.
pub trait PasswordPrompt {
    /// Read one line of hidden input.  Empty input is returned as-is.
    fn read_password(&mut self, prompt: &str) -> Result<Zeroizing<String>>;

    /// Tell the user why input was rejected.
    fn notify(&mut self, message: &str);
}

/// Ask for a new master password until a non-empty, confirmed one is given.
pub fn prompt_new_master_password(
    prompt: &mut dyn PasswordPrompt,
    message: &str,
) -> Result<Zeroizing<String>> {
    loop {
        let password = prompt.read_password(message)?;
        if password.is_empty() {
            prompt.notify("Master password cannot be 0 length, try again.");
            continue;
        }

        let confirmation = prompt.read_password("Confirm new master password")?;
        if *confirmation != *password {
            prompt.notify("Passwords do not match, try again.");
            continue;
        }

        return Ok(password);
    }
}
