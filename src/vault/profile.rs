//! `ServerProfile`, one saved SSH target.
//!
//! The password is plaintext only while the vault is unlocked; the whole
//! record is zeroized when dropped and the password never appears in
//! `Debug` output.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// User name applied when a profile is added without one.
pub const DEFAULT_USER: &str = "root";

/// A single saved SSH server.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[zeroize(drop)]
pub struct ServerProfile {
    /// IPv4 or IPv6 literal of the server.
    #[serde(alias = "ip_address")]
    pub address: String,

    /// Optional friendly name, usable as a lookup key.
    #[serde(default)]
    pub name: Option<String>,

    /// Login user.
    #[serde(default = "default_user", deserialize_with = "user_or_default")]
    pub user: String,

    /// Login password.
    pub password: String,
}

impl ServerProfile {
    /// Build a profile, falling back to `root` when no user is given.
    pub fn new(
        address: impl Into<String>,
        password: impl Into<String>,
        name: Option<String>,
        user: Option<String>,
    ) -> Self {
        Self {
            address: address.into(),
            name,
            user: user
                .filter(|u| !u.is_empty())
                .unwrap_or_else(default_user),
            password: password.into(),
        }
    }

    /// The name if set, otherwise the address.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.address)
    }
}

impl fmt::Debug for ServerProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerProfile")
            .field("address", &self.address)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn default_user() -> String {
    DEFAULT_USER.to_string()
}

/// Older stores wrote `"user": null`; treat that like a missing field.
fn user_or_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let user = Option::<String>::deserialize(deserializer)?;
    Ok(user.filter(|u| !u.is_empty()).unwrap_or_else(default_user))
}
