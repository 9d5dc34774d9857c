//! The unlocked state handed to commands.

use zeroize::Zeroizing;

use crate::vault::ServerProfile;

/// Master password plus the decrypted profile list.
///
/// Built once per dispatch by the password gate and passed to the
/// command explicitly; the password is wiped when the session drops.
pub struct VaultSession {
    master_pass: Zeroizing<String>,
    profiles: Vec<ServerProfile>,
}

impl VaultSession {
    pub fn new(master_pass: Zeroizing<String>, profiles: Vec<ServerProfile>) -> Self {
        Self {
            master_pass,
            profiles,
        }
    }

    pub fn master_pass(&self) -> &str {
        &self.master_pass
    }

    pub fn profiles(&self) -> &[ServerProfile] {
        &self.profiles
    }

    pub fn profiles_mut(&mut self) -> &mut Vec<ServerProfile> {
        &mut self.profiles
    }

    /// Swap in a new master password after the vault was re-encrypted.
    pub fn set_master_pass(&mut self, master_pass: Zeroizing<String>) {
        self.master_pass = master_pass;
    }
}
