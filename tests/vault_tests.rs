//! Integration tests for the essh vault module.

use std::fs;
use std::path::PathBuf;

use essh::vault::{find, ServerProfile, VaultStore};
use tempfile::TempDir;

const ROUNDS: u32 = 1_000;

/// Helper: a store inside a fresh temp dir.
fn store() -> (TempDir, VaultStore) {
    let dir = TempDir::new().expect("create temp dir");
    let store = open_in(&dir);
    (dir, store)
}

fn open_in(dir: &TempDir) -> VaultStore {
    VaultStore::with_paths(vault_file(dir), &dir.path().join(".salt"), ROUNDS)
        .expect("open store")
}

fn vault_file(dir: &TempDir) -> PathBuf {
    dir.path().join(".essh")
}

fn profile(address: &str, name: Option<&str>, user: Option<&str>) -> ServerProfile {
    ServerProfile::new(
        address,
        "p@ss",
        name.map(str::to_string),
        user.map(str::to_string),
    )
}

// ---------------------------------------------------------------------------
// Save / load
// ---------------------------------------------------------------------------

#[test]
fn save_and_load_roundtrip() {
    let (_dir, store) = store();
    let profiles = vec![
        profile("10.0.0.5", Some("web"), Some("alice")),
        profile("fe80::1", None, None),
    ];

    store.save_profiles("hunter22", &profiles).unwrap();

    let loaded = store.load_profiles("hunter22").unwrap().expect("unlocks");
    assert_eq!(loaded, profiles);
    assert_eq!(loaded[1].user, "root");
}

#[test]
fn missing_vault_loads_as_empty() {
    let (_dir, store) = store();
    assert!(!store.exists());
    assert_eq!(store.load_profiles("anything").unwrap(), Some(vec![]));
}

#[test]
fn wrong_password_returns_none() {
    let (_dir, store) = store();
    store
        .save_profiles("hunter22", &[profile("10.0.0.5", None, None)])
        .unwrap();

    assert_eq!(store.load_profiles("hunter23").unwrap(), None);
}

#[test]
fn any_flipped_byte_is_detected() {
    let (dir, store) = store();
    store
        .save_profiles("hunter22", &[profile("10.0.0.5", Some("web"), None)])
        .unwrap();

    let pristine = fs::read(vault_file(&dir)).unwrap();
    for i in 0..pristine.len() {
        let mut tampered = pristine.clone();
        tampered[i] ^= 0x01;
        fs::write(vault_file(&dir), &tampered).unwrap();

        assert_eq!(
            store.load_profiles("hunter22").unwrap(),
            None,
            "flipping byte {i} went unnoticed"
        );
    }
}

#[test]
fn garbage_file_reads_as_locked() {
    let (dir, store) = store();
    fs::write(vault_file(&dir), b"not a vault at all").unwrap();
    assert_eq!(store.load_profiles("hunter22").unwrap(), None);
}

#[test]
fn salt_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let first = open_in(&dir);
    first
        .save_profiles("hunter22", &[profile("10.0.0.5", None, None)])
        .unwrap();

    let second = open_in(&dir);
    assert_eq!(first.salt(), second.salt());
    assert_eq!(second.load_profiles("hunter22").unwrap().unwrap().len(), 1);
}

#[test]
fn fresh_salts_differ() {
    let (_a, one) = store();
    let (_b, two) = store();
    assert_ne!(one.salt(), two.salt());
}

#[test]
fn reset_to_empty_then_load() {
    let (_dir, store) = store();
    store.save_profiles("hunter22", &[]).unwrap();

    assert!(store.exists());
    assert_eq!(store.load_profiles("hunter22").unwrap(), Some(vec![]));
}

#[test]
fn reencrypting_under_new_password() {
    let (_dir, store) = store();
    let profiles = vec![profile("10.0.0.5", Some("web"), None)];
    store.save_profiles("hunter22", &profiles).unwrap();

    let loaded = store.load_profiles("hunter22").unwrap().unwrap();
    store.save_profiles("newpass", &loaded).unwrap();

    assert_eq!(store.load_profiles("hunter22").unwrap(), None);
    assert_eq!(store.load_profiles("newpass").unwrap(), Some(profiles));
}

#[test]
fn binary_salt_file_still_opens_and_saves() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".salt"), [0xff, 0xfe, 0x80, 0x00, 0x41]).unwrap();

    let store = open_in(&dir);
    assert_eq!(store.salt(), &[0xff, 0xfe, 0x80, 0x00, 0x41]);
    assert_eq!(store.load_profiles("hunter22").unwrap(), Some(vec![]));

    store
        .save_profiles("hunter22", &[profile("10.0.0.5", None, None)])
        .unwrap();
    let reopened = open_in(&dir);
    assert_eq!(reopened.load_profiles("hunter22").unwrap().unwrap().len(), 1);
}

#[test]
fn emptied_salt_is_not_replaced_while_a_vault_exists() {
    let (dir, store) = store();
    store
        .save_profiles("hunter22", &[profile("10.0.0.5", None, None)])
        .unwrap();
    fs::write(dir.path().join(".salt"), b"").unwrap();

    let reopened = open_in(&dir);
    assert!(reopened.salt().is_empty());
    assert!(fs::read(dir.path().join(".salt")).unwrap().is_empty());
    // Wrong key now, but still a clean "cannot open" rather than an error.
    assert_eq!(reopened.load_profiles("hunter22").unwrap(), None);
}

#[test]
fn emptied_salt_without_a_vault_is_regenerated() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".salt"), b"").unwrap();

    let store = open_in(&dir);
    assert!(!store.salt().is_empty());
    assert_eq!(fs::read(dir.path().join(".salt")).unwrap(), store.salt());
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

#[test]
fn added_profile_is_found_by_address_only() {
    let profiles = vec![profile("10.0.0.5", None, Some("alice"))];

    let hit = find(&profiles, "10.0.0.5").expect("found by address");
    assert_eq!(hit.user, "alice");
    assert!(find(&profiles, "alice").is_none());
}

#[test]
fn names_and_addresses_do_not_cross_match() {
    let profiles = vec![
        profile("10.0.0.5", Some("10.0.0.6"), None),
        profile("10.0.0.7", Some("db"), None),
    ];

    // An IP-looking query only ever checks addresses.
    assert!(find(&profiles, "10.0.0.6").is_none());
    assert_eq!(find(&profiles, "db").unwrap().address, "10.0.0.7");
    assert_eq!(find(&profiles, "::ffff:10.0.0.7").map(|p| p.address.as_str()), None);
}

#[test]
fn duplicate_names_are_ambiguous() {
    let profiles = vec![
        profile("10.0.0.5", Some("web"), None),
        profile("10.0.0.6", Some("web"), None),
    ];
    assert!(find(&profiles, "web").is_none());
}

#[test]
fn duplicate_addresses_are_ambiguous() {
    let profiles = vec![
        profile("10.0.0.5", Some("a"), None),
        profile("10.0.0.5", Some("b"), None),
    ];
    assert!(find(&profiles, "10.0.0.5").is_none());
    assert_eq!(find(&profiles, "b").unwrap().name.as_deref(), Some("b"));
}
