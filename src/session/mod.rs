//! Terminal-session unlock caching.
//!
//! - `fingerprint`: identify the terminal session this process runs in
//! - `cache`: the master password sealed under that fingerprint

pub mod cache;
pub mod fingerprint;

pub use cache::SessionCache;
pub use fingerprint::{fingerprint, fingerprint_with, ProcessInspector};
