pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod router;
pub mod session;
pub mod ssh;
pub mod vault;
