//! CLI module: Clap argument parser, terminal prompt, output helpers and
//! Ctrl-C handling.

pub mod interrupt;
pub mod output;
pub mod prompt;

use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use zeroize::Zeroizing;

use crate::router::{AddRequest, ConnectRequest, Request};

/// essh: SSH into saved servers without retyping their passwords.
#[derive(Parser)]
#[command(
    name = "essh",
    about = "Encrypted SSH password manager",
    version,
    group(
        ArgGroup::new("intent")
            .multiple(false)
            .args(["drop", "add", "change", "list", "remove", "lock", "data"])
    )
)]
pub struct Cli {
    /// Erase every saved server and set a new master password
    #[arg(short, long)]
    pub drop: bool,

    /// Save a server (needs --ip_address and --password)
    #[arg(short, long)]
    pub add: bool,

    /// IP address of the server to add
    #[arg(short = 'i', long = "ip_address", alias = "ip-address", requires = "add")]
    pub ip_address: Option<String>,

    /// SSH password of the server to add (required with --add; visible in shell history)
    #[arg(short, long, requires = "add")]
    pub password: Option<String>,

    /// Optional name for the server, usable instead of the address
    #[arg(short, long, requires = "add")]
    pub name: Option<String>,

    /// Login user for the server (default: root)
    #[arg(short, long, requires = "add")]
    pub user: Option<String>,

    /// Change the master password
    #[arg(short, long)]
    pub change: bool,

    /// Show saved servers
    #[arg(short, long)]
    pub list: bool,

    /// Delete the saved server matching an IP address or name
    #[arg(short, long, value_name = "IP|NAME")]
    pub remove: Option<String>,

    /// Forget the master password cached for this terminal
    #[arg(long)]
    pub lock: bool,

    /// SSH port (default from config, normally 22)
    #[arg(long)]
    pub port: Option<u16>,

    /// Data directory (default: ~/.essh)
    #[arg(long, env = "ESSH_HOME")]
    pub data_dir: Option<PathBuf>,

    /// IP address or name of the server to connect to
    #[arg(value_name = "IP|NAME")]
    pub data: Option<String>,

    /// Extra arguments passed to ssh
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        requires = "data",
        value_name = "SSH_ARGS"
    )]
    pub ssh_args: Vec<String>,
}

impl Cli {
    /// The single request these flags describe, if any.
    ///
    /// Clap already rejects more than one intent, so the order here only
    /// matters for callers that build a `Cli` by hand.
    pub fn request(&self, default_port: u16) -> Option<Request> {
        if self.drop {
            return Some(Request::Drop);
        }
        if let Some(query) = &self.data {
            return Some(Request::Connect(ConnectRequest {
                query: query.clone(),
                ssh_args: self.ssh_args.clone(),
                port: self.port.unwrap_or(default_port),
            }));
        }
        if self.change {
            return Some(Request::Change);
        }
        if self.add {
            return Some(Request::Add(AddRequest {
                address: self.ip_address.clone(),
                password: self.password.clone().map(Zeroizing::new),
                name: self.name.clone(),
                user: self.user.clone(),
            }));
        }
        if self.list {
            return Some(Request::List);
        }
        if let Some(query) = &self.remove {
            return Some(Request::Remove {
                query: query.clone(),
            });
        }
        if self.lock {
            return Some(Request::Lock);
        }
        None
    }
}
