//! Terminal session fingerprint.
//!
//! Repeated invocations from the same shell must agree on an identifier
//! so they can share a cached master password, while a new shell or a
//! new login must not.  We find the terminal device this process is
//! attached to, pick the lowest-numbered living process attached to the
//! same device (normally the login shell), and hash a tuple describing
//! that process.
//!
//! This is a best-effort heuristic and NOT a security boundary: any local
//! process that can list the process table and see the terminal can
//! compute the same fingerprint and therefore open the cached password.

use sha2::{Digest, Sha256};
use tracing::debug;

/// A terminal device number split into major/minor parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId {
    pub major: u32,
    pub minor: u32,
}

impl DeviceId {
    /// Decode an `st_rdev` value (glibc `makedev` layout).
    pub fn from_rdev(dev: u64) -> Self {
        let major = ((dev >> 8) & 0xfff) | ((dev >> 32) & 0xffff_f000);
        let minor = (dev & 0xff) | ((dev >> 12) & 0xffff_ff00);
        Self {
            major: major as u32,
            minor: minor as u32,
        }
    }

    /// Decode the `tty_nr` field of `/proc/<pid>/stat`; `0` means no terminal.
    pub fn from_tty_nr(tty_nr: i64) -> Option<Self> {
        if tty_nr == 0 {
            return None;
        }
        let nr = tty_nr as u64;
        Some(Self {
            major: ((nr >> 8) & 0xfff) as u32,
            minor: ((nr & 0xff) | ((nr >> 12) & 0xfff00)) as u32,
        })
    }
}

/// The terminal the current process is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalDevice {
    /// Device path, e.g. `/dev/pts/3`.
    pub path: String,
    pub device: DeviceId,
}

/// One entry of the OS process table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    pub pid: u32,
    pub parent_pid: Option<u32>,
    /// Seconds since the epoch.
    pub start_time: u64,
    pub name: String,
    pub user: Option<String>,
    /// Controlling terminal, when the platform reports it.
    pub terminal: Option<DeviceId>,
}

/// Read-only view of the OS process state.
pub trait ProcessInspector {
    /// Terminal attached to stdin, stdout or stderr.
    fn current_terminal(&self) -> Option<TerminalDevice>;

    /// All living processes.
    fn processes(&self) -> Vec<ProcessRecord>;

    /// Session leader of the current process.
    fn session_leader(&self) -> Option<u32> {
        None
    }
}

/// Fingerprint of the terminal session running this process.
///
/// `None` when no terminal is attached or no owner process can be found.
pub fn fingerprint() -> Option<String> {
    fingerprint_with(&SystemInspector)
}

/// Fingerprint computed against an arbitrary inspector.
pub fn fingerprint_with(inspector: &dyn ProcessInspector) -> Option<String> {
    let terminal = inspector.current_terminal()?;
    let processes = inspector.processes();
    let owner = terminal_owner(&processes, &terminal, inspector.session_leader())?;

    debug!(pid = owner.pid, tty = %terminal.path, "terminal session owner");
    Some(hash_identity(owner, &terminal.path))
}

/// Lowest-numbered process on `terminal`, falling back to the session leader.
fn terminal_owner<'a>(
    processes: &'a [ProcessRecord],
    terminal: &TerminalDevice,
    session_leader: Option<u32>,
) -> Option<&'a ProcessRecord> {
    processes
        .iter()
        .filter(|p| p.terminal == Some(terminal.device))
        .min_by_key(|p| p.pid)
        .or_else(|| {
            let sid = session_leader?;
            processes.iter().find(|p| p.pid == sid)
        })
}

/// SHA-256 over the owner's identity tuple, as lowercase hex.
pub fn hash_identity(owner: &ProcessRecord, tty_path: &str) -> String {
    let fields = [
        owner.start_time.to_string(),
        owner.parent_pid.map(|p| p.to_string()).unwrap_or_default(),
        owner.pid.to_string(),
        owner.name.clone(),
        owner.user.clone().unwrap_or_default(),
        tty_path.to_string(),
    ];

    let mut hasher = Sha256::new();
    for field in &fields {
        hasher.update(field.as_bytes());
        // Separator so ("ab", "c") and ("a", "bc") differ.
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

/// Extract `tty_nr` from the contents of `/proc/<pid>/stat`.
///
/// The command name may contain spaces and parentheses, so fields are
/// counted from the last `)`.
pub fn parse_tty_nr(stat: &str) -> Option<i64> {
    let rest = &stat[stat.rfind(')')? + 1..];
    // state ppid pgrp session tty_nr
    rest.split_whitespace().nth(4)?.parse().ok()
}

// ---------------------------------------------------------------------------
// OS-backed inspector
// ---------------------------------------------------------------------------

/// Inspector backed by `sysinfo`, `/proc` and `libc`.
pub struct SystemInspector;

impl ProcessInspector for SystemInspector {
    #[cfg(unix)]
    fn current_terminal(&self) -> Option<TerminalDevice> {
        use std::ffi::CStr;
        use std::os::unix::fs::MetadataExt;

        for fd in [libc::STDIN_FILENO, libc::STDOUT_FILENO, libc::STDERR_FILENO] {
            // SAFETY: isatty/ttyname only inspect the descriptor; the returned
            // pointer is copied out before any other libc call.
            let path = unsafe {
                if libc::isatty(fd) != 1 {
                    continue;
                }
                let name = libc::ttyname(fd);
                if name.is_null() {
                    continue;
                }
                CStr::from_ptr(name).to_string_lossy().into_owned()
            };

            let Ok(meta) = std::fs::metadata(&path) else {
                continue;
            };
            return Some(TerminalDevice {
                device: DeviceId::from_rdev(meta.rdev()),
                path,
            });
        }
        None
    }

    #[cfg(not(unix))]
    fn current_terminal(&self) -> Option<TerminalDevice> {
        None
    }

    fn processes(&self) -> Vec<ProcessRecord> {
        use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};

        let mut system = System::new();
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::new().with_user(UpdateKind::OnlyIfNotSet),
        );

        system
            .processes()
            .values()
            .map(|p| {
                let pid = p.pid().as_u32();
                ProcessRecord {
                    pid,
                    parent_pid: p.parent().map(|parent| parent.as_u32()),
                    start_time: p.start_time(),
                    name: p.name().to_string_lossy().into_owned(),
                    user: p.user_id().map(|uid| format!("{uid:?}")),
                    terminal: process_terminal(pid),
                }
            })
            .collect()
    }

    #[cfg(unix)]
    fn session_leader(&self) -> Option<u32> {
        // SAFETY: getsid(0) has no preconditions.
        let sid = unsafe { libc::getsid(0) };
        u32::try_from(sid).ok().filter(|&sid| sid > 0)
    }
}

#[cfg(target_os = "linux")]
fn process_terminal(pid: u32) -> Option<DeviceId> {
    let stat = std::fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
    DeviceId::from_tty_nr(parse_tty_nr(&stat)?)
}

#[cfg(not(target_os = "linux"))]
fn process_terminal(_pid: u32) -> Option<DeviceId> {
    None
}
