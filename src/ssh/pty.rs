//! SSH client on a pseudo-terminal.
//!
//! 1. Spawn `ssh -p <port> <user>@<address> [extra args]` on a PTY.
//! 2. Read its output until it asks for a password (bounded wait).
//! 3. Type the password.
//! 4. Put the local terminal in raw mode and pump bytes both ways until
//!    the client exits.

use std::io::{self, IsTerminal, Read, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use portable_pty::{native_pty_system, CommandBuilder, PtySize};
use tracing::{debug, warn};

use super::{ConnectTarget, SshConnector};
use crate::config::Settings;
use crate::errors::{EsshError, Result};

/// Drives the system SSH client through a PTY.
pub struct PtySshConnector {
    program: String,
    prompt_timeout: Duration,
}

impl PtySshConnector {
    pub fn new(program: impl Into<String>, prompt_timeout: Duration) -> Self {
        Self {
            program: program.into(),
            prompt_timeout,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.ssh_program.clone(),
            Duration::from_secs(settings.prompt_timeout_secs),
        )
    }
}

impl SshConnector for PtySshConnector {
    fn connect(&self, target: &ConnectTarget<'_>) -> Result<()> {
        let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));

        let pair = native_pty_system()
            .openpty(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| EsshError::SshFailed(format!("failed to open PTY: {e}")))?;

        let mut cmd = CommandBuilder::new(&self.program);
        cmd.args(build_args(target));
        if let Ok(cwd) = std::env::current_dir() {
            cmd.cwd(cwd);
        }

        let mut child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| EsshError::SshFailed(format!("failed to start {}: {e}", self.program)))?;
        debug!(program = %self.program, address = target.address, "ssh client started");

        // Only the child should hold the slave end, so EOF reaches us on exit.
        drop(pair.slave);

        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| EsshError::SshFailed(format!("failed to get PTY reader: {e}")))?;
        let mut writer = pair
            .master
            .take_writer()
            .map_err(|e| EsshError::SshFailed(format!("failed to get PTY writer: {e}")))?;

        let output = spawn_reader(reader);

        match wait_for_prompt(&output, self.prompt_timeout) {
            PromptWait::Found => {}
            PromptWait::Exited(seen) | PromptWait::TimedOut(seen) => {
                // Show the user what ssh said instead of the prompt.
                let mut stdout = io::stdout();
                let _ = stdout.write_all(&seen);
                let _ = stdout.flush();

                if let Err(e) = child.kill() {
                    debug!(error = %e, "ssh client already gone");
                }
                let _ = child.wait();
                return Err(EsshError::PasswordPromptNotFound(format!(
                    "{}@{} did not ask for a password",
                    target.user, target.address
                )));
            }
        }

        writer.write_all(target.password.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        debug!("password sent, handing over the terminal");

        interact(&output, writer)?;

        let status = child.wait()?;
        if status.success() {
            debug!("ssh session ended");
        } else {
            warn!(code = status.exit_code(), "ssh exited with an error");
        }
        Ok(())
    }
}

/// Arguments for the SSH client, in the order it expects them.
pub fn build_args(target: &ConnectTarget<'_>) -> Vec<String> {
    let mut args = vec![
        "-p".to_string(),
        target.port.to_string(),
        format!("{}@{}", target.user, target.address),
    ];
    args.extend(target.extra_args.iter().cloned());
    args
}

/// Whether the client output so far ends in (or contains) a password prompt.
pub fn contains_password_prompt(seen: &[u8]) -> bool {
    String::from_utf8_lossy(seen)
        .to_lowercase()
        .contains("password:")
}

enum PromptWait {
    Found,
    Exited(Vec<u8>),
    TimedOut(Vec<u8>),
}

fn wait_for_prompt(output: &Receiver<Vec<u8>>, timeout: Duration) -> PromptWait {
    // No deadline at all when the timeout is too large to represent.
    let deadline = Instant::now().checked_add(timeout);
    let mut seen = Vec::new();

    loop {
        // Output that is already queued is always inspected, even once the
        // deadline has passed.
        let next = match deadline {
            Some(deadline) => {
                output.recv_timeout(deadline.saturating_duration_since(Instant::now()))
            }
            None => output.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match next {
            Ok(chunk) => {
                seen.extend_from_slice(&chunk);
                if contains_password_prompt(&seen) {
                    return PromptWait::Found;
                }
            }
            Err(RecvTimeoutError::Timeout) => return PromptWait::TimedOut(seen),
            Err(RecvTimeoutError::Disconnected) => return PromptWait::Exited(seen),
        }
    }
}

/// Forward PTY output into a channel until EOF.
fn spawn_reader(mut reader: Box<dyn Read + Send>) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = [0u8; 4096];
        loop {
            match reader.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
            }
        }
    });
    rx
}

/// Pump stdin -> PTY and PTY -> stdout until the client exits.
fn interact(output: &Receiver<Vec<u8>>, mut writer: Box<dyn Write + Send>) -> Result<()> {
    let _raw = RawModeGuard::enable()?;

    // The stdin pump blocks on read; it simply dies with the process.
    thread::spawn(move || {
        let mut stdin = io::stdin();
        let mut buf = [0u8; 1024];
        loop {
            match stdin.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if writer.write_all(&buf[..n]).and_then(|()| writer.flush()).is_err() {
                        break;
                    }
                }
            }
        }
    });

    let mut stdout = io::stdout();
    for chunk in output.iter() {
        stdout.write_all(&chunk)?;
        stdout.flush()?;
    }
    Ok(())
}

/// Raw mode on the local terminal for as long as the guard lives.
struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    fn enable() -> Result<Self> {
        if !io::stdin().is_terminal() {
            return Ok(Self { active: false });
        }
        crossterm::terminal::enable_raw_mode()?;
        Ok(Self { active: true })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.active {
            let _ = crossterm::terminal::disable_raw_mode();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_put_port_before_destination() {
        let extra = vec!["-L".to_string(), "8080:localhost:80".to_string()];
        let target = ConnectTarget {
            address: "10.0.0.5",
            user: "alice",
            password: "p@ss",
            port: 2222,
            extra_args: &extra,
        };
        assert_eq!(
            build_args(&target),
            vec!["-p", "2222", "alice@10.0.0.5", "-L", "8080:localhost:80"]
        );
    }

    #[test]
    fn password_is_never_an_argument() {
        let target = ConnectTarget {
            address: "10.0.0.5",
            user: "root",
            password: "hunter22",
            port: 22,
            extra_args: &[],
        };
        assert!(!build_args(&target).iter().any(|a| a.contains("hunter22")));
    }

    #[test]
    fn detects_prompt_variants() {
        assert!(contains_password_prompt(b"root@10.0.0.5's password: "));
        assert!(contains_password_prompt(b"Password:"));
        assert!(!contains_password_prompt(b"Welcome to Ubuntu"));
        assert!(!contains_password_prompt(
            b"Are you sure you want to continue connecting (yes/no)?"
        ));
    }

    #[test]
    fn wait_reports_exit_with_output() {
        let (tx, rx) = mpsc::channel();
        tx.send(b"ssh: connect to host 10.0.0.5 port 22: No route to host\r\n".to_vec())
            .unwrap();
        drop(tx);

        match wait_for_prompt(&rx, Duration::from_secs(5)) {
            PromptWait::Exited(seen) => assert!(String::from_utf8_lossy(&seen).contains("No route")),
            _ => panic!("expected the client to be reported as exited"),
        }
    }

    #[test]
    fn wait_finds_prompt_split_across_chunks() {
        let (tx, rx) = mpsc::channel();
        tx.send(b"root@host's pass".to_vec()).unwrap();
        tx.send(b"word: ".to_vec()).unwrap();

        assert!(matches!(
            wait_for_prompt(&rx, Duration::from_secs(5)),
            PromptWait::Found
        ));
    }

    #[test]
    fn wait_times_out() {
        let (_tx, rx) = mpsc::channel::<Vec<u8>>();
        assert!(matches!(
            wait_for_prompt(&rx, Duration::from_millis(20)),
            PromptWait::TimedOut(_)
        ));
    }

    #[test]
    fn zero_timeout_still_sees_queued_prompt() {
        let (tx, rx) = mpsc::channel();
        tx.send(b"x's password: ".to_vec()).unwrap();

        assert!(matches!(
            wait_for_prompt(&rx, Duration::ZERO),
            PromptWait::Found
        ));
    }

    #[test]
    fn unrepresentable_timeout_does_not_overflow() {
        let (tx, rx) = mpsc::channel();
        tx.send(b"root@host's password: ".to_vec()).unwrap();

        assert!(matches!(
            wait_for_prompt(&rx, Duration::from_secs(u64::MAX)),
            PromptWait::Found
        ));

        let (tx, rx) = mpsc::channel::<Vec<u8>>();
        drop(tx);
        assert!(matches!(
            wait_for_prompt(&rx, Duration::from_secs(i64::MAX as u64)),
            PromptWait::Exited(_)
        ));
    }
}
