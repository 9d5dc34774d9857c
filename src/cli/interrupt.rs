//! Ctrl-C handling.
//!
//! A SIGINT outside an SSH session (typically while a password prompt has
//! echo turned off) restores the terminal settings captured at startup,
//! prints `program exited` and exits with status 130.  During a session the
//! terminal is in raw mode, so Ctrl-C reaches the remote side as a byte.

/// Exit status for an interrupted run.
pub const EXIT_INTERRUPTED: i32 = 130;

/// Message printed when the user interrupts.
pub const EXIT_MESSAGE: &str = "program exited";

/// `EXIT_MESSAGE` on its own line, as written by the signal handler.
#[cfg_attr(not(unix), allow(dead_code))]
const SIGNAL_LINE: [u8; EXIT_MESSAGE.len() + 2] = signal_line();

#[cfg_attr(not(unix), allow(dead_code))]
const fn signal_line() -> [u8; EXIT_MESSAGE.len() + 2] {
    let msg = EXIT_MESSAGE.as_bytes();
    let mut line = [b'\n'; EXIT_MESSAGE.len() + 2];
    let mut i = 0;
    while i < msg.len() {
        line[i + 1] = msg[i];
        i += 1;
    }
    line
}

#[cfg(unix)]
mod imp {
    use std::sync::OnceLock;

    static SAVED_TERMIOS: OnceLock<libc::termios> = OnceLock::new();

    pub fn install() {
        // SAFETY: tcgetattr writes into a zeroed POD struct we own, and the
        // handler only calls async-signal-safe functions.
        unsafe {
            let mut term: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(libc::STDIN_FILENO, &mut term) == 0 {
                let _ = SAVED_TERMIOS.set(term);
            }
            let handler = on_sigint as *const () as libc::sighandler_t;
            libc::signal(libc::SIGINT, handler);
        }
    }

    extern "C" fn on_sigint(_signal: libc::c_int) {
        let msg = &super::SIGNAL_LINE;
        // SAFETY: tcsetattr, write and _exit are async-signal-safe.
        unsafe {
            if let Some(term) = SAVED_TERMIOS.get() {
                libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, term);
            }
            libc::write(libc::STDOUT_FILENO, msg.as_ptr().cast(), msg.len());
            libc::_exit(super::EXIT_INTERRUPTED);
        }
    }
}

/// Install the SIGINT handler.  Call once, before any prompt.
pub fn install() {
    #[cfg(unix)]
    imp::install();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_line_wraps_the_exit_message() {
        assert_eq!(&SIGNAL_LINE[..], format!("\n{EXIT_MESSAGE}\n").as_bytes());
    }
}
