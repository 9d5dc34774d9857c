//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::router::{Outcome, ProfileSummary};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print saved servers as a table (Name, Address, User).
pub fn print_profiles_table(profiles: &[ProfileSummary]) {
    if profiles.is_empty() {
        info("No saved servers yet.");
        tip("Run `essh --add -i <IP> -p <PASSWORD>` to save one.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Address", "User"]);

    for p in profiles {
        table.add_row(vec![
            p.name.clone().unwrap_or_else(|| "-".to_string()),
            p.address.clone(),
            p.user.clone(),
        ]);
    }

    println!("{table}");
}

/// Render the result of a command.
pub fn report(outcome: &Outcome) {
    match outcome {
        Outcome::VaultReset => success("All saved servers erased, new master password set."),
        Outcome::ProfileAdded { address, total } => {
            success(&format!("Saved {address} ({total} server(s) in the vault)"));
        }
        Outcome::MissingProfileFields => {
            error("--add needs both --ip_address and --password.");
            tip("Example: essh --add -i 10.0.0.5 -p <PASSWORD> -n web -u admin");
        }
        Outcome::InvalidAddress(address) => {
            error(&format!("'{address}' is not a valid IPv4 or IPv6 address."));
        }
        Outcome::PasswordChanged { profiles } => {
            success(&format!(
                "Master password changed ({profiles} server(s) re-encrypted)."
            ));
        }
        Outcome::Connected { address, user } => info(&format!("Disconnected from {user}@{address}")),
        Outcome::ConnectionFailed { address, reason } => {
            error(&format!("Could not connect to {address}: {reason}"));
        }
        Outcome::NotFound(query) => {
            error(&format!("No single saved server matches '{query}'."));
            tip("Run `essh --list` to see saved servers.");
        }
        Outcome::Listed(profiles) => print_profiles_table(profiles),
        Outcome::Removed { address, remaining } => {
            success(&format!("Removed {address} ({remaining} server(s) left)"));
        }
        Outcome::SessionForgotten { existed: true } => {
            success("Cached master password cleared for this terminal.");
        }
        Outcome::SessionForgotten { existed: false } => info("No cached master password."),
    }
}
