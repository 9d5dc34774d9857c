use clap::Parser;
use tracing::debug;
use zeroize::Zeroizing;

use essh::cli::interrupt::{self, EXIT_INTERRUPTED, EXIT_MESSAGE};
use essh::cli::output;
use essh::cli::prompt::TerminalPrompt;
use essh::cli::Cli;
use essh::config::{DataDir, Settings};
use essh::errors::{EsshError, Result};
use essh::router::{self, Router};
use essh::session::{self, SessionCache};
use essh::ssh::PtySshConnector;
use essh::vault::VaultStore;

fn main() {
    init_logging();
    interrupt::install();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => {}
        Err(EsshError::Interrupted) => {
            println!("\n{EXIT_MESSAGE}");
            std::process::exit(EXIT_INTERRUPTED);
        }
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let data_dir = DataDir::resolve(cli.data_dir.as_deref())?;
    data_dir.ensure()?;
    let settings = Settings::load(data_dir.root())?;

    let Some(request) = cli.request(settings.ssh_port) else {
        output::info("Nothing to do.");
        output::tip("Run `essh <IP|NAME>` to connect, or `essh --help` for all options.");
        return Ok(());
    };

    if cli.password.is_some() {
        output::warning("Passwords given with --password end up in your shell history.");
    }

    let cache = SessionCache::new(data_dir.session_path(), settings.kdf_iterations);

    if !request.uses_vault() {
        let outcome = router::dispatch_standalone(&cache, request)?;
        output::report(&outcome);
        return Ok(());
    }

    let store = VaultStore::open(&data_dir, settings.kdf_iterations)?;

    let fingerprint = if settings.session_cache {
        session::fingerprint()
    } else {
        None
    };
    if fingerprint.is_none() {
        debug!("session cache disabled for this run");
    }

    let env_password = std::env::var("ESSH_PASSWORD").ok().map(Zeroizing::new);

    let connector = PtySshConnector::from_settings(&settings);
    let mut prompt = TerminalPrompt;

    let outcome = Router::new(&store, &cache, &mut prompt, &connector)
        .with_fingerprint(fingerprint)
        .with_env_password(env_password)
        .dispatch(request)?;

    output::report(&outcome);
    Ok(())
}

/// Structured diagnostics on stderr, filtered by `ESSH_LOG`.
fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("ESSH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();

    debug!("essh v{} starting up", env!("CARGO_PKG_VERSION"));
}
