//! dtbackup - backup automation for 1C:Enterprise infobases.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dtbackup::cli::output;
use dtbackup::cli::{execute, Cli};
use dtbackup::error::{ConfigError, Error, SecretError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("DTBACKUP_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("dtbackup=debug")
        } else {
            EnvFilter::new("dtbackup=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::Secret(SecretError::KeyMissing) => Some("run: dtbackup init-key"),
            Error::Secret(SecretError::KeyExists) => {
                Some("run: dtbackup init-key --force (existing secrets become unreadable)")
            }
            Error::Config(ConfigError::NoBases) | Error::Config(ConfigError::NotFound(_)) => {
                Some("run: dtbackup base add")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
