//! Command-line interface.

pub mod base;
pub mod completions;
pub mod init_key;
pub mod output;
pub mod run;
pub mod secret;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::secrets::SecretStore;

/// dtbackup - backup automation for 1C:Enterprise infobases.
#[derive(Parser)]
#[command(
    name = "dtbackup",
    about = "Backup automation for 1C:Enterprise infobases",
    version
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Path to the secret encryption key file
    #[arg(long, global = true, default_value = "secrets/key.key")]
    pub key_file: PathBuf,

    /// Path to the encrypted secrets file
    #[arg(long, global = true, default_value = "secrets/secrets.toml")]
    pub secrets_file: PathBuf,

    /// Increase log verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Back up configured bases
    Run {
        /// Base names to back up (all configured bases when omitted)
        names: Vec<String>,
    },

    /// Create a new secret encryption key
    InitKey {
        /// Replace an existing key (stored secrets become unreadable)
        #[arg(long)]
        force: bool,
    },

    /// Manage encrypted secrets
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },

    /// Manage configured bases
    Base {
        #[command(subcommand)]
        action: BaseAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Secret subcommands.
#[derive(Subcommand)]
pub enum SecretAction {
    /// Set a secret value
    Set {
        /// Secret name (e.g. SQL_PASSWORD_ACME)
        name: String,
        /// Secret value; prompted interactively when omitted
        #[arg(long)]
        value: Option<String>,
        /// Read the value from stdin without confirmation
        #[arg(long, conflicts_with = "value")]
        stdin: bool,
    },

    /// List stored secret names
    List,
}

/// Base subcommands.
#[derive(Subcommand)]
pub enum BaseAction {
    /// Add a base to the configuration
    Add {
        /// Base name, unique case-insensitively
        #[arg(long)]
        name: String,
        /// Infobase source directory or .1CD file
        #[arg(long)]
        source: PathBuf,
        /// Export tool executable (path or name on PATH)
        #[arg(long, default_value = "1cv8")]
        tool: PathBuf,
        /// Directory receiving dump artifacts
        #[arg(long)]
        backup_dir: PathBuf,
        /// Delete artifacts older than this many days
        #[arg(long)]
        retention_days: Option<i64>,
        /// Secret name holding the infobase login
        #[arg(long)]
        user_secret: Option<String>,
        /// Secret name holding the infobase password
        #[arg(long)]
        password_secret: Option<String>,
        /// Remote directory on Yandex.Disk (enables upload)
        #[arg(long)]
        remote_dir: Option<String>,
        /// Secret name holding the OAuth token (required with --remote-dir)
        #[arg(long)]
        token_secret: Option<String>,
    },

    /// List configured bases
    List,

    /// Remove a base from the configuration
    Rm {
        /// Base name (case-insensitive)
        name: String,
    },
}

/// Execute a parsed command.
pub fn execute(cli: Cli) -> crate::error::Result<()> {
    let store = SecretStore::new(cli.key_file.clone(), cli.secrets_file.clone());

    match cli.command {
        Command::Run { ref names } => run::execute(&cli.config, &store, names),
        Command::InitKey { force } => init_key::execute(&store, force),
        Command::Secret { ref action } => match action {
            SecretAction::Set { name, value, stdin } => {
                secret::set(&store, name, value.clone(), *stdin)
            }
            SecretAction::List => secret::list(&store),
        },
        Command::Base { ref action } => base::execute(&cli.config, action),
        Command::Completions { shell } => {
            completions::execute(shell);
            Ok(())
        }
    }
}
