//! dtbackup - backup automation for 1C:Enterprise infobases.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── run           # Execute the backup pipeline
//! │   ├── init_key      # Create the secret encryption key
//! │   ├── secret        # Encrypted secret management
//! │   ├── base          # Configured base management
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── config        # config.toml models and persistence
//!     ├── crypto        # AES-256-GCM secret encryption
//!     ├── secrets       # Encrypted secret store
//!     ├── dump          # Designer-mode infobase export
//!     ├── retention     # Expired artifact cleanup
//!     ├── upload        # Yandex.Disk artifact upload
//!     └── runner        # Per-base job sequencing
//! ```
//!
//! # Features
//!
//! - AES-256-GCM encrypted credential storage under a local key
//! - Non-interactive `1cv8 DESIGNER /DumpIB` exports per base
//! - Per-base retention windows for prior dump artifacts
//! - Two-phase Yandex.Disk REST upload with OAuth token auth
//! - Per-base failure isolation with aggregate reporting

pub mod cli;
pub mod core;
pub mod error;
