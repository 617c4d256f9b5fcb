//! Error types for dtbackup.
//!
//! Each pipeline step owns its error enum; the top-level [`Error`] wraps
//! them so `?` works across module boundaries.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Aggregate failure after every selected base was attempted.
    #[error("{failed} of {total} backup jobs failed")]
    RunFailed { failed: usize, total: usize },

    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("toml serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Configuration file and base-definition errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("no bases configured")]
    NoBases,

    #[error("no configured bases match the requested names")]
    NoMatchingBases,

    #[error("base '{0}' is already configured")]
    DuplicateBase(String),

    #[error("base '{0}' is not configured")]
    UnknownBase(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Secret store errors.
#[derive(Error, Debug)]
pub enum SecretError {
    #[error("encryption key already exists (use --force to replace it)")]
    KeyExists,

    #[error("encryption key not found")]
    KeyMissing,

    #[error("encryption key is malformed: {0}")]
    InvalidKey(String),

    #[error("secret not found: {0}")]
    NotFound(String),

    #[error("secret name cannot be empty")]
    EmptyName,

    #[error("secret value cannot be empty")]
    EmptyValue,

    #[error("encryption failed: {0}")]
    EncryptFailed(String),

    #[error("decryption failed: {0} (was the key regenerated?)")]
    DecryptFailed(String),
}

/// Errors from the external export tool.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("export tool not found: {0}")]
    ToolNotFound(String),

    #[error("infobase source not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("failed to launch export tool: {0}")]
    Launch(std::io::Error),

    #[error("export tool exited with code {code}: {stderr}")]
    ExitStatus { code: i32, stderr: String },

    #[error("export tool reported success but produced no artifact at {0}")]
    MissingArtifact(PathBuf),
}

/// Retention cleanup errors. Logged and suppressed per file, never fatal.
#[derive(Error, Debug)]
pub enum CleanupError {
    #[error("could not list backup directory {path}: {source}")]
    List {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not delete expired backup {path}: {source}")]
    Delete {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Cloud upload errors. Scoped to a single job's upload step.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("token secret '{name}' unavailable: {reason}")]
    Token { name: String, reason: String },

    #[error("upload endpoint returned no href")]
    MissingHref,

    #[error("cloud API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("transfer failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not read artifact: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
