//! Designer-mode infobase export.
//!
//! Runs `1cv8 DESIGNER /DumpIB` synchronously against one base and returns
//! the artifact path. Credentials are resolved from the secret store just
//! in time and are never logged or echoed.

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Local};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::core::config::BaseConfig;
use crate::core::secrets::SecretStore;
use crate::error::{Result, ToolError};

/// Artifact file extension produced by the export tool.
pub const DUMP_EXTENSION: &str = "dt";

/// Filename timestamp, fixed once per run and shared by every job.
pub fn file_stamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// Artifact path for a base: `{backup_dir}/{name}_{stamp}.dt`.
pub fn artifact_path(base: &BaseConfig, stamp: &str) -> PathBuf {
    base.backup_dir
        .join(format!("{}_{}.{}", base.name, stamp, DUMP_EXTENSION))
}

/// Invoker for the external export tool.
pub struct DumpInvoker<'a> {
    store: &'a SecretStore,
}

impl<'a> DumpInvoker<'a> {
    pub fn new(store: &'a SecretStore) -> Self {
        Self { store }
    }

    /// Dump one base, returning the artifact path on success.
    pub fn dump(&self, base: &BaseConfig, stamp: &str) -> Result<PathBuf> {
        let tool = resolve_tool(&base.tool)?;
        if !base.source.exists() {
            return Err(ToolError::SourceNotFound(base.source.clone()).into());
        }

        std::fs::create_dir_all(&base.backup_dir)?;
        let artifact = artifact_path(base, stamp);

        let mut cmd = Command::new(&tool);
        cmd.arg("DESIGNER").arg("/DisableStartupDialogs");
        cmd.arg("/F").arg(&base.source);

        // Credentials go straight into the child's argv, never into logs.
        if let Some(name) = &base.user_secret {
            let user: Zeroizing<String> = self.store.get(name)?;
            cmd.arg("/N").arg(user.as_str());
        }
        if let Some(name) = &base.password_secret {
            let password: Zeroizing<String> = self.store.get(name)?;
            cmd.arg("/P").arg(password.as_str());
        }

        cmd.arg("/DumpIB").arg(&artifact);

        info!(
            "dumping base '{}' from {} to {}",
            base.name,
            base.source.display(),
            artifact.display()
        );

        let output = cmd.output().map_err(ToolError::Launch)?;

        if !output.stdout.is_empty() {
            debug!(
                "export tool stdout: {}",
                String::from_utf8_lossy(&output.stdout).trim()
            );
        }

        if !output.status.success() {
            return Err(ToolError::ExitStatus {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        // A zero exit does not guarantee the tool actually wrote the dump.
        if !artifact.is_file() {
            return Err(ToolError::MissingArtifact(artifact).into());
        }

        info!("base '{}' dumped to {}", base.name, artifact.display());
        Ok(artifact)
    }
}

/// Resolve the export tool: an existing path wins, otherwise search PATH.
fn resolve_tool(tool: &Path) -> Result<PathBuf> {
    if tool.is_file() {
        return Ok(tool.to_path_buf());
    }
    which::which(tool.as_os_str())
        .map_err(|_| ToolError::ToolNotFound(tool.display().to_string()).into())
}
