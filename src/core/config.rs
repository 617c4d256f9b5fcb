//! config.toml models and persistence.
//!
//! The whole file is rewritten on every change; there is no partial update.
//! Base names are unique case-insensitively across the configured set.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default, rename = "base")]
    pub bases: Vec<BaseConfig>,
}

/// One configured infobase subject to backup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseConfig {
    /// Display name, unique case-insensitively. Also the artifact filename prefix.
    pub name: String,
    /// Infobase source: directory of a file infobase or path to its .1CD file.
    pub source: PathBuf,
    /// Export tool executable (`1cv8`), a path or a bare name resolved on PATH.
    pub tool: PathBuf,
    /// Directory receiving dump artifacts.
    pub backup_dir: PathBuf,
    /// Artifacts older than this many days are deleted. Absent or <= 0 disables cleanup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<i64>,
    /// Secret name holding the infobase user login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_secret: Option<String>,
    /// Secret name holding the infobase user password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_secret: Option<String>,
    /// Cloud upload settings; absent means no upload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload: Option<UploadConfig>,
}

/// Yandex.Disk upload settings for one base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Remote directory the artifact is placed under.
    pub remote_dir: String,
    /// Secret name holding the OAuth token.
    pub token_secret: String,
}

fn default_enabled() -> bool {
    true
}

impl BaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("base name cannot be empty".into()).into());
        }
        if self.backup_dir.as_os_str().is_empty() {
            return Err(
                ConfigError::Invalid(format!("base '{}' has no backup_dir", self.name)).into(),
            );
        }
        if let Some(upload) = &self.upload {
            if upload.token_secret.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "base '{}' enables upload without a token_secret",
                    self.name
                ))
                .into());
            }
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load the config, failing if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        for base in &config.bases {
            base.validate()?;
        }
        Ok(config)
    }

    /// Load the config, starting empty if the file does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Look up a base by name, case-insensitively.
    pub fn find_base(&self, name: &str) -> Option<&BaseConfig> {
        self.bases
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
    }

    pub fn add_base(&mut self, base: BaseConfig) -> Result<()> {
        base.validate()?;
        if self.find_base(&base.name).is_some() {
            return Err(ConfigError::DuplicateBase(base.name).into());
        }
        self.bases.push(base);
        Ok(())
    }

    pub fn remove_base(&mut self, name: &str) -> Result<()> {
        let before = self.bases.len();
        self.bases.retain(|b| !b.name.eq_ignore_ascii_case(name));
        if self.bases.len() == before {
            return Err(ConfigError::UnknownBase(name.to_string()).into());
        }
        Ok(())
    }
}
