//! Base management commands (add, list, rm).
//!
//! These operate purely on the configuration file; the backup pipeline
//! reads the result at run time.

use std::path::Path;

use crate::cli::output;
use crate::cli::BaseAction;
use crate::core::config::{AppConfig, BaseConfig, UploadConfig};
use crate::error::{ConfigError, Result};

pub fn execute(config_path: &Path, action: &BaseAction) -> Result<()> {
    match action {
        BaseAction::Add {
            name,
            source,
            tool,
            backup_dir,
            retention_days,
            user_secret,
            password_secret,
            remote_dir,
            token_secret,
        } => {
            let upload = match (remote_dir, token_secret) {
                (Some(remote_dir), Some(token_secret)) => Some(UploadConfig {
                    enabled: true,
                    remote_dir: remote_dir.clone(),
                    token_secret: token_secret.clone(),
                }),
                (Some(_), None) => {
                    return Err(ConfigError::Invalid(
                        "--remote-dir requires --token-secret".into(),
                    )
                    .into())
                }
                (None, Some(_)) => {
                    return Err(ConfigError::Invalid(
                        "--token-secret requires --remote-dir".into(),
                    )
                    .into())
                }
                (None, None) => None,
            };

            let base = BaseConfig {
                name: name.clone(),
                source: source.clone(),
                tool: tool.clone(),
                backup_dir: backup_dir.clone(),
                retention_days: *retention_days,
                user_secret: user_secret.clone(),
                password_secret: password_secret.clone(),
                upload,
            };

            let mut config = AppConfig::load_or_default(config_path)?;
            config.add_base(base)?;
            config.save(config_path)?;

            output::success(&format!("base '{}' added", name));
            Ok(())
        }

        BaseAction::List => {
            let config = AppConfig::load_or_default(config_path)?;
            if config.bases.is_empty() {
                output::dimmed("no bases configured");
                return Ok(());
            }

            println!("{} base(s):", config.bases.len());
            for base in &config.bases {
                output::list_item(&base.name);
                output::kv("source:", base.source.display());
                output::kv("backup dir:", base.backup_dir.display());
                match base.retention_days {
                    Some(days) if days > 0 => output::kv("retention:", format!("{} days", days)),
                    _ => output::kv("retention:", "disabled"),
                }
                let cloud = match &base.upload {
                    Some(u) if u.enabled => u.remote_dir.as_str(),
                    _ => "disabled",
                };
                output::kv("cloud:", cloud);
            }
            Ok(())
        }

        BaseAction::Rm { name } => {
            let mut config = AppConfig::load(config_path)?;
            config.remove_base(name)?;
            config.save(config_path)?;
            output::success(&format!("base '{}' removed", name));
            Ok(())
        }
    }
}
