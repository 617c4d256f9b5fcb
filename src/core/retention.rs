//! Expired artifact cleanup.
//!
//! Deletion is best-effort: a failure on one file is logged and never stops
//! the scan, unlike the fail-fast dump step. Only files whose name carries
//! the base's `{name}_` prefix are ever considered.

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::core::config::BaseConfig;
use crate::error::CleanupError;

/// Delete artifacts for `base` older than its retention window.
///
/// Returns the number of deleted files. A no-op when `retention_days` is
/// unset or not positive.
pub fn enforce(base: &BaseConfig, now: DateTime<Local>) -> usize {
    let days = match base.retention_days {
        Some(days) if days > 0 => days,
        _ => return 0,
    };
    let cutoff = now - chrono::Duration::days(days);
    let prefix = format!("{}_", base.name);

    let entries = match std::fs::read_dir(&base.backup_dir) {
        Ok(entries) => entries,
        Err(source) => {
            warn!(
                "{}",
                CleanupError::List {
                    path: base.backup_dir.clone(),
                    source,
                }
            );
            return 0;
        }
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name();
        if !name.to_string_lossy().starts_with(&prefix) {
            continue;
        }

        let modified = match entry.metadata().and_then(|m| m.modified()) {
            Ok(modified) => DateTime::<Local>::from(modified),
            Err(_) => continue,
        };
        if modified >= cutoff {
            continue;
        }

        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!("deleted expired backup {}", path.display());
                removed += 1;
            }
            Err(source) => {
                warn!("{}", CleanupError::Delete { path, source });
            }
        }
    }

    removed
}
