//! Run command.
//!
//! Executes the backup pipeline for the selected bases and reports per-job
//! outcomes. The process exits non-zero when any job failed, after every
//! base was attempted.

use std::path::Path;

use crate::cli::output;
use crate::core::config::AppConfig;
use crate::core::runner::{JobRunner, UploadStatus};
use crate::core::secrets::SecretStore;
use crate::core::upload::DiskUploader;
use crate::error::{Error, Result};

pub fn execute(config_path: &Path, store: &SecretStore, names: &[String]) -> Result<()> {
    let config = AppConfig::load(config_path)?;
    let uploader = DiskUploader::new(store);
    let runner = JobRunner::new(&config, store, &uploader);

    let report = runner.run(names)?;

    for job in &report.jobs {
        match &job.dump_error {
            Some(reason) => output::error(&format!("{}: dump failed: {}", job.base, reason)),
            None => {
                let artifact = job
                    .artifact
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                output::success(&format!("{}: dumped to {}", job.base, artifact));
                if job.removed > 0 {
                    output::dimmed(&format!(
                        "  removed {} expired artifact(s)",
                        job.removed
                    ));
                }
                match &job.upload {
                    UploadStatus::Done => output::dimmed("  uploaded to cloud"),
                    UploadStatus::Failed(reason) => {
                        output::warn(&format!("{}: upload failed: {}", job.base, reason))
                    }
                    UploadStatus::Skipped => {}
                }
            }
        }
    }

    if report.success() {
        output::success(&format!("{} base(s) backed up", report.jobs.len()));
        Ok(())
    } else {
        Err(Error::RunFailed {
            failed: report.failed_count(),
            total: report.jobs.len(),
        })
    }
}
