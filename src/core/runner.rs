//! Per-base job sequencing.
//!
//! Runs dump, retention cleanup, and upload for each selected base in
//! order, strictly sequentially. A dump failure aborts only that base's
//! job; cleanup is best-effort; an upload failure is recorded separately
//! from the dump outcome. Every selected base is always attempted.

use chrono::Local;
use tracing::{error, info, warn};

use crate::core::config::{AppConfig, BaseConfig};
use crate::core::dump::{self, DumpInvoker};
use crate::core::retention;
use crate::core::secrets::SecretStore;
use crate::core::upload::Uploader;
use crate::error::{ConfigError, Result};

/// Outcome of the upload step for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    /// Upload not configured or not enabled for this base.
    Skipped,
    Done,
    Failed(String),
}

/// Outcome of one base's job. Upload success is tracked separately from
/// dump/cleanup: a failed upload does not invalidate a completed dump.
#[derive(Debug)]
pub struct JobOutcome {
    pub base: String,
    /// Artifact path when the dump succeeded.
    pub artifact: Option<std::path::PathBuf>,
    /// Expired artifacts deleted by the cleanup step.
    pub removed: usize,
    pub upload: UploadStatus,
    /// Dump failure, fatal for this job only.
    pub dump_error: Option<String>,
}

impl JobOutcome {
    pub fn succeeded(&self) -> bool {
        self.dump_error.is_none() && !matches!(self.upload, UploadStatus::Failed(_))
    }
}

/// Aggregate result of a run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub jobs: Vec<JobOutcome>,
}

impl RunReport {
    /// True when every job dumped successfully and uploaded successfully
    /// or had no upload configured.
    pub fn success(&self) -> bool {
        self.jobs.iter().all(JobOutcome::succeeded)
    }

    pub fn failed_count(&self) -> usize {
        self.jobs.iter().filter(|j| !j.succeeded()).count()
    }
}

/// Sequences the backup pipeline across configured bases.
pub struct JobRunner<'a> {
    config: &'a AppConfig,
    store: &'a SecretStore,
    uploader: &'a dyn Uploader,
}

impl<'a> JobRunner<'a> {
    pub fn new(config: &'a AppConfig, store: &'a SecretStore, uploader: &'a dyn Uploader) -> Self {
        Self {
            config,
            store,
            uploader,
        }
    }

    /// Run the pipeline for every selected base and report per-job outcomes.
    ///
    /// `filter` is an optional list of base names resolved case-insensitively
    /// against the configuration; an empty filter selects every base.
    pub fn run(&self, filter: &[String]) -> Result<RunReport> {
        let selected = self.select(filter)?;

        // One timestamp per run; every artifact path derives from it.
        let now = Local::now();
        let stamp = dump::file_stamp(now);
        let invoker = DumpInvoker::new(self.store);

        let mut report = RunReport::default();
        for base in selected {
            report.jobs.push(self.run_one(&invoker, base, &stamp, now));
        }
        Ok(report)
    }

    fn run_one(
        &self,
        invoker: &DumpInvoker<'_>,
        base: &BaseConfig,
        stamp: &str,
        now: chrono::DateTime<Local>,
    ) -> JobOutcome {
        let mut outcome = JobOutcome {
            base: base.name.clone(),
            artifact: None,
            removed: 0,
            upload: UploadStatus::Skipped,
            dump_error: None,
        };

        let artifact = match invoker.dump(base, stamp) {
            Ok(artifact) => artifact,
            Err(e) => {
                error!("backup of base '{}' failed: {}", base.name, e);
                outcome.dump_error = Some(e.to_string());
                return outcome;
            }
        };

        outcome.removed = retention::enforce(base, now);

        if let Some(upload) = base.upload.as_ref().filter(|u| u.enabled) {
            match self.uploader.upload(upload, &artifact) {
                Ok(()) => outcome.upload = UploadStatus::Done,
                Err(e) => {
                    error!("upload for base '{}' failed: {}", base.name, e);
                    outcome.upload = UploadStatus::Failed(e.to_string());
                }
            }
        }

        outcome.artifact = Some(artifact);
        outcome
    }

    /// Resolve the name filter against the configured bases.
    fn select(&self, filter: &[String]) -> Result<Vec<&'a BaseConfig>> {
        if self.config.bases.is_empty() {
            return Err(ConfigError::NoBases.into());
        }
        if filter.is_empty() {
            return Ok(self.config.bases.iter().collect());
        }

        let mut selected: Vec<&'a BaseConfig> = Vec::new();
        for name in filter {
            match self.config.find_base(name) {
                Some(base) => {
                    // A name requested twice still runs once: both dumps would
                    // share the run's timestamp and overwrite each other.
                    if selected
                        .iter()
                        .any(|b| b.name.eq_ignore_ascii_case(&base.name))
                    {
                        warn!("base '{}' requested more than once, running it once", name);
                    } else {
                        selected.push(base);
                    }
                }
                None => warn!("no configured base matches '{}', skipping", name),
            }
        }
        if selected.is_empty() {
            return Err(ConfigError::NoMatchingBases.into());
        }

        info!("selected {} of {} bases", selected.len(), self.config.bases.len());
        Ok(selected)
    }
}
