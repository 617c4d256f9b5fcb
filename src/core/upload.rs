//! Yandex.Disk artifact upload.
//!
//! Two-phase protocol: request an upload location from the REST API, then
//! PUT the artifact bytes to the returned `href`. Both calls carry the
//! OAuth token resolved from the secret store just in time.

use std::fs::File;
use std::path::Path;

use reqwest::blocking::{Body, Client};
use reqwest::header::AUTHORIZATION;
use tracing::{debug, info};

use crate::core::config::UploadConfig;
use crate::core::secrets::SecretStore;
use crate::error::UploadError;

/// Production REST endpoint.
pub const DISK_API_URL: &str = "https://cloud-api.yandex.net";

/// Upload backend seam. The runner records failures from this trait as
/// upload-step failures only; dump and cleanup outcomes stay untouched.
pub trait Uploader {
    fn upload(&self, config: &UploadConfig, artifact: &Path) -> Result<(), UploadError>;
}

/// Yandex.Disk uploader over the blocking HTTP client.
pub struct DiskUploader<'a> {
    store: &'a SecretStore,
    base_url: String,
    client: Client,
}

impl<'a> DiskUploader<'a> {
    pub fn new(store: &'a SecretStore) -> Self {
        Self::with_base_url(store, DISK_API_URL)
    }

    pub fn with_base_url(store: &'a SecretStore, base_url: &str) -> Self {
        Self {
            store,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Phase 1: ask the API where to PUT the file.
    fn request_href(&self, remote: &str, auth: &str) -> Result<String, UploadError> {
        let response = self
            .client
            .get(format!("{}/v1/disk/resources/upload", self.base_url))
            .query(&[("path", remote), ("overwrite", "true")])
            .header(AUTHORIZATION, auth)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Api {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let body: serde_json::Value = response.json()?;
        extract_href(&body).map(str::to_string)
    }
}

impl Uploader for DiskUploader<'_> {
    fn upload(&self, config: &UploadConfig, artifact: &Path) -> Result<(), UploadError> {
        let token = self
            .store
            .get(&config.token_secret)
            .map_err(|e| UploadError::Token {
                name: config.token_secret.clone(),
                reason: e.to_string(),
            })?;
        let auth = format!("OAuth {}", token.as_str());

        let file_name = artifact
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let remote = remote_path(&config.remote_dir, &file_name);
        debug!("requesting upload location for {}", remote);

        let href = self.request_href(&remote, &auth)?;

        // Phase 2: stream the artifact bytes to the returned location.
        // From<File> picks up the file length so the request is sized.
        let file = File::open(artifact)?;
        let response = self
            .client
            .put(&href)
            .header(AUTHORIZATION, &auth)
            .body(Body::from(file))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Api {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        info!("uploaded {} to {}", artifact.display(), remote);
        Ok(())
    }
}

/// Pull the direct upload URL out of the phase-1 response body.
fn extract_href(body: &serde_json::Value) -> Result<&str, UploadError> {
    body.get("href")
        .and_then(|v| v.as_str())
        .filter(|href| !href.is_empty())
        .ok_or(UploadError::MissingHref)
}

/// Join the configured remote directory with the artifact filename.
///
/// Backslashes become forward slashes; the result has exactly one leading
/// slash and no duplicate separators.
pub fn remote_path(remote_dir: &str, file_name: &str) -> String {
    let joined = format!("{}/{}", remote_dir, file_name).replace('\\', "/");
    let segments: Vec<&str> = joined.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}
