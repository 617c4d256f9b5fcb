//! Encrypted secret store.
//!
//! Named credential strings encrypted at rest under a locally generated key.
//! Both files live at paths supplied by the caller; there is no ambient
//! global state. Every write rewrites the whole mapping file. No locking is
//! performed: running two instances against the same secrets directory is
//! out of contract.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::crypto;
use crate::error::{Result, SecretError};

/// Store of encrypted named secrets.
pub struct SecretStore {
    key_path: PathBuf,
    secrets_path: PathBuf,
}

/// On-disk mapping of secret name to encrypted blob.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SecretFile {
    #[serde(default)]
    secrets: BTreeMap<String, String>,
}

impl SecretStore {
    pub fn new(key_path: PathBuf, secrets_path: PathBuf) -> Self {
        Self {
            key_path,
            secrets_path,
        }
    }

    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    pub fn secrets_path(&self) -> &Path {
        &self.secrets_path
    }

    /// Generate and persist a new encryption key.
    ///
    /// Fails with [`SecretError::KeyExists`] when a key file is already
    /// present and `force` is not set. A forced regeneration makes secrets
    /// encrypted under the old key unreadable.
    pub fn init_key(&self, force: bool) -> Result<()> {
        if self.key_path.exists() && !force {
            return Err(SecretError::KeyExists.into());
        }

        if let Some(parent) = self.key_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let key = crypto::generate_key();
        fs::write(&self.key_path, key.as_ref())?;

        // Restrict permissions on key file (Unix only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.key_path, fs::Permissions::from_mode(0o600))?;
        }

        debug!("wrote new encryption key to {}", self.key_path.display());
        Ok(())
    }

    pub fn key_exists(&self) -> bool {
        self.key_path.exists()
    }

    /// Encrypt and store a secret, silently overwriting any previous value.
    pub fn set(&self, name: &str, plaintext: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(SecretError::EmptyName.into());
        }

        let key = self.load_key()?;
        let blob = crypto::encrypt(plaintext, &key)?;

        let mut file = self.load_file()?;
        file.secrets.insert(name.to_string(), blob);
        self.save_file(&file)?;

        debug!("stored secret '{}'", name);
        Ok(())
    }

    /// Decrypt a stored secret.
    pub fn get(&self, name: &str) -> Result<Zeroizing<String>> {
        let file = self.load_file()?;
        let blob = file
            .secrets
            .get(name)
            .ok_or_else(|| SecretError::NotFound(name.to_string()))?;

        let key = self.load_key()?;
        crypto::decrypt(blob, &key)
    }

    /// Sorted secret names. Values are never returned.
    pub fn list(&self) -> Result<Vec<String>> {
        let file = self.load_file()?;
        Ok(file.secrets.keys().cloned().collect())
    }

    fn load_key(&self) -> Result<Zeroizing<[u8; crypto::KEY_LEN]>> {
        if !self.key_path.exists() {
            return Err(SecretError::KeyMissing.into());
        }
        let raw = fs::read(&self.key_path)?;
        let key: [u8; crypto::KEY_LEN] = raw.as_slice().try_into().map_err(|_| {
            SecretError::InvalidKey(format!(
                "expected {} bytes, found {}",
                crypto::KEY_LEN,
                raw.len()
            ))
        })?;
        Ok(Zeroizing::new(key))
    }

    fn load_file(&self) -> Result<SecretFile> {
        if !self.secrets_path.exists() {
            return Ok(SecretFile::default());
        }
        let contents = fs::read_to_string(&self.secrets_path)?;
        Ok(toml::from_str(&contents)?)
    }

    fn save_file(&self, file: &SecretFile) -> Result<()> {
        if let Some(parent) = self
            .secrets_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(file)?;
        fs::write(&self.secrets_path, contents)?;
        Ok(())
    }
}
