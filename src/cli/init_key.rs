//! Init-key command - create the secret encryption key.

use tracing::info;

use crate::cli::output;
use crate::core::secrets::SecretStore;
use crate::error::Result;

pub fn execute(store: &SecretStore, force: bool) -> Result<()> {
    let replacing = force && store.key_exists();
    store.init_key(force)?;

    if replacing {
        output::warn("previous key replaced; existing secrets can no longer be decrypted");
    }
    output::success("encryption key created");
    output::kv("key file:", store.key_path().display());
    output::hint("store secrets with: dtbackup secret set NAME");

    info!("key written to {}", store.key_path().display());
    Ok(())
}
