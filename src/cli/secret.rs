//! Secret management commands (set, list).
//!
//! Values come from `--value`, stdin, or an interactive confirmed prompt.
//! The prompt lives here so the core store stays free of interactive I/O.

use std::io::Read;

use dialoguer::Password;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::core::secrets::SecretStore;
use crate::error::{Result, SecretError};

/// Set a secret value.
pub fn set(store: &SecretStore, name: &str, value: Option<String>, stdin: bool) -> Result<()> {
    let value: Zeroizing<String> = match value {
        Some(v) => Zeroizing::new(v),
        None if stdin => read_stdin()?,
        None => prompt_value()?,
    };

    if value.is_empty() {
        return Err(SecretError::EmptyValue.into());
    }

    store.set(name, &value)?;
    output::success(&format!("secret '{}' stored", name));
    Ok(())
}

/// List stored secret names. Values are never printed.
pub fn list(store: &SecretStore) -> Result<()> {
    let names = store.list()?;

    if names.is_empty() {
        output::dimmed("no secrets stored");
    } else {
        println!("{} secret(s):", names.len());
        for name in names {
            output::list_item(&name);
        }
    }

    Ok(())
}

fn read_stdin() -> Result<Zeroizing<String>> {
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    let trimmed = buf.trim_end_matches(['\r', '\n']).to_string();
    Ok(Zeroizing::new(trimmed))
}

fn prompt_value() -> Result<Zeroizing<String>> {
    let value = Password::new()
        .with_prompt("Secret value")
        .with_confirmation("Confirm value", "values do not match")
        .interact()?;
    Ok(Zeroizing::new(value))
}
