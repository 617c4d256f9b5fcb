//! AES-256-GCM encryption for stored secrets.
//!
//! Blob layout: base64(nonce || ciphertext) with a random 96-bit nonce per
//! encryption. Decrypting a blob produced under a different key fails the
//! AEAD tag check and surfaces as [`SecretError::DecryptFailed`].

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::{Result, SecretError};

/// Key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Nonce length in bytes (GCM standard).
pub const NONCE_LEN: usize = 12;

/// Generate a fresh random key from the OS RNG.
pub fn generate_key() -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    OsRng.fill_bytes(key.as_mut());
    key
}

/// Encrypt a plaintext under `key`, returning a base64 blob.
pub fn encrypt(plaintext: &str, key: &[u8; KEY_LEN]) -> Result<String> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| SecretError::InvalidKey(e.to_string()))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| SecretError::EncryptFailed("AEAD encryption failed".into()))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);

    Ok(BASE64.encode(blob))
}

/// Decrypt a base64 blob produced by [`encrypt`].
pub fn decrypt(blob: &str, key: &[u8; KEY_LEN]) -> Result<Zeroizing<String>> {
    let raw = BASE64
        .decode(blob.trim())
        .map_err(|_| SecretError::DecryptFailed("stored blob is not valid base64".into()))?;

    // Nonce plus at least the 16-byte GCM tag
    if raw.len() < NONCE_LEN + 16 {
        return Err(SecretError::DecryptFailed("stored blob is truncated".into()).into());
    }

    let (nonce_bytes, ciphertext) = raw.split_at(NONCE_LEN);
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| SecretError::InvalidKey(e.to_string()))?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| SecretError::DecryptFailed("ciphertext does not match the key".into()))?;

    let text = String::from_utf8(plaintext)
        .map_err(|_| SecretError::DecryptFailed("plaintext is not valid UTF-8".into()))?;

    Ok(Zeroizing::new(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let key = generate_key();
        let plaintext = "sa password 123!";

        let blob = encrypt(plaintext, &key).unwrap();
        assert_ne!(blob, plaintext);

        let decrypted = decrypt(&blob, &key).unwrap();
        assert_eq!(decrypted.as_str(), plaintext);
    }

    #[test]
    fn nonces_differ_between_encryptions() {
        let key = generate_key();
        let a = encrypt("same value", &key).unwrap();
        let b = encrypt("same value", &key).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn decrypt_with_wrong_key_fails() {
        let key = generate_key();
        let other = generate_key();

        let blob = encrypt("secret", &key).unwrap();
        assert!(decrypt(&blob, &other).is_err());
    }

    #[test]
    fn decrypt_rejects_malformed_blobs() {
        let key = generate_key();
        assert!(decrypt("not base64 ***", &key).is_err());
        assert!(decrypt(&BASE64.encode(b"short"), &key).is_err());
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let key = generate_key();
        let blob = encrypt("", &key).unwrap();
        assert_eq!(decrypt(&blob, &key).unwrap().as_str(), "");
    }

    #[test]
    fn unicode_roundtrips() {
        let key = generate_key();
        let plaintext = "пароль базы 1С — ЦБУ №7";
        let blob = encrypt(plaintext, &key).unwrap();
        assert_eq!(decrypt(&blob, &key).unwrap().as_str(), plaintext);
    }
}
